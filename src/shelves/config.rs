use crate::error::{Result, ShelvesError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";

pub const DATA_DIR_KEY: &str = "data-dir";

/// Configuration for shelves, stored in `config.json` in the config directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShelvesConfig {
    /// Directory holding `books.csv` and `reading.csv`. When absent the
    /// platform data directory is used.
    #[serde(default, rename = "data-dir", skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl ShelvesConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: ShelvesConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            DATA_DIR_KEY => Some(
                self.data_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            _ => None,
        }
    }

    /// An empty value clears the setting.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            DATA_DIR_KEY => {
                let value = value.trim();
                self.data_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
                Ok(())
            }
            _ => Err(ShelvesError::Config(format!("Unknown config key: {}", key))),
        }
    }

    pub fn list_all(&self) -> Vec<(&'static str, String)> {
        [DATA_DIR_KEY]
            .into_iter()
            .map(|key| (key, self.get(key).unwrap_or_default()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ShelvesConfig::default();
        assert_eq!(config.data_dir, None);
        assert_eq!(config.get(DATA_DIR_KEY).as_deref(), Some(""));
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = ShelvesConfig::load(dir.path().join("nowhere")).unwrap();
        assert_eq!(config, ShelvesConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join("nested/config");

        let mut config = ShelvesConfig::default();
        config.set(DATA_DIR_KEY, "/srv/books").unwrap();
        config.save(&config_dir).unwrap();

        let loaded = ShelvesConfig::load(&config_dir).unwrap();
        assert_eq!(loaded.data_dir, Some(PathBuf::from("/srv/books")));

        let raw = fs::read_to_string(config_dir.join(CONFIG_FILENAME)).unwrap();
        assert!(raw.contains("\"data-dir\""));
    }

    #[test]
    fn test_set_empty_clears() {
        let mut config = ShelvesConfig {
            data_dir: Some(PathBuf::from("/srv/books")),
        };
        config.set(DATA_DIR_KEY, "  ").unwrap();
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn test_unknown_key() {
        let mut config = ShelvesConfig::default();
        assert!(config.get("colour").is_none());
        assert!(matches!(
            config.set("colour", "blue"),
            Err(ShelvesError::Config(_))
        ));
    }

    #[test]
    fn test_list_all() {
        let config = ShelvesConfig {
            data_dir: Some(PathBuf::from("/srv/books")),
        };
        assert_eq!(config.list_all(), vec![("data-dir", "/srv/books".to_string())]);
    }

    #[test]
    fn test_corrupt_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{ not json").unwrap();
        assert!(matches!(
            ShelvesConfig::load(dir.path()),
            Err(ShelvesError::Serialization(_))
        ));
    }
}
