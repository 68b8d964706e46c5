use crate::commands::{CmdMessage, CmdResult, ShelvesPaths};
use crate::config::ShelvesConfig;
use crate::error::Result;
use crate::model::Table;
use crate::store::DataStore;
use std::path::Path;

/// Creates both tables with their headers. Existing tables are kept unless
/// `force` is set, in which case they are replaced by empty ones.
pub fn run<S: DataStore>(store: &mut S, force: bool) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for table in Table::ALL {
        let location = store
            .table_path(table)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| table.file_name().to_string());

        if store.table_exists(table) && !force {
            result.add_message(CmdMessage::info(format!(
                "{} already exists, leaving it as is",
                location
            )));
            continue;
        }
        if store.table_exists(table) {
            result.add_message(CmdMessage::warning(format!(
                "Replacing {} with an empty table",
                location
            )));
        }
        store.create_table(table)?;
        result.add_message(CmdMessage::success(format!("Created {}", location)));
    }
    Ok(result)
}

/// Remembers `data_dir` in the config so later commands find the tables.
pub fn record_data_dir(paths: &ShelvesPaths, data_dir: &Path) -> Result<CmdMessage> {
    let mut config = ShelvesConfig::load(&paths.config_dir)?;
    config.data_dir = Some(data_dir.to_path_buf());
    config.save(&paths.config_dir)?;
    Ok(CmdMessage::info(format!(
        "Data directory set to {}",
        data_dir.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;
    use tempfile::TempDir;

    #[test]
    fn creates_missing_tables() {
        let mut store = InMemoryStore::new();
        let result = run(&mut store, false).unwrap();

        assert!(store.table_exists(Table::Books));
        assert!(store.table_exists(Table::Reading));
        assert!(store.load_catalog().unwrap().is_empty());
        assert_eq!(
            result
                .messages
                .iter()
                .filter(|m| m.level == MessageLevel::Success)
                .count(),
            2
        );
    }

    #[test]
    fn existing_tables_are_kept() {
        let mut store = StoreFixture::new()
            .with_book("Dune", "Frank", "Herbert")
            .store;
        run(&mut store, false).unwrap();
        assert_eq!(store.load_catalog().unwrap().len(), 1);
    }

    #[test]
    fn force_replaces_tables() {
        let mut store = StoreFixture::new()
            .with_book("Dune", "Frank", "Herbert")
            .store;
        let result = run(&mut store, true).unwrap();
        assert!(store.load_catalog().unwrap().is_empty());
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning));
    }

    #[test]
    fn records_data_dir_in_config() {
        let dir = TempDir::new().unwrap();
        let paths = ShelvesPaths::new(dir.path().join("config"), dir.path().join("data"));
        let target = dir.path().join("library");

        record_data_dir(&paths, &target).unwrap();

        let config = ShelvesConfig::load(&paths.config_dir).unwrap();
        assert_eq!(config.data_dir, Some(target));
    }
}
