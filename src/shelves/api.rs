//! # API Facade
//!
//! The API layer is a thin facade over the command layer and the single entry
//! point for all shelves operations, whatever UI drives them.
//!
//! The facade dispatches to the command functions and returns structured
//! `Result<CmdResult>` values. It does no business logic and no terminal I/O;
//! interactive sessions receive their [`Prompter`] from the caller.
//!
//! `ShelvesApi<S: DataStore>` is generic over the storage backend:
//! - Production: `ShelvesApi<CsvStore>`
//! - Testing: `ShelvesApi<InMemoryStore>`

use crate::commands;
use crate::error::Result;
use crate::model::Table;
use crate::store::DataStore;
use std::path::Path;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::view::{Bound, Column, DateColumn, ViewFilter};
pub use crate::commands::{
    CmdMessage, CmdResult, MessageLevel, Mode, Prompter, ShelvesPaths, Stage,
};

/// The main API facade for shelves operations.
pub struct ShelvesApi<S: DataStore> {
    store: S,
    paths: ShelvesPaths,
}

impl<S: DataStore> ShelvesApi<S> {
    pub fn new(store: S, paths: ShelvesPaths) -> Self {
        Self { store, paths }
    }

    pub fn paths(&self) -> &ShelvesPaths {
        &self.paths
    }

    pub fn init(&mut self, force: bool) -> Result<CmdResult> {
        commands::init::run(&mut self.store, force)
    }

    /// Like [`init`](Self::init), and also records the data directory in the
    /// config.
    pub fn init_at(&mut self, data_dir: &Path, force: bool) -> Result<CmdResult> {
        let mut result = commands::init::run(&mut self.store, force)?;
        let message = commands::init::record_data_dir(&self.paths, data_dir)?;
        result.add_message(message);
        Ok(result)
    }

    /// Runs one interactive session over `table`.
    pub fn manage<P: Prompter + ?Sized>(
        &mut self,
        table: Table,
        prompter: &mut P,
    ) -> Result<CmdResult> {
        match table {
            Table::Books => commands::manage_books::run(&mut self.store, prompter),
            Table::Reading => commands::manage_reading::run(&mut self.store, prompter),
        }
    }

    pub fn view(&self, table: Table, filter: &ViewFilter) -> Result<CmdResult> {
        commands::view::run(&self.store, table, filter)
    }

    pub fn doctor(&mut self) -> Result<CmdResult> {
        commands::doctor::run(&mut self.store)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::session::scripted::ScriptedPrompter;
    use crate::store::memory::InMemoryStore;
    use tempfile::TempDir;

    fn api(dir: &TempDir) -> ShelvesApi<InMemoryStore> {
        let paths = ShelvesPaths::new(dir.path().join("config"), dir.path().join("data"));
        ShelvesApi::new(InMemoryStore::new(), paths)
    }

    #[test]
    fn manage_dispatches_by_table() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        api.init(false).unwrap();

        let mut prompter = ScriptedPrompter::new(["1", "Dune", "", "2024-01-10", "5"]);
        let result = api.manage(Table::Reading, &mut prompter).unwrap();
        assert!(result.stages.contains(&Stage::Synchronized));

        let mut prompter = ScriptedPrompter::new(["3", "Dune"]);
        let result = api.manage(Table::Books, &mut prompter).unwrap();
        assert!(!result.stages.contains(&Stage::Synchronized));
        assert!(result.books.is_empty());
    }

    #[test]
    fn view_returns_rows() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        api.init(false).unwrap();
        let mut prompter = ScriptedPrompter::new(["1", "Dune", "", "2024-01-10", ""]);
        api.manage(Table::Reading, &mut prompter).unwrap();

        let all = ViewFilter::default();
        assert_eq!(api.view(Table::Reading, &all).unwrap().readings.len(), 1);
        let dune = ViewFilter::title("Dune");
        assert_eq!(api.view(Table::Books, &dune).unwrap().books.len(), 1);
    }

    #[test]
    fn init_at_records_data_dir() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        let target = dir.path().join("library");

        api.init_at(&target, false).unwrap();

        let result = api.config(ConfigAction::ShowAll).unwrap();
        assert_eq!(result.config.unwrap().data_dir, Some(target));
    }

    #[test]
    fn doctor_requires_tables() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        assert!(api.doctor().is_err());
        api.init(false).unwrap();
        assert!(api.doctor().is_ok());
    }
}
