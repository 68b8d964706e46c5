use super::DataStore;
use crate::catalog::Catalog;
use crate::error::{Result, ShelvesError};
use crate::model::Table;
use crate::reading_log::ReadingLog;
use std::path::PathBuf;

/// In-memory storage for testing and development.
/// Does NOT persist data. A table that was never created or saved behaves
/// like a missing file.
#[derive(Default)]
pub struct InMemoryStore {
    catalog: Option<Catalog>,
    log: Option<ReadingLog>,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both tables present and empty, as after `init`.
    pub fn initialized() -> Self {
        Self {
            catalog: Some(Catalog::new()),
            log: Some(ReadingLog::new()),
            saves: 0,
        }
    }

    /// Number of table writes performed so far.
    pub fn saves(&self) -> usize {
        self.saves
    }

    fn missing(table: Table) -> ShelvesError {
        ShelvesError::Store(format!("The {} table does not exist", table))
    }
}

impl DataStore for InMemoryStore {
    fn load_catalog(&self) -> Result<Catalog> {
        self.catalog.clone().ok_or_else(|| Self::missing(Table::Books))
    }

    fn save_catalog(&mut self, catalog: &Catalog) -> Result<()> {
        self.catalog = Some(catalog.clone());
        self.saves += 1;
        Ok(())
    }

    fn load_reading_log(&self) -> Result<ReadingLog> {
        self.log.clone().ok_or_else(|| Self::missing(Table::Reading))
    }

    fn save_reading_log(&mut self, log: &ReadingLog) -> Result<()> {
        self.log = Some(log.clone());
        self.saves += 1;
        Ok(())
    }

    fn table_exists(&self, table: Table) -> bool {
        match table {
            Table::Books => self.catalog.is_some(),
            Table::Reading => self.log.is_some(),
        }
    }

    fn create_table(&mut self, table: Table) -> Result<()> {
        match table {
            Table::Books => self.catalog = Some(Catalog::new()),
            Table::Reading => self.log = Some(ReadingLog::new()),
        }
        Ok(())
    }

    fn table_path(&self, _table: Table) -> Option<PathBuf> {
        None
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::NewBook;
    use crate::sync::synchronize_all;
    use chrono::NaiveDate;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::initialized(),
            }
        }

        pub fn with_book(mut self, title: &str, first: &str, last: &str) -> Self {
            let mut catalog = self.store.load_catalog().unwrap();
            catalog.add(NewBook::new(title).by(first, "", last)).unwrap();
            self.store.save_catalog(&catalog).unwrap();
            self
        }

        /// Adds a finished reading (dates as `YYYY-MM-DD`) and resyncs the
        /// catalog.
        pub fn with_reading(
            mut self,
            title: &str,
            start: &str,
            finish: &str,
            rating: Option<u8>,
        ) -> Self {
            let parse = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
            let mut catalog = self.store.load_catalog().unwrap();
            let mut log = self.store.load_reading_log().unwrap();
            log.add(title, parse(start), parse(finish), rating).unwrap();
            synchronize_all(&mut catalog, &log);
            self.store.save_catalog(&catalog).unwrap();
            self.store.save_reading_log(&log).unwrap();
            self
        }
    }
}
