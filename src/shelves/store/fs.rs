use super::{columns, DataStore};
use crate::catalog::Catalog;
use crate::error::{Result, ShelvesError};
use crate::model::{BookRecord, ReadingEvent, Table};
use crate::reading_log::ReadingLog;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CSV-backed storage rooted at a data directory.
pub struct CsvStore {
    root: PathBuf,
}

impl CsvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, table: Table) -> PathBuf {
        self.root.join(table.file_name())
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(ShelvesError::Io)?;
        }
        Ok(())
    }

    fn read_rows<T: DeserializeOwned>(&self, table: Table) -> Result<Vec<T>> {
        let path = self.path_for(table);
        if !path.exists() {
            return Err(ShelvesError::Store(format!(
                "The {} table does not exist at {} (run `shelves init` first)",
                table,
                path.display()
            )));
        }
        let mut reader = csv::Reader::from_path(&path)?;
        let rows = reader
            .deserialize()
            .collect::<std::result::Result<Vec<T>, csv::Error>>()?;
        debug!(table = %table, rows = rows.len(), path = %path.display(), "loaded table");
        Ok(rows)
    }

    /// Writes the header and rows to a temporary file, then renames it over
    /// the table so the old contents stay intact until the new ones are whole.
    fn write_rows<T: Serialize>(&self, table: Table, rows: &[T]) -> Result<()> {
        self.ensure_dir()?;
        let path = self.path_for(table);
        let tmp_path = path.with_extension("csv.tmp");

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&tmp_path)?;
            writer.write_record(columns(table))?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush().map_err(ShelvesError::Io)?;
        }

        fs::rename(&tmp_path, &path).map_err(ShelvesError::Io)?;
        info!(table = %table, rows = rows.len(), path = %path.display(), "saved table");
        Ok(())
    }
}

impl DataStore for CsvStore {
    fn load_catalog(&self) -> Result<Catalog> {
        let rows: Vec<BookRecord> = self.read_rows(Table::Books)?;
        Ok(Catalog::from_records(rows))
    }

    fn save_catalog(&mut self, catalog: &Catalog) -> Result<()> {
        self.write_rows(Table::Books, catalog.records())
    }

    fn load_reading_log(&self) -> Result<ReadingLog> {
        let rows: Vec<ReadingEvent> = self.read_rows(Table::Reading)?;
        Ok(ReadingLog::from_records(rows))
    }

    fn save_reading_log(&mut self, log: &ReadingLog) -> Result<()> {
        self.write_rows(Table::Reading, log.records())
    }

    fn table_exists(&self, table: Table) -> bool {
        self.path_for(table).is_file()
    }

    fn create_table(&mut self, table: Table) -> Result<()> {
        match table {
            Table::Books => self.write_rows::<BookRecord>(table, &[]),
            Table::Reading => self.write_rows::<ReadingEvent>(table, &[]),
        }
    }

    fn table_path(&self, table: Table) -> Option<PathBuf> {
        Some(self.path_for(table))
    }
}
