//! # Storage Layer
//!
//! The [`DataStore`] trait hides where the two tables live. Sessions load a
//! full table, mutate it in memory, then hand the whole table back to be
//! written; there is no row-level access.
//!
//! ## Implementations
//!
//! - [`fs::CsvStore`]: production storage, one CSV file per table in a data
//!   directory. Writes go to a temporary sibling and are renamed over the
//!   target, so readers never see a half-written table.
//! - [`memory::InMemoryStore`]: for tests. No persistence.
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── books.csv     # Title, Author, Author FN, Author MN, Author LN, Length, Times Read, Rating, Genre
//! └── reading.csv   # Title, Start, Finish, Reading Time, Rating
//! ```

use crate::catalog::Catalog;
use crate::error::Result;
use crate::model::Table;
use crate::reading_log::ReadingLog;
use std::path::PathBuf;

pub mod fs;
pub mod memory;

pub const BOOK_COLUMNS: [&str; 9] = [
    "Title",
    "Author",
    "Author FN",
    "Author MN",
    "Author LN",
    "Length",
    "Times Read",
    "Rating",
    "Genre",
];

pub const READING_COLUMNS: [&str; 5] = ["Title", "Start", "Finish", "Reading Time", "Rating"];

pub fn columns(table: Table) -> &'static [&'static str] {
    match table {
        Table::Books => &BOOK_COLUMNS,
        Table::Reading => &READING_COLUMNS,
    }
}

/// Whole-table persistence for the catalog and the reading log.
pub trait DataStore {
    fn load_catalog(&self) -> Result<Catalog>;

    fn save_catalog(&mut self, catalog: &Catalog) -> Result<()>;

    fn load_reading_log(&self) -> Result<ReadingLog>;

    fn save_reading_log(&mut self, log: &ReadingLog) -> Result<()>;

    fn table_exists(&self, table: Table) -> bool;

    /// Creates an empty table (header only), replacing any existing one.
    fn create_table(&mut self, table: Table) -> Result<()>;

    /// Where the table lives, for messages. `None` for stores without files.
    fn table_path(&self, table: Table) -> Option<PathBuf>;
}
