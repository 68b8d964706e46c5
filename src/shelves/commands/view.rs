//! Printing a table, optionally narrowed by a [`ViewFilter`].
//!
//! Text filters (title, author, genre) match case-insensitively; author
//! matches any part of the full name. Bounds are inclusive, and a row whose
//! column is empty never satisfies a bound. On the reading table the author
//! and genre filters go through the catalog entry for each title.

use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShelvesError};
use crate::model::{parse_date, BookRecord, ReadingEvent, Table};
use crate::store::DataStore;
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// A column that can be bounded or checked for emptiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Title,
    Author,
    Genre,
    Length,
    TimesRead,
    Rating,
    Start,
    Finish,
    ReadingTime,
}

impl Column {
    pub fn label(&self) -> &'static str {
        match self {
            Column::Title => "Title",
            Column::Author => "Author",
            Column::Genre => "Genre",
            Column::Length => "Length",
            Column::TimesRead => "Times Read",
            Column::Rating => "Rating",
            Column::Start => "Start",
            Column::Finish => "Finish",
            Column::ReadingTime => "Reading Time",
        }
    }

    pub fn in_table(&self, table: Table) -> bool {
        match table {
            Table::Books => matches!(
                self,
                Column::Title
                    | Column::Author
                    | Column::Genre
                    | Column::Length
                    | Column::TimesRead
                    | Column::Rating
            ),
            Table::Reading => matches!(
                self,
                Column::Title
                    | Column::Start
                    | Column::Finish
                    | Column::ReadingTime
                    | Column::Rating
            ),
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(
            self,
            Column::Length | Column::TimesRead | Column::Rating | Column::ReadingTime
        )
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Column {
    type Err = ShelvesError;

    /// Accepts the CSV header or a dashed form: `Times Read`, `times-read`.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "title" => Ok(Column::Title),
            "author" => Ok(Column::Author),
            "genre" => Ok(Column::Genre),
            "length" => Ok(Column::Length),
            "timesread" => Ok(Column::TimesRead),
            "rating" => Ok(Column::Rating),
            "start" => Ok(Column::Start),
            "finish" => Ok(Column::Finish),
            "readingtime" => Ok(Column::ReadingTime),
            _ => Err(ShelvesError::invalid_value("column", s, "unknown column")),
        }
    }
}

/// An inclusive numeric limit on one column, written `COLUMN=VALUE`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub column: Column,
    pub value: f64,
}

impl FromStr for Bound {
    type Err = ShelvesError;

    fn from_str(s: &str) -> Result<Self> {
        let (column, value) = s
            .split_once('=')
            .ok_or_else(|| ShelvesError::invalid_value("bound", s, "expected COLUMN=VALUE"))?;
        let column: Column = column.parse()?;
        if !column.is_numeric() {
            return Err(ShelvesError::invalid_value(
                "bound",
                s,
                format!("{} is not a numeric column", column),
            ));
        }
        let value = value
            .trim()
            .parse::<f64>()
            .map_err(|_| ShelvesError::invalid_value("bound", s, "expected a number"))?;
        Ok(Self { column, value })
    }
}

/// Which reading date the date filters look at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateColumn {
    Start,
    #[default]
    Finish,
}

impl FromStr for DateColumn {
    type Err = ShelvesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(DateColumn::Start),
            "finish" => Ok(DateColumn::Finish),
            _ => Err(ShelvesError::invalid_value(
                "date column",
                s,
                "expected start or finish",
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub min: Vec<Bound>,
    pub max: Vec<Bound>,
    pub dates_on: DateColumn,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub year: Option<i32>,
    pub missing: Vec<Column>,
}

impl ViewFilter {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Parses a `--from`/`--to` argument.
    pub fn parse_date(raw: &str) -> Result<NaiveDate> {
        parse_date("date", raw)?
            .ok_or_else(|| ShelvesError::invalid_value("date", raw, "a date is required"))
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn has_dates(&self) -> bool {
        self.from.is_some() || self.to.is_some() || self.year.is_some()
    }

    /// Rejects filters on columns the table does not have.
    fn check(&self, table: Table) -> Result<()> {
        let columns = self
            .min
            .iter()
            .chain(&self.max)
            .map(|b| b.column)
            .chain(self.missing.iter().copied());
        for column in columns {
            if !column.in_table(table) {
                return Err(ShelvesError::invalid_value(
                    "filter",
                    column.label(),
                    format!("the {} table has no such column", table),
                ));
            }
        }
        if table == Table::Books && self.has_dates() {
            return Err(ShelvesError::invalid_value(
                "filter",
                "dates",
                "date filters apply to the reading table",
            ));
        }
        Ok(())
    }

    fn book_matches(&self, book: &BookRecord) -> bool {
        self.title.as_deref().map_or(true, |t| same_text(&book.title, t))
            && self.text_matches(book)
            && self.bounds_hold(|c| book_number(book, c))
            && self.missing.iter().all(|c| book_is_missing(book, *c))
    }

    /// Author and genre only; shared with the reading table's catalog join.
    fn text_matches(&self, book: &BookRecord) -> bool {
        let author_ok = self.author.as_deref().map_or(true, |needle| {
            book.author
                .as_deref()
                .map_or(false, |a| a.to_lowercase().contains(&needle.trim().to_lowercase()))
        });
        let genre_ok = self.genre.as_deref().map_or(true, |g| {
            book.genre.as_deref().map_or(false, |bg| same_text(bg, g))
        });
        author_ok && genre_ok
    }

    fn event_matches(&self, event: &ReadingEvent, titles: Option<&HashSet<&str>>) -> bool {
        self.title.as_deref().map_or(true, |t| same_text(&event.title, t))
            && titles.map_or(true, |set| set.contains(event.title.as_str()))
            && self.dates_hold(event)
            && self.bounds_hold(|c| event_number(event, c))
            && self.missing.iter().all(|c| event_is_missing(event, *c))
    }

    fn bounds_hold(&self, value: impl Fn(Column) -> Option<f64>) -> bool {
        self.min
            .iter()
            .all(|b| value(b.column).map_or(false, |v| v >= b.value))
            && self
                .max
                .iter()
                .all(|b| value(b.column).map_or(false, |v| v <= b.value))
    }

    fn dates_hold(&self, event: &ReadingEvent) -> bool {
        if !self.has_dates() {
            return true;
        }
        let date = match self.dates_on {
            DateColumn::Start => event.start,
            DateColumn::Finish => event.finish,
        };
        let Some(date) = date else {
            return false;
        };
        self.from.map_or(true, |d| date >= d)
            && self.to.map_or(true, |d| date <= d)
            && self.year.map_or(true, |y| date.year() == y)
    }
}

fn same_text(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn book_number(book: &BookRecord, column: Column) -> Option<f64> {
    match column {
        Column::Length => book.length.map(f64::from),
        Column::TimesRead => Some(f64::from(book.times_read)),
        Column::Rating => book.rating,
        _ => None,
    }
}

fn event_number(event: &ReadingEvent, column: Column) -> Option<f64> {
    match column {
        Column::Rating => event.rating.map(f64::from),
        Column::ReadingTime => event.reading_time.map(|d| d as f64),
        _ => None,
    }
}

fn book_is_missing(book: &BookRecord, column: Column) -> bool {
    match column {
        Column::Author => book.author.is_none(),
        Column::Genre => book.genre.is_none(),
        Column::Length => book.length.is_none(),
        Column::Rating => book.rating.is_none(),
        _ => false,
    }
}

fn event_is_missing(event: &ReadingEvent, column: Column) -> bool {
    match column {
        Column::Start => event.start.is_none(),
        Column::Finish => event.finish.is_none(),
        Column::ReadingTime => event.reading_time.is_none(),
        Column::Rating => event.rating.is_none(),
        _ => false,
    }
}

/// Titles whose catalog entry passes the author and genre filters, or `None`
/// when neither is set.
fn catalog_titles<'a>(catalog: &'a Catalog, filter: &ViewFilter) -> Option<HashSet<&'a str>> {
    if filter.author.is_none() && filter.genre.is_none() {
        return None;
    }
    Some(
        catalog
            .iter()
            .filter(|b| filter.text_matches(b))
            .map(|b| b.title.as_str())
            .collect(),
    )
}

/// Reads a table narrowed by `filter`. Reading rows keep their positions in
/// the full log.
pub fn run<S: DataStore>(store: &S, table: Table, filter: &ViewFilter) -> Result<CmdResult> {
    filter.check(table)?;
    let mut result = match table {
        Table::Books => {
            let books = store
                .load_catalog()?
                .iter()
                .filter(|b| filter.book_matches(b))
                .cloned()
                .collect();
            CmdResult::default().with_books(books)
        }
        Table::Reading => {
            let log = store.load_reading_log()?;
            let catalog = if filter.author.is_some() || filter.genre.is_some() {
                store.load_catalog()?
            } else {
                Catalog::default()
            };
            let titles = catalog_titles(&catalog, filter);
            let readings = log
                .iter()
                .enumerate()
                .filter(|(_, e)| filter.event_matches(e, titles.as_ref()))
                .map(|(p, e)| (p, e.clone()))
                .collect();
            CmdResult::default().with_readings(readings)
        }
    };

    if result.books.is_empty() && result.readings.is_empty() {
        let note = match (&filter.title, filter.is_empty()) {
            (_, true) => format!("The {} table is empty", table),
            (Some(t), _) => format!("No {} entries for {}", table, t),
            (None, false) => format!("No {} entries match the filters", table),
        };
        result.add_message(CmdMessage::info(note));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BookField, NewBook};
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn bound(s: &str) -> Bound {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Dune (Herbert, SF, 412 pages, read twice), Emma (Austen, Romance, read
    /// once), Ulysses (Joyce, no genre, unread).
    fn library() -> InMemoryStore {
        let mut store = StoreFixture::new()
            .with_reading("Dune", "2023-03-01", "2023-03-20", Some(4))
            .with_reading("Emma", "2024-02-01", "2024-02-05", Some(3))
            .with_reading("Dune", "2024-06-01", "2024-06-30", Some(5))
            .store;
        let mut catalog = store.load_catalog().unwrap();
        catalog
            .edit("Dune", BookField::AuthorLast, "Herbert")
            .unwrap();
        catalog
            .edit("Dune", BookField::Genre, "Science Fiction")
            .unwrap();
        catalog
            .edit("Dune", BookField::Length, "412")
            .unwrap();
        catalog
            .edit("Emma", BookField::AuthorFirst, "Jane")
            .unwrap();
        catalog
            .edit("Emma", BookField::AuthorLast, "Austen")
            .unwrap();
        catalog
            .edit("Emma", BookField::Genre, "Romance")
            .unwrap();
        catalog.add(NewBook::new("Ulysses").by("James", "", "Joyce")).unwrap();
        store.save_catalog(&catalog).unwrap();
        store
    }

    fn titles(result: &CmdResult) -> Vec<&str> {
        if result.readings.is_empty() {
            result.books.iter().map(|b| b.title.as_str()).collect()
        } else {
            result.readings.iter().map(|(_, e)| e.title.as_str()).collect()
        }
    }

    #[test]
    fn lists_all_books() {
        let store = StoreFixture::new()
            .with_book("Dune", "Frank", "Herbert")
            .with_book("Emma", "Jane", "Austen")
            .store;
        let result = run(&store, Table::Books, &ViewFilter::default()).unwrap();
        assert_eq!(result.books.len(), 2);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn filters_readings_and_keeps_positions() {
        let store = StoreFixture::new()
            .with_reading("Emma", "2023-01-01", "2023-01-05", Some(3))
            .with_reading("Dune", "2024-01-01", "2024-01-10", Some(5))
            .store;
        let result = run(&store, Table::Reading, &ViewFilter::title("Dune")).unwrap();
        assert_eq!(result.readings.len(), 1);
        assert_eq!(result.readings[0].0, 1);
    }

    #[test]
    fn empty_result_is_noted() {
        let store = InMemoryStore::initialized();
        let result = run(&store, Table::Books, &ViewFilter::title("Dune")).unwrap();
        assert_eq!(result.messages.len(), 1);
        assert!(result.messages[0].content.contains("No books entries for Dune"));
    }

    #[test]
    fn missing_table_is_an_error() {
        let store = InMemoryStore::new();
        assert!(run(&store, Table::Reading, &ViewFilter::default()).is_err());
    }

    #[test]
    fn author_matches_any_part_of_the_name() {
        let store = library();
        let filter = ViewFilter {
            author: Some("austen".to_string()),
            ..ViewFilter::default()
        };
        assert_eq!(titles(&run(&store, Table::Books, &filter).unwrap()), ["Emma"]);
    }

    #[test]
    fn genre_ignores_case() {
        let store = library();
        let filter = ViewFilter {
            genre: Some("science fiction".to_string()),
            ..ViewFilter::default()
        };
        assert_eq!(titles(&run(&store, Table::Books, &filter).unwrap()), ["Dune"]);
    }

    #[test]
    fn reading_author_goes_through_the_catalog() {
        let store = library();
        let filter = ViewFilter {
            author: Some("Herbert".to_string()),
            ..ViewFilter::default()
        };
        let result = run(&store, Table::Reading, &filter).unwrap();
        let positions: Vec<usize> = result.readings.iter().map(|(p, _)| *p).collect();
        assert_eq!(positions, [0, 2]);
    }

    #[test]
    fn numeric_bounds_are_inclusive() {
        let store = library();
        let filter = ViewFilter {
            min: vec![bound("times-read=1")],
            max: vec![bound("Times Read=1")],
            ..ViewFilter::default()
        };
        assert_eq!(titles(&run(&store, Table::Books, &filter).unwrap()), ["Emma"]);

        let filter = ViewFilter {
            min: vec![bound("rating=4.5")],
            ..ViewFilter::default()
        };
        assert_eq!(titles(&run(&store, Table::Books, &filter).unwrap()), ["Dune"]);
    }

    #[test]
    fn empty_values_fail_bounds() {
        let store = library();
        let filter = ViewFilter {
            max: vec![bound("length=1000")],
            ..ViewFilter::default()
        };
        assert_eq!(titles(&run(&store, Table::Books, &filter).unwrap()), ["Dune"]);
    }

    #[test]
    fn reading_time_bounds() {
        let store = library();
        let filter = ViewFilter {
            min: vec![bound("reading-time=20")],
            ..ViewFilter::default()
        };
        let result = run(&store, Table::Reading, &filter).unwrap();
        assert_eq!(result.readings.len(), 2);
        assert!(result.readings.iter().all(|(_, e)| e.title == "Dune"));
    }

    #[test]
    fn dates_use_finish_unless_asked() {
        let store = library();
        let filter = ViewFilter {
            year: Some(2024),
            ..ViewFilter::default()
        };
        assert_eq!(
            titles(&run(&store, Table::Reading, &filter).unwrap()),
            ["Emma", "Dune"]
        );

        let filter = ViewFilter {
            dates_on: DateColumn::Start,
            from: Some(date("2023-03-01")),
            to: Some(date("2024-01-31")),
            ..ViewFilter::default()
        };
        assert_eq!(titles(&run(&store, Table::Reading, &filter).unwrap()), ["Dune"]);
    }

    #[test]
    fn missing_selects_empty_cells() {
        let store = library();
        let filter = ViewFilter {
            missing: vec![Column::Genre],
            ..ViewFilter::default()
        };
        assert_eq!(titles(&run(&store, Table::Books, &filter).unwrap()), ["Ulysses"]);

        let filter = ViewFilter {
            missing: vec![Column::Rating],
            ..ViewFilter::default()
        };
        assert_eq!(titles(&run(&store, Table::Books, &filter).unwrap()), ["Ulysses"]);
    }

    #[test]
    fn no_match_is_noted() {
        let store = library();
        let filter = ViewFilter {
            year: Some(1999),
            ..ViewFilter::default()
        };
        let result = run(&store, Table::Reading, &filter).unwrap();
        assert!(result.readings.is_empty());
        assert!(result.messages[0].content.contains("match the filters"));
    }

    #[test]
    fn columns_outside_the_table_are_rejected() {
        let store = library();
        let filter = ViewFilter {
            missing: vec![Column::Start],
            ..ViewFilter::default()
        };
        assert!(matches!(
            run(&store, Table::Books, &filter),
            Err(ShelvesError::InvalidValue { .. })
        ));

        let filter = ViewFilter {
            year: Some(2024),
            ..ViewFilter::default()
        };
        assert!(run(&store, Table::Books, &filter).is_err());
    }

    #[test]
    fn bounds_parse_column_and_number() {
        assert_eq!(
            bound("Reading Time=7"),
            Bound {
                column: Column::ReadingTime,
                value: 7.0
            }
        );
        assert!("rating".parse::<Bound>().is_err());
        assert!("genre=3".parse::<Bound>().is_err());
        assert!("rating=high".parse::<Bound>().is_err());
    }
}
