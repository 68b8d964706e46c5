//! Core record types for the two tables.
//!
//! Both record types carry derived columns (`author` on books, `reading_time`
//! on reading events). Those are stored alongside the raw fields so the CSV
//! files stay readable on their own, but they are never set directly: the
//! constructors and the `refresh_*` methods are the only writers.

use crate::error::{Result, ShelvesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Author")]
    pub author: Option<String>,
    #[serde(rename = "Author FN")]
    pub author_first: Option<String>,
    #[serde(rename = "Author MN")]
    pub author_middle: Option<String>,
    #[serde(rename = "Author LN")]
    pub author_last: Option<String>,
    #[serde(rename = "Length")]
    pub length: Option<u32>,
    #[serde(rename = "Times Read")]
    pub times_read: u32,
    #[serde(rename = "Rating")]
    pub rating: Option<f64>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
}

impl BookRecord {
    /// A catalog entry with nothing but a title, created to back a reading
    /// event whose book was never cataloged.
    pub fn stub(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: None,
            author_first: None,
            author_middle: None,
            author_last: None,
            length: None,
            times_read: 0,
            rating: None,
            genre: None,
        }
    }

    pub fn refresh_author(&mut self) {
        self.author = full_author(
            self.author_first.as_deref(),
            self.author_middle.as_deref(),
            self.author_last.as_deref(),
        );
    }
}

/// Input for [`crate::catalog::Catalog::add`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author_first: Option<String>,
    pub author_middle: Option<String>,
    pub author_last: Option<String>,
    pub length: Option<u32>,
    pub rating: Option<f64>,
    pub genre: Option<String>,
}

impl NewBook {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn by(mut self, first: &str, middle: &str, last: &str) -> Self {
        self.author_first = non_empty(first);
        self.author_middle = non_empty(middle);
        self.author_last = non_empty(last);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingEvent {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Start")]
    pub start: Option<NaiveDate>,
    #[serde(rename = "Finish")]
    pub finish: Option<NaiveDate>,
    #[serde(rename = "Reading Time")]
    pub reading_time: Option<i64>,
    #[serde(rename = "Rating")]
    pub rating: Option<u8>,
}

impl ReadingEvent {
    pub fn new(
        title: impl Into<String>,
        start: Option<NaiveDate>,
        finish: Option<NaiveDate>,
        rating: Option<u8>,
    ) -> Result<Self> {
        check_date_order(start, finish)?;
        if let Some(r) = rating {
            check_event_rating(r)?;
        }
        Ok(Self {
            title: title.into(),
            start,
            finish,
            reading_time: reading_time(start, finish),
            rating,
        })
    }

    pub fn refresh_reading_time(&mut self) {
        self.reading_time = reading_time(self.start, self.finish);
    }

    pub fn is_finished(&self) -> bool {
        self.finish.is_some()
    }
}

/// Editable catalog columns. `Times Read` and `Author` are derived and absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Title,
    AuthorFirst,
    AuthorMiddle,
    AuthorLast,
    Length,
    Rating,
    Genre,
}

impl BookField {
    pub const ALL: [BookField; 7] = [
        BookField::Title,
        BookField::AuthorFirst,
        BookField::AuthorMiddle,
        BookField::AuthorLast,
        BookField::Length,
        BookField::Rating,
        BookField::Genre,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::AuthorFirst => "Author FN",
            BookField::AuthorMiddle => "Author MN",
            BookField::AuthorLast => "Author LN",
            BookField::Length => "Length",
            BookField::Rating => "Rating",
            BookField::Genre => "Genre",
        }
    }

    pub fn is_name_part(&self) -> bool {
        matches!(
            self,
            BookField::AuthorFirst | BookField::AuthorMiddle | BookField::AuthorLast
        )
    }
}

impl fmt::Display for BookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingField {
    Title,
    Start,
    Finish,
    Rating,
}

impl ReadingField {
    pub const ALL: [ReadingField; 4] = [
        ReadingField::Title,
        ReadingField::Start,
        ReadingField::Finish,
        ReadingField::Rating,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReadingField::Title => "Title",
            ReadingField::Start => "Start",
            ReadingField::Finish => "Finish",
            ReadingField::Rating => "Rating",
        }
    }
}

impl fmt::Display for ReadingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The two persisted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Books,
    Reading,
}

impl Table {
    pub const ALL: [Table; 2] = [Table::Books, Table::Reading];

    pub fn file_name(&self) -> &'static str {
        match self {
            Table::Books => "books.csv",
            Table::Reading => "reading.csv",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Table::Books => "books",
            Table::Reading => "reading",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = ShelvesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "books" | "book" => Ok(Table::Books),
            "reading" | "readings" => Ok(Table::Reading),
            other => Err(ShelvesError::Store(format!("Unknown table: {}", other))),
        }
    }
}

/// Joins the present name parts: "First Last", or "First Middle Last" when a
/// middle name is given.
pub fn full_author(first: Option<&str>, middle: Option<&str>, last: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [first, middle, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Days spent reading, counting both the start and the finish day.
pub fn reading_time(start: Option<NaiveDate>, finish: Option<NaiveDate>) -> Option<i64> {
    match (start, finish) {
        (Some(s), Some(f)) => Some((f - s).num_days() + 1),
        _ => None,
    }
}

pub fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parses a date, treating blank input as "no date".
pub fn parse_date(field: &str, raw: &str) -> Result<Option<NaiveDate>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .map(Some)
        .ok_or_else(|| ShelvesError::invalid_value(field, raw, "expected a date like 2024-01-31"))
}

pub fn parse_event_rating(raw: &str) -> Result<Option<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let rating: u8 = trimmed.parse().map_err(|_| {
        ShelvesError::invalid_value("Rating", raw, "expected an integer between 1 and 5")
    })?;
    check_event_rating(rating)?;
    Ok(Some(rating))
}

pub fn parse_book_rating(raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let rating: f64 = trimmed
        .parse()
        .map_err(|_| ShelvesError::invalid_value("Rating", raw, "expected a number"))?;
    check_book_rating(rating)?;
    Ok(Some(rating))
}

pub fn parse_length(raw: &str) -> Result<Option<u32>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ShelvesError::invalid_value("Length", raw, "expected a whole page count"))
}

pub(crate) fn check_book_rating(rating: f64) -> Result<()> {
    if rating.is_finite() && (f64::from(MIN_RATING)..=f64::from(MAX_RATING)).contains(&rating) {
        Ok(())
    } else {
        Err(ShelvesError::invalid_value(
            "Rating",
            rating.to_string(),
            "must be between 1 and 5",
        ))
    }
}

fn check_event_rating(rating: u8) -> Result<()> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(ShelvesError::invalid_value(
            "Rating",
            rating.to_string(),
            "must be between 1 and 5",
        ))
    }
}

pub(crate) fn check_date_order(start: Option<NaiveDate>, finish: Option<NaiveDate>) -> Result<()> {
    if let (Some(s), Some(f)) = (start, finish) {
        if f < s {
            return Err(ShelvesError::invalid_value(
                "Finish",
                f.to_string(),
                format!("finish date is before start date {}", s),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn author_without_middle_name() {
        assert_eq!(
            full_author(Some("Frank"), None, Some("Herbert")).as_deref(),
            Some("Frank Herbert")
        );
        assert_eq!(
            full_author(Some("Frank"), Some(""), Some("Herbert")).as_deref(),
            Some("Frank Herbert")
        );
    }

    #[test]
    fn author_with_middle_name() {
        assert_eq!(
            full_author(Some("Ursula"), Some("K."), Some("Le Guin")).as_deref(),
            Some("Ursula K. Le Guin")
        );
    }

    #[test]
    fn author_absent_when_no_parts() {
        assert_eq!(full_author(None, None, None), None);
    }

    #[test]
    fn reading_time_counts_both_ends() {
        assert_eq!(
            reading_time(Some(date(2024, 1, 1)), Some(date(2024, 1, 10))),
            Some(10)
        );
        assert_eq!(
            reading_time(Some(date(2024, 3, 5)), Some(date(2024, 3, 5))),
            Some(1)
        );
    }

    #[test]
    fn reading_time_undefined_without_both_dates() {
        assert_eq!(reading_time(None, Some(date(2024, 1, 10))), None);
        assert_eq!(reading_time(Some(date(2024, 1, 1)), None), None);
        assert_eq!(reading_time(None, None), None);
    }

    #[test]
    fn reading_event_rejects_finish_before_start() {
        let err = ReadingEvent::new("Dune", Some(date(2024, 2, 1)), Some(date(2024, 1, 1)), None)
            .unwrap_err();
        assert!(matches!(err, ShelvesError::InvalidValue { .. }));
    }

    #[test]
    fn parses_supported_date_formats() {
        assert_eq!(parse_date("Start", "2024-01-31").unwrap(), Some(date(2024, 1, 31)));
        assert_eq!(parse_date("Start", "2024/01/31").unwrap(), Some(date(2024, 1, 31)));
        assert_eq!(parse_date("Start", "01/31/2024").unwrap(), Some(date(2024, 1, 31)));
        assert_eq!(parse_date("Start", "  ").unwrap(), None);
        assert!(parse_date("Start", "last tuesday").is_err());
    }

    #[test]
    fn event_rating_bounds() {
        assert_eq!(parse_event_rating("5").unwrap(), Some(5));
        assert_eq!(parse_event_rating("").unwrap(), None);
        assert!(parse_event_rating("0").is_err());
        assert!(parse_event_rating("6").is_err());
        assert!(parse_event_rating("4.5").is_err());
    }

    #[test]
    fn book_rating_accepts_fractions() {
        assert_eq!(parse_book_rating("4.5").unwrap(), Some(4.5));
        assert!(parse_book_rating("5.1").is_err());
        assert!(parse_book_rating("NaN").is_err());
    }

    #[test]
    fn table_from_str() {
        assert_eq!("books".parse::<Table>().unwrap(), Table::Books);
        assert_eq!("Reading".parse::<Table>().unwrap(), Table::Reading);
        assert!("authors".parse::<Table>().is_err());
    }
}
