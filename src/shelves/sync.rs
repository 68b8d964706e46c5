//! # Synchronizer
//!
//! Keeps the catalog's derived columns in step with the reading log:
//!
//! - `Times Read` is the number of reading events for the title with a
//!   finish date.
//! - `Rating` is the mean of the rated events for the title, rounded to one
//!   decimal, or empty when no event carries a rating.
//!
//! Every reading-log mutation must be followed by [`synchronize`] over the
//! titles it touched, always against the log as it stands after the
//! mutation. A title with no catalog entry gets a stub record first, so no
//! reading event ever points at a missing book.

use crate::catalog::Catalog;
use crate::reading_log::ReadingLog;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub stubs_created: Vec<String>,
    pub titles_updated: Vec<String>,
}

impl SyncReport {
    fn merge_stub(&mut self, title: &str, created: bool) {
        if created && !self.stubs_created.iter().any(|t| t == title) {
            self.stubs_created.push(title.to_string());
        }
    }
}

pub fn recompute_times_read(catalog: &mut Catalog, log: &ReadingLog, title: &str) -> bool {
    let created = ensure_entry(catalog, title);
    let count = log
        .iter()
        .filter(|e| e.title == title && e.is_finished())
        .count();
    if let Some(book) = catalog.get_mut(title) {
        book.times_read = u32::try_from(count).unwrap_or(u32::MAX);
    }
    created
}

pub fn recompute_average_rating(catalog: &mut Catalog, log: &ReadingLog, title: &str) -> bool {
    let created = ensure_entry(catalog, title);
    let ratings: Vec<f64> = log
        .iter()
        .filter(|e| e.title == title)
        .filter_map(|e| e.rating)
        .map(f64::from)
        .collect();
    let average = if ratings.is_empty() {
        None
    } else {
        let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
        Some(round_one_decimal(mean))
    };
    if let Some(book) = catalog.get_mut(title) {
        book.rating = average;
    }
    created
}

/// The consistency pass run after a reading-log mutation.
pub fn synchronize<S: AsRef<str>>(
    catalog: &mut Catalog,
    log: &ReadingLog,
    titles: &[S],
) -> SyncReport {
    let mut report = SyncReport::default();
    for title in titles {
        let title = title.as_ref();
        if report.titles_updated.iter().any(|t| t == title) {
            continue;
        }
        let created = recompute_times_read(catalog, log, title);
        report.merge_stub(title, created);
        let created = recompute_average_rating(catalog, log, title);
        report.merge_stub(title, created);
        report.titles_updated.push(title.to_string());
        debug!(title, "synchronized derived catalog fields");
    }
    report
}

/// Recomputes everything: times read for every cataloged book, and both
/// derived fields for every title the log mentions. Ratings of books that
/// have never been logged are user-set and left alone.
pub fn synchronize_all(catalog: &mut Catalog, log: &ReadingLog) -> SyncReport {
    let logged = log.titles();
    let mut report = synchronize(catalog, log, &logged);
    for title in catalog.titles() {
        if logged.contains(&title) {
            continue;
        }
        recompute_times_read(catalog, log, &title);
        report.titles_updated.push(title);
    }
    report
}

fn ensure_entry(catalog: &mut Catalog, title: &str) -> bool {
    let created = catalog.ensure_stub(title);
    if created {
        warn!(title, "no catalog entry for logged title, created a stub");
    }
    created
}

/// Halves go to the even neighbour, so a mean of 4.25 is stored as 4.2.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
