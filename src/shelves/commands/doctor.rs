use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DataStore;
use crate::sync;
use tracing::debug;

/// Recomputes every derived column from its sources and rewrites both tables.
pub fn run<S: DataStore>(store: &mut S) -> Result<CmdResult> {
    let mut catalog = store.load_catalog()?;
    let mut log = store.load_reading_log()?;
    let books_before = catalog.clone();

    let mut fixed_authors = 0;
    for book in catalog.iter_mut() {
        let before = book.author.clone();
        book.refresh_author();
        if book.author != before {
            fixed_authors += 1;
        }
    }

    let mut fixed_times = 0;
    for event in log.iter_mut() {
        let before = event.reading_time;
        event.refresh_reading_time();
        if event.reading_time != before {
            fixed_times += 1;
        }
    }

    let report = sync::synchronize_all(&mut catalog, &log);
    let fixed_counts = catalog
        .iter()
        .filter(|b| {
            books_before
                .get(&b.title)
                .map_or(false, |old| old.times_read != b.times_read || old.rating != b.rating)
        })
        .count();
    debug!(
        fixed_authors,
        fixed_times,
        fixed_counts,
        stubs = report.stubs_created.len(),
        "doctor pass"
    );

    catalog.sort_for_persist();
    log.sort_for_persist();
    store.save_catalog(&catalog)?;
    store.save_reading_log(&log)?;

    let mut result = CmdResult::default();
    if fixed_authors == 0 && fixed_times == 0 && fixed_counts == 0 && report.stubs_created.is_empty()
    {
        result.add_message(CmdMessage::success("No inconsistencies found."));
    } else {
        result.add_message(CmdMessage::warning("Inconsistencies found and fixed:"));
        if fixed_authors > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Rebuilt the author of {} book(s).",
                fixed_authors
            )));
        }
        if fixed_times > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Recomputed the reading time of {} entry(ies).",
                fixed_times
            )));
        }
        if fixed_counts > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Updated times read or rating of {} book(s).",
                fixed_counts
            )));
        }
        if !report.stubs_created.is_empty() {
            result.add_message(CmdMessage::info(format!(
                "  - Added catalog entries for {}.",
                report.stubs_created.join(", ")
            )));
        }
    }
    result.sync = Some(report);
    result.books = catalog.records().to_vec();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn clean_store_reports_nothing() {
        let mut store = StoreFixture::new()
            .with_book("Dune", "Frank", "Herbert")
            .with_reading("Dune", "2024-01-01", "2024-01-10", Some(5))
            .store;
        let result = run(&mut store).unwrap();
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].level, MessageLevel::Success);
    }

    #[test]
    fn repairs_drifted_derived_fields() {
        let mut store = StoreFixture::new()
            .with_book("Dune", "Frank", "Herbert")
            .with_reading("Dune", "2024-01-01", "2024-01-10", Some(4))
            .store;

        let mut catalog = store.load_catalog().unwrap();
        let dune = catalog.get_mut("Dune").unwrap();
        dune.author = Some("F. Herbert".to_string());
        dune.times_read = 7;
        dune.rating = Some(1.0);
        store.save_catalog(&catalog).unwrap();

        let mut log = store.load_reading_log().unwrap();
        log.iter_mut().for_each(|e| e.reading_time = Some(99));
        log.add("Solaris", None, None, Some(3)).unwrap();
        store.save_reading_log(&log).unwrap();

        let result = run(&mut store).unwrap();

        let catalog = store.load_catalog().unwrap();
        let dune = catalog.get("Dune").unwrap();
        assert_eq!(dune.author.as_deref(), Some("Frank Herbert"));
        assert_eq!(dune.times_read, 1);
        assert_eq!(dune.rating, Some(4.0));
        assert_eq!(catalog.get("Solaris").unwrap().rating, Some(3.0));
        assert_eq!(
            store.load_reading_log().unwrap().filter_by_title("Dune")[0].1.reading_time,
            Some(10)
        );
        assert_eq!(result.sync.unwrap().stubs_created, ["Solaris"]);
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
    }
}
