use super::session::prompt_until;
use super::{CmdMessage, CmdResult, Mode, Prompter, SessionTrail, Stage};
use crate::catalog::Catalog;
use crate::error::Result;
use crate::model::{non_empty, parse_book_rating, parse_length, BookField, BookRecord, NewBook};
use crate::reading_log::ReadingLog;
use crate::store::DataStore;
use tracing::debug;

const NEW_AUTHOR: &str = "New Author";

/// Runs one interactive update session over the catalog.
///
/// Reading entries follow their book: renaming a book retitles its entries
/// and removing a book removes them, so the log never points at a title the
/// catalog does not hold.
pub fn run<S, P>(store: &mut S, prompter: &mut P) -> Result<CmdResult>
where
    S: DataStore,
    P: Prompter + ?Sized,
{
    let mut trail = SessionTrail::new(false);
    let mut catalog = store.load_catalog()?;
    let mut log = store.load_reading_log()?;
    let mut log_changed = false;
    prompter.render_books(catalog.records());

    let mode = prompter.prompt_menu()?;
    trail.advance(Stage::ModeSelected(mode))?;

    let title = prompter.prompt_title(&catalog.titles(), mode == Mode::Add)?;
    trail.advance(Stage::Resolved)?;
    debug!(%mode, title = %title, "book session resolved");

    let mut result = CmdResult::default();
    match mode {
        Mode::Add if catalog.contains(&title) => {
            prompter.notify(&CmdMessage::warning(format!(
                "{} already exists in the catalog.",
                title
            )));
            let options = [
                "Edit the existing entry".to_string(),
                "Overwrite the data".to_string(),
            ];
            let choice = prompter.prompt_choice("What would you like to do?", &options)?;
            if choice == 0 {
                let edited = edit_book(&mut catalog, prompter, &title, &mut result)?;
                log_changed = follow_rename(&mut log, &title, &edited, &mut result);
            } else {
                let previous = catalog.remove(&title)?;
                add_book(&mut catalog, prompter, &title, &mut result)?;
                // Times read is owned by the reading log, not by this entry.
                if let Some(book) = catalog.get_mut(&title) {
                    book.times_read = previous.times_read;
                }
            }
        }
        Mode::Add => add_book(&mut catalog, prompter, &title, &mut result)?,
        Mode::Edit => {
            let edited = edit_book(&mut catalog, prompter, &title, &mut result)?;
            log_changed = follow_rename(&mut log, &title, &edited, &mut result);
        }
        Mode::Remove => {
            catalog.remove(&title)?;
            result.add_message(CmdMessage::success(format!("Removed {}", title)));
            let dropped = log.remove_title(&title);
            if !dropped.is_empty() {
                result.add_message(CmdMessage::info(format!(
                    "Removed {} reading entry(ies) for {}",
                    dropped.len(),
                    title
                )));
                log_changed = true;
            }
        }
    }
    trail.advance(Stage::Mutated)?;

    catalog.sort_for_persist();
    if log_changed {
        log.sort_for_persist();
    }
    trail.advance(Stage::Sorted)?;

    store.save_catalog(&catalog)?;
    if log_changed {
        store.save_reading_log(&log)?;
    }
    trail.advance(Stage::Persisted)?;

    result.stages = trail.into_stages();
    result.books = catalog.records().to_vec();
    Ok(result)
}

fn add_book<P: Prompter + ?Sized>(
    catalog: &mut Catalog,
    prompter: &mut P,
    title: &str,
    result: &mut CmdResult,
) -> Result<()> {
    prompter.notify(&CmdMessage::info(
        "Please enter the following optional information:",
    ));
    let mut book = NewBook::new(title);
    prompt_author(catalog, prompter, &mut book)?;
    book.length = prompt_until(prompter, "Book Length (Pages)", parse_length)?;
    book.rating = prompt_until(prompter, "Rating (1-5)", parse_book_rating)?;
    book.genre = non_empty(&prompter.prompt_field("Book Genre")?);

    let added = catalog.add(book)?;
    result.add_message(CmdMessage::success(format!("Added {}", added.title)));
    Ok(())
}

/// Asks for the last name first so an author already in the catalog can be
/// picked instead of retyped.
fn prompt_author<P: Prompter + ?Sized>(
    catalog: &Catalog,
    prompter: &mut P,
    book: &mut NewBook,
) -> Result<()> {
    let last = prompter.prompt_field("Author Last Name")?;
    book.author_last = non_empty(&last);

    let candidates: Vec<&BookRecord> = match book.author_last.as_deref() {
        Some(last) => catalog.authors_with_last_name(last),
        None => Vec::new(),
    };

    if !candidates.is_empty() {
        let mut options: Vec<String> = candidates
            .iter()
            .map(|b| b.author.clone().unwrap_or_default())
            .collect();
        options.push(NEW_AUTHOR.to_string());
        let choice = prompter.prompt_choice(
            "The author may already exist. Select an existing author or add a new one.",
            &options,
        )?;
        if let Some(existing) = candidates.get(choice) {
            book.author_first = existing.author_first.clone();
            book.author_middle = existing.author_middle.clone();
            return Ok(());
        }
    }

    book.author_first = non_empty(&prompter.prompt_field("Author First Name")?);
    book.author_middle = non_empty(&prompter.prompt_field("Author Middle Name (Optional)")?);
    Ok(())
}

/// Points the reading entries of a renamed book at its new title.
fn follow_rename(log: &mut ReadingLog, old: &str, new: &str, result: &mut CmdResult) -> bool {
    if old == new {
        return false;
    }
    let moved = log.retitle(old, new);
    if moved > 0 {
        debug!(old, new, moved, "reading entries retitled");
        result.add_message(CmdMessage::info(format!(
            "Moved {} reading entry(ies) to {}",
            moved, new
        )));
    }
    moved > 0
}

/// Returns the book's title after the edit.
fn edit_book<P: Prompter + ?Sized>(
    catalog: &mut Catalog,
    prompter: &mut P,
    title: &str,
    result: &mut CmdResult,
) -> Result<String> {
    let options: Vec<String> = BookField::ALL.iter().map(|f| f.to_string()).collect();
    let choice = prompter.prompt_choice("Which property would you like to edit?", &options)?;
    let field = BookField::ALL[choice];

    let prompt = format!("What is the new {} value?", field);
    let edited = prompt_until(prompter, &prompt, |raw| {
        catalog.edit(title, field, raw).map(|b| b.title.clone())
    })?;
    result.add_message(CmdMessage::success(format!("Updated {} of {}", field, edited)));
    Ok(edited)
}
