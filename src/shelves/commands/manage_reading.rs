use super::session::prompt_until;
use super::{CmdMessage, CmdResult, Mode, Prompter, SessionTrail, Stage};
use crate::error::Result;
use crate::model::{parse_date, parse_event_rating, ReadingEvent, ReadingField};
use crate::reading_log::ReadingLog;
use crate::store::DataStore;
use crate::sync;
use tracing::debug;

/// Runs one interactive update session over the reading log.
///
/// Positions are resolved against the log exactly as loaded. The session
/// applies one mutation, synchronizes the catalog against the mutated log,
/// then sorts and writes both tables.
pub fn run<S, P>(store: &mut S, prompter: &mut P) -> Result<CmdResult>
where
    S: DataStore,
    P: Prompter + ?Sized,
{
    let mut trail = SessionTrail::new(true);
    let mut log = store.load_reading_log()?;
    let mut catalog = store.load_catalog()?;
    prompter.render_readings(&positioned(&log), None);

    let mode = prompter.prompt_menu()?;
    trail.advance(Stage::ModeSelected(mode))?;

    let title = prompter.prompt_title(&log.titles(), mode == Mode::Add)?;

    let mut result = CmdResult::default();
    let affected = match mode {
        Mode::Add if log.contains_title(&title) => {
            let prompt = format!(
                "An entry for {} already exists. Would you like to edit an entry instead?",
                title
            );
            if prompter.confirm(&prompt)? {
                let position = select_position(&log, prompter, &title)?;
                trail.advance(Stage::Resolved)?;
                edit_entry(&mut log, prompter, position, &mut result)?
            } else {
                trail.advance(Stage::Resolved)?;
                add_entry(&mut log, prompter, &title, &mut result)?
            }
        }
        Mode::Add => {
            trail.advance(Stage::Resolved)?;
            add_entry(&mut log, prompter, &title, &mut result)?
        }
        Mode::Edit => {
            let position = select_position(&log, prompter, &title)?;
            trail.advance(Stage::Resolved)?;
            edit_entry(&mut log, prompter, position, &mut result)?
        }
        Mode::Remove => {
            let position = select_position(&log, prompter, &title)?;
            trail.advance(Stage::Resolved)?;
            let removed = log.remove(position)?;
            result.add_message(CmdMessage::success(format!(
                "Removed reading entry {} for {}",
                position, removed.title
            )));
            vec![removed.title]
        }
    };
    trail.advance(Stage::Mutated)?;

    let report = sync::synchronize(&mut catalog, &log, &affected);
    for stub in &report.stubs_created {
        result.add_message(CmdMessage::info(format!(
            "{} was not in the catalog; added an entry for it.",
            stub
        )));
    }
    result.sync = Some(report);
    trail.advance(Stage::Synchronized)?;

    log.sort_for_persist();
    catalog.sort_for_persist();
    trail.advance(Stage::Sorted)?;

    store.save_catalog(&catalog)?;
    store.save_reading_log(&log)?;
    trail.advance(Stage::Persisted)?;

    result.stages = trail.into_stages();
    result.books = catalog.records().to_vec();
    result.readings = positioned(&log);
    Ok(result)
}

fn positioned(log: &ReadingLog) -> Vec<(usize, ReadingEvent)> {
    log.records().iter().cloned().enumerate().collect()
}

/// Shows the entries for a title with their true positions and asks for one.
fn select_position<P: Prompter + ?Sized>(
    log: &ReadingLog,
    prompter: &mut P,
    title: &str,
) -> Result<usize> {
    let rows: Vec<(usize, ReadingEvent)> = log
        .filter_by_title(title)
        .into_iter()
        .map(|(p, e)| (p, e.clone()))
        .collect();
    prompter.render_readings(&rows, Some(title));
    let positions: Vec<usize> = rows.iter().map(|(p, _)| *p).collect();
    let position = prompter.prompt_position(&positions)?;
    debug!(title, position, "reading entry selected");
    Ok(position)
}

fn add_entry<P: Prompter + ?Sized>(
    log: &mut ReadingLog,
    prompter: &mut P,
    title: &str,
    result: &mut CmdResult,
) -> Result<Vec<String>> {
    prompter.notify(&CmdMessage::info(
        "Please enter the following optional information for a new entry:",
    ));
    let start = prompt_until(prompter, "Start Date", |raw| parse_date("Start", raw))?;
    let finish = prompt_until(prompter, "Finish Date", |raw| {
        let finish = parse_date("Finish", raw)?;
        ReadingEvent::new(title, start, finish, None)?;
        Ok(finish)
    })?;
    let rating = prompt_until(prompter, "Rating (1-5)", parse_event_rating)?;

    let added = log.add(title, start, finish, rating)?;
    result.add_message(CmdMessage::success(format!(
        "Added a reading entry for {}",
        added.title
    )));
    Ok(vec![added.title.clone()])
}

/// Returns the titles whose derived fields may have changed: the entry's
/// title before the edit, and after it if it was renamed.
fn edit_entry<P: Prompter + ?Sized>(
    log: &mut ReadingLog,
    prompter: &mut P,
    position: usize,
    result: &mut CmdResult,
) -> Result<Vec<String>> {
    let before = log
        .get(position)
        .map(|e| e.title.clone())
        .unwrap_or_default();

    let options: Vec<String> = ReadingField::ALL.iter().map(|f| f.to_string()).collect();
    let choice = prompter.prompt_choice("Which property would you like to edit?", &options)?;
    let field = ReadingField::ALL[choice];

    let prompt = format!("What is the new {} value?", field);
    let after = prompt_until(prompter, &prompt, |raw| {
        log.edit(position, field, raw).map(|e| e.title.clone())
    })?;
    result.add_message(CmdMessage::success(format!(
        "Updated {} of reading entry {}",
        field, position
    )));

    let mut affected = vec![before];
    if !affected.contains(&after) {
        affected.push(after);
    }
    Ok(affected)
}
