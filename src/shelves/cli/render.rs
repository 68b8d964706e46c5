//! Terminal rendering for tables and command messages.
//!
//! Books are shown with the combined Author column only; the name parts stay
//! in the file. Reading rows carry their position in the full log, which is
//! the number the user types to pick an entry.

use colored::Colorize;
use shelves::api::{CmdMessage, MessageLevel};
use shelves::config::ShelvesConfig;
use shelves::model::{BookRecord, ReadingEvent};
use std::fmt::Display;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct BookRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Length")]
    length: String,
    #[tabled(rename = "Times Read")]
    times_read: u32,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Genre")]
    genre: String,
}

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "Finish")]
    finish: String,
    #[tabled(rename = "Days")]
    reading_time: String,
    #[tabled(rename = "Rating")]
    rating: String,
}

fn cell<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn styled<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

pub fn books_table(books: &[BookRecord]) -> String {
    if books.is_empty() {
        return "No books in the catalog.".to_string();
    }
    let rows: Vec<BookRow> = books
        .iter()
        .map(|b| BookRow {
            title: b.title.clone(),
            author: cell(&b.author),
            length: cell(&b.length),
            times_read: b.times_read,
            rating: b.rating.map(|r| format!("{:.1}", r)).unwrap_or_default(),
            genre: cell(&b.genre),
        })
        .collect();
    styled(rows)
}

pub fn readings_table(rows: &[(usize, ReadingEvent)], title: Option<&str>) -> String {
    if rows.is_empty() {
        return match title {
            Some(t) => format!("No readings of {}.", t),
            None => "The reading log is empty.".to_string(),
        };
    }
    let rows: Vec<ReadingRow> = rows
        .iter()
        .map(|(position, e)| ReadingRow {
            position: *position,
            title: e.title.clone(),
            start: cell(&e.start),
            finish: cell(&e.finish),
            reading_time: cell(&e.reading_time),
            rating: cell(&e.rating),
        })
        .collect();
    styled(rows)
}

pub fn config_lines(config: &ShelvesConfig) -> Vec<String> {
    config
        .list_all()
        .into_iter()
        .map(|(k, v)| format!("{} = {}", k, v))
        .collect()
}

pub fn format_message(message: &CmdMessage) -> String {
    match message.level {
        MessageLevel::Info => message.content.dimmed().to_string(),
        MessageLevel::Success => message.content.green().to_string(),
        MessageLevel::Warning => message.content.yellow().to_string(),
        MessageLevel::Error => message.content.red().to_string(),
    }
}

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        println!("{}", format_message(message));
    }
}
