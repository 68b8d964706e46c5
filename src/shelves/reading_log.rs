//! # Reading Log Store
//!
//! The in-memory working copy of `reading.csv`.
//!
//! Reading events have no identifier of their own. They are addressed by
//! position, the zero-based row index in the unfiltered log. Removing or
//! sorting shifts positions, so a session resolves positions against the log
//! exactly as it was loaded, applies one mutation, and only then sorts.
//! [`ReadingLog::filter_by_title`] hands out those true positions so a
//! filtered view can be mapped back.

use crate::error::{Result, ShelvesError};
use crate::model::{
    check_date_order, non_empty, parse_date, parse_event_rating, ReadingEvent, ReadingField,
};
use chrono::NaiveDate;
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingLog {
    events: Vec<ReadingEvent>,
}

impl ReadingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(events: Vec<ReadingEvent>) -> Self {
        Self { events }
    }

    pub fn add(
        &mut self,
        title: &str,
        start: Option<NaiveDate>,
        finish: Option<NaiveDate>,
        rating: Option<u8>,
    ) -> Result<&ReadingEvent> {
        let title = non_empty(title)
            .ok_or_else(|| ShelvesError::invalid_value("Title", title, "title cannot be empty"))?;
        let event = ReadingEvent::new(title, start, finish, rating)?;
        self.events.push(event);
        Ok(&self.events[self.events.len() - 1])
    }

    /// Applies raw user text to one field. Reading time is recomputed after
    /// any date change; an edit that would put Finish before Start is rejected
    /// and leaves the event untouched.
    pub fn edit(&mut self, position: usize, field: ReadingField, raw: &str) -> Result<&ReadingEvent> {
        self.check_position(position)?;
        let event = &mut self.events[position];

        match field {
            ReadingField::Title => {
                event.title = non_empty(raw).ok_or_else(|| {
                    ShelvesError::invalid_value("Title", raw, "title cannot be empty")
                })?;
            }
            ReadingField::Start => {
                let start = parse_date("Start", raw)?;
                check_date_order(start, event.finish)?;
                event.start = start;
                event.refresh_reading_time();
            }
            ReadingField::Finish => {
                let finish = parse_date("Finish", raw)?;
                check_date_order(event.start, finish)?;
                event.finish = finish;
                event.refresh_reading_time();
            }
            ReadingField::Rating => event.rating = parse_event_rating(raw)?,
        }
        Ok(event)
    }

    pub fn remove(&mut self, position: usize) -> Result<ReadingEvent> {
        self.check_position(position)?;
        Ok(self.events.remove(position))
    }

    /// Moves every event logged under `old` to `new`. Returns how many moved.
    pub fn retitle(&mut self, old: &str, new: &str) -> usize {
        let mut moved = 0;
        for event in self.events.iter_mut().filter(|e| e.title == old) {
            event.title = new.to_string();
            moved += 1;
        }
        moved
    }

    /// Drops every event for `title`, returning them in log order.
    pub fn remove_title(&mut self, title: &str) -> Vec<ReadingEvent> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.events)
            .into_iter()
            .partition(|e| e.title == title);
        self.events = kept;
        removed
    }

    pub fn filter_by_title(&self, title: &str) -> Vec<(usize, &ReadingEvent)> {
        self.events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.title == title)
            .collect()
    }

    /// Orders by finish date, then start date. Missing dates sort last at
    /// each level.
    pub fn sort_for_persist(&mut self) -> &[ReadingEvent] {
        self.events.sort_by(compare_for_persist);
        &self.events
    }

    pub fn get(&self, position: usize) -> Option<&ReadingEvent> {
        self.events.get(position)
    }

    pub fn contains_title(&self, title: &str) -> bool {
        self.events.iter().any(|e| e.title == title)
    }

    /// Distinct titles in log order.
    pub fn titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = Vec::new();
        for event in &self.events {
            if !titles.contains(&event.title) {
                titles.push(event.title.clone());
            }
        }
        titles
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReadingEvent> {
        self.events.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ReadingEvent> {
        self.events.iter_mut()
    }

    pub fn records(&self) -> &[ReadingEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn check_position(&self, position: usize) -> Result<()> {
        if position < self.events.len() {
            Ok(())
        } else {
            Err(ShelvesError::PositionOutOfRange {
                position,
                len: self.events.len(),
            })
        }
    }
}

fn missing_last(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_for_persist(a: &ReadingEvent, b: &ReadingEvent) -> Ordering {
    missing_last(a.finish, b.finish).then_with(|| missing_last(a.start, b.start))
}
