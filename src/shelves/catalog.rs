//! # Catalog Store
//!
//! The in-memory working copy of `books.csv`. Books are keyed by title; the
//! store refuses to hold two records with the same title.
//!
//! Mutations only touch memory. Persisting is a separate step taken by the
//! session once its single mutation (and, for reading sessions, the
//! synchronization pass) is done.

use crate::error::{Result, ShelvesError};
use crate::model::{
    check_book_rating, non_empty, parse_book_rating, parse_length, BookField, BookRecord, NewBook,
};
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    books: Vec<BookRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(books: Vec<BookRecord>) -> Self {
        Self { books }
    }

    pub fn add(&mut self, book: NewBook) -> Result<&BookRecord> {
        let title = book.title.trim().to_string();
        if title.is_empty() {
            return Err(ShelvesError::invalid_value(
                "Title",
                book.title,
                "title cannot be empty",
            ));
        }
        if self.contains(&title) {
            return Err(ShelvesError::DuplicateTitle(title));
        }
        if let Some(rating) = book.rating {
            check_book_rating(rating)?;
        }

        let mut record = BookRecord::stub(title);
        record.author_first = book.author_first.as_deref().and_then(non_empty);
        record.author_middle = book.author_middle.as_deref().and_then(non_empty);
        record.author_last = book.author_last.as_deref().and_then(non_empty);
        record.length = book.length;
        record.rating = book.rating;
        record.genre = book.genre.as_deref().and_then(non_empty);
        record.refresh_author();

        self.books.push(record);
        Ok(&self.books[self.books.len() - 1])
    }

    /// Applies raw user text to one field, coercing it to the field's type.
    /// Blank text clears optional fields.
    pub fn edit(&mut self, title: &str, field: BookField, raw: &str) -> Result<&BookRecord> {
        let idx = self.position_of(title)?;
        if field == BookField::Title {
            if let Some(new_title) = non_empty(raw) {
                if new_title != self.books[idx].title && self.contains(&new_title) {
                    return Err(ShelvesError::DuplicateTitle(new_title));
                }
            }
        }

        let book = &mut self.books[idx];
        match field {
            BookField::Title => {
                book.title = non_empty(raw).ok_or_else(|| {
                    ShelvesError::invalid_value("Title", raw, "title cannot be empty")
                })?;
            }
            BookField::AuthorFirst => book.author_first = non_empty(raw),
            BookField::AuthorMiddle => book.author_middle = non_empty(raw),
            BookField::AuthorLast => book.author_last = non_empty(raw),
            BookField::Length => book.length = parse_length(raw)?,
            BookField::Rating => book.rating = parse_book_rating(raw)?,
            BookField::Genre => book.genre = non_empty(raw),
        }
        if field.is_name_part() {
            book.refresh_author();
        }
        Ok(book)
    }

    pub fn remove(&mut self, title: &str) -> Result<BookRecord> {
        let idx = self.position_of(title)?;
        Ok(self.books.remove(idx))
    }

    /// Orders by author last name, then title. Books without a last name go
    /// to the end. The sort is stable, so re-sorting is a no-op.
    pub fn sort_for_persist(&mut self) -> &[BookRecord] {
        self.books.sort_by(compare_for_persist);
        &self.books
    }

    /// Inserts a title-only record if the title is unknown. Returns whether
    /// a stub was created.
    pub fn ensure_stub(&mut self, title: &str) -> bool {
        if self.contains(title) {
            return false;
        }
        self.books.push(BookRecord::stub(title));
        true
    }

    /// Distinct authors sharing a last name, in catalog order, with the
    /// record each was first seen on.
    pub fn authors_with_last_name(&self, last: &str) -> Vec<&BookRecord> {
        let mut seen: Vec<&str> = Vec::new();
        let mut found = Vec::new();
        for book in &self.books {
            if book.author_last.as_deref() != Some(last) {
                continue;
            }
            let Some(author) = book.author.as_deref() else {
                continue;
            };
            if !seen.contains(&author) {
                seen.push(author);
                found.push(book);
            }
        }
        found
    }

    pub fn get(&self, title: &str) -> Option<&BookRecord> {
        self.books.iter().find(|b| b.title == title)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut BookRecord> {
        self.books.iter_mut().find(|b| b.title == title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    pub fn titles(&self) -> Vec<String> {
        self.books.iter().map(|b| b.title.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BookRecord> {
        self.books.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BookRecord> {
        self.books.iter_mut()
    }

    pub fn records(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    fn position_of(&self, title: &str) -> Result<usize> {
        self.books
            .iter()
            .position(|b| b.title == title)
            .ok_or_else(|| ShelvesError::TitleNotFound(title.to_string()))
    }
}

fn compare_for_persist(a: &BookRecord, b: &BookRecord) -> Ordering {
    let by_last = match (&a.author_last, &b.author_last) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_last.then_with(|| a.title.cmp(&b.title))
}
