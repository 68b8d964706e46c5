//! # Update Sessions
//!
//! An update session is one load → mutate → persist cycle over a table:
//!
//! ```text
//! Idle → ModeSelected{Add,Edit,Remove} → Resolved → Mutated
//!      → [reading log only] Synchronized → Sorted → Persisted
//! ```
//!
//! [`SessionTrail`] enforces that order. Skipping a stage is an error, and
//! the table is not written.
//!
//! All user interaction goes through the [`Prompter`] trait, so sessions
//! can be driven by a terminal, a script, or a test.

use super::CmdMessage;
use crate::error::{Result, ShelvesError};
use crate::model::{BookRecord, ReadingEvent};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Add,
    Edit,
    Remove,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Add => f.write_str("add"),
            Mode::Edit => f.write_str("edit"),
            Mode::Remove => f.write_str("remove"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ModeSelected(Mode),
    Resolved,
    Mutated,
    Synchronized,
    Sorted,
    Persisted,
}

impl Stage {
    fn rank(&self) -> u8 {
        match self {
            Stage::Idle => 0,
            Stage::ModeSelected(_) => 1,
            Stage::Resolved => 2,
            Stage::Mutated => 3,
            Stage::Synchronized => 4,
            Stage::Sorted => 5,
            Stage::Persisted => 6,
        }
    }
}

/// Records the stages a session passes through.
#[derive(Debug, Clone)]
pub struct SessionTrail {
    synchronizes: bool,
    stages: Vec<Stage>,
}

impl SessionTrail {
    /// `synchronizes` is true for reading-log sessions, which must pass
    /// through [`Stage::Synchronized`].
    pub fn new(synchronizes: bool) -> Self {
        Self {
            synchronizes,
            stages: vec![Stage::Idle],
        }
    }

    pub fn current(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Idle)
    }

    pub fn advance(&mut self, next: Stage) -> Result<()> {
        let current = self.current();
        let mut expected = current.rank() + 1;
        if !self.synchronizes && expected == Stage::Synchronized.rank() {
            expected += 1;
        }
        if next.rank() != expected {
            return Err(ShelvesError::Store(format!(
                "session cannot move from {:?} to {:?}",
                current, next
            )));
        }
        debug!(from = ?current, to = ?next, "session stage");
        self.stages.push(next);
        Ok(())
    }

    pub fn into_stages(self) -> Vec<Stage> {
        self.stages
    }
}

/// The interactive collaborator a session talks to.
///
/// Implementations own input validation: `prompt_menu`, `prompt_title` (when
/// not adding), `prompt_choice` and `prompt_position` keep asking until they
/// get an acceptable answer. Field values are returned raw; the session
/// coerces them and asks again on failure.
pub trait Prompter {
    fn prompt_menu(&mut self) -> Result<Mode>;

    /// Reads a title. Unless `is_add`, the answer must be one of `known`.
    fn prompt_title(&mut self, known: &[String], is_add: bool) -> Result<String>;

    fn prompt_field(&mut self, name: &str) -> Result<String>;

    /// Returns the zero-based index of the chosen option.
    fn prompt_choice(&mut self, prompt: &str, options: &[String]) -> Result<usize>;

    /// Returns one of `positions`, as displayed by `render_readings`.
    fn prompt_position(&mut self, positions: &[usize]) -> Result<usize>;

    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    fn render_books(&mut self, books: &[BookRecord]);

    fn render_readings(&mut self, rows: &[(usize, ReadingEvent)], title: Option<&str>);

    fn notify(&mut self, message: &CmdMessage);
}

/// Asks for a field until `parse` accepts the answer, reporting each failure.
pub(crate) fn prompt_until<P, T, F>(prompter: &mut P, name: &str, mut parse: F) -> Result<T>
where
    P: Prompter + ?Sized,
    F: FnMut(&str) -> Result<T>,
{
    loop {
        let raw = prompter.prompt_field(name)?;
        match parse(&raw) {
            Ok(value) => return Ok(value),
            Err(err @ (ShelvesError::InvalidValue { .. } | ShelvesError::DuplicateTitle(_))) => {
                prompter.notify(&CmdMessage::warning(err.to_string()));
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod scripted {
    //! A [`Prompter`] that replays canned answers, for tests.

    use super::*;
    use std::collections::VecDeque;

    #[derive(Debug, Default)]
    pub struct ScriptedPrompter {
        answers: VecDeque<String>,
        pub rendered_books: Vec<Vec<BookRecord>>,
        pub rendered_readings: Vec<Vec<(usize, ReadingEvent)>>,
        pub messages: Vec<CmdMessage>,
    }

    impl ScriptedPrompter {
        pub fn new<I, S>(answers: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                answers: answers.into_iter().map(Into::into).collect(),
                ..Self::default()
            }
        }

        pub fn remaining(&self) -> usize {
            self.answers.len()
        }

        fn next(&mut self) -> Result<String> {
            self.answers.pop_front().ok_or(ShelvesError::InputClosed)
        }
    }

    impl Prompter for ScriptedPrompter {
        fn prompt_menu(&mut self) -> Result<Mode> {
            match self.next()?.as_str() {
                "1" | "add" => Ok(Mode::Add),
                "2" | "edit" => Ok(Mode::Edit),
                "3" | "remove" => Ok(Mode::Remove),
                other => Err(ShelvesError::InvalidMenuSelection(other.to_string())),
            }
        }

        fn prompt_title(&mut self, known: &[String], is_add: bool) -> Result<String> {
            loop {
                let title = self.next()?;
                if is_add || known.contains(&title) {
                    return Ok(title);
                }
            }
        }

        fn prompt_field(&mut self, _name: &str) -> Result<String> {
            self.next()
        }

        fn prompt_choice(&mut self, _prompt: &str, options: &[String]) -> Result<usize> {
            loop {
                let raw = self.next()?;
                if let Ok(n) = raw.parse::<usize>() {
                    if (1..=options.len()).contains(&n) {
                        return Ok(n - 1);
                    }
                }
            }
        }

        fn prompt_position(&mut self, positions: &[usize]) -> Result<usize> {
            loop {
                let raw = self.next()?;
                if let Ok(n) = raw.parse::<usize>() {
                    if positions.contains(&n) {
                        return Ok(n);
                    }
                }
            }
        }

        fn confirm(&mut self, _prompt: &str) -> Result<bool> {
            loop {
                match self.next()?.as_str() {
                    "y" | "Y" => return Ok(true),
                    "n" | "N" => return Ok(false),
                    _ => continue,
                }
            }
        }

        fn render_books(&mut self, books: &[BookRecord]) {
            self.rendered_books.push(books.to_vec());
        }

        fn render_readings(&mut self, rows: &[(usize, ReadingEvent)], _title: Option<&str>) {
            self.rendered_readings.push(rows.to_vec());
        }

        fn notify(&mut self, message: &CmdMessage) {
            self.messages.push(message.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_session_skips_synchronized() {
        let mut trail = SessionTrail::new(false);
        trail.advance(Stage::ModeSelected(Mode::Add)).unwrap();
        trail.advance(Stage::Resolved).unwrap();
        trail.advance(Stage::Mutated).unwrap();
        assert!(trail.advance(Stage::Synchronized).is_err());
        trail.advance(Stage::Sorted).unwrap();
        trail.advance(Stage::Persisted).unwrap();
        assert_eq!(trail.current(), Stage::Persisted);
    }

    #[test]
    fn reading_session_cannot_skip_synchronized() {
        let mut trail = SessionTrail::new(true);
        trail.advance(Stage::ModeSelected(Mode::Remove)).unwrap();
        trail.advance(Stage::Resolved).unwrap();
        trail.advance(Stage::Mutated).unwrap();
        assert!(trail.advance(Stage::Sorted).is_err());
        trail.advance(Stage::Synchronized).unwrap();
        trail.advance(Stage::Sorted).unwrap();
    }

    #[test]
    fn stages_cannot_repeat_or_go_back() {
        let mut trail = SessionTrail::new(true);
        trail.advance(Stage::ModeSelected(Mode::Edit)).unwrap();
        assert!(trail.advance(Stage::ModeSelected(Mode::Add)).is_err());
        assert!(trail.advance(Stage::Idle).is_err());
        assert!(trail.advance(Stage::Persisted).is_err());
    }
}
