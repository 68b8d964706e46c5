//! The terminal side of an update session.
//!
//! [`TerminalPrompter`] reads answers line by line and keeps asking until an
//! answer is acceptable. End of input surfaces as
//! [`ShelvesError::InputClosed`], which abandons the session before anything
//! is written.

use super::render::{books_table, format_message, readings_table};
use shelves::api::{CmdMessage, Mode, Prompter};
use shelves::error::{Result, ShelvesError};
use shelves::model::{BookRecord, ReadingEvent};
use std::io::{BufRead, Write};
use tracing::warn;

pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(ShelvesError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// For the display-only hooks, which have no caller to report to.
    fn show(&mut self, text: &str) {
        if let Err(err) = self.say(text) {
            warn!(%err, "could not write to the terminal");
        }
    }

    fn list_options(&mut self, options: &[String]) -> Result<()> {
        for (i, option) in options.iter().enumerate() {
            self.say(&format!("  {}) {}", i + 1, option))?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn prompt_menu(&mut self) -> Result<Mode> {
        self.say("What would you like to do?")?;
        self.list_options(&["Add".to_string(), "Edit".to_string(), "Remove".to_string()])?;
        loop {
            let answer = self.ask("> ")?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "1" | "add" => return Ok(Mode::Add),
                "2" | "edit" => return Ok(Mode::Edit),
                "3" | "remove" => return Ok(Mode::Remove),
                _ => {
                    let err = ShelvesError::InvalidMenuSelection(answer);
                    self.say(&format!("{}. Please enter 1, 2 or 3.", err))?;
                }
            }
        }
    }

    fn prompt_title(&mut self, known: &[String], is_add: bool) -> Result<String> {
        loop {
            let title = self.ask("Title: ")?.trim().to_string();
            if title.is_empty() {
                self.say("A title is required.")?;
            } else if is_add || known.contains(&title) {
                return Ok(title);
            } else {
                let err = ShelvesError::TitleNotFound(title);
                self.say(&format!("{}. Please try again.", err))?;
            }
        }
    }

    fn prompt_field(&mut self, name: &str) -> Result<String> {
        self.ask(&format!("{}: ", name))
    }

    fn prompt_choice(&mut self, prompt: &str, options: &[String]) -> Result<usize> {
        self.say(prompt)?;
        self.list_options(options)?;
        loop {
            let answer = self.ask("> ")?;
            match answer.trim().parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => self.say(&format!(
                    "Please enter a number from 1 to {}.",
                    options.len()
                ))?,
            }
        }
    }

    fn prompt_position(&mut self, positions: &[usize]) -> Result<usize> {
        loop {
            let answer = self.ask("Entry #: ")?;
            match answer.trim().parse::<usize>() {
                Ok(n) if positions.contains(&n) => return Ok(n),
                _ => self.say("Please enter one of the numbers shown in the # column.")?,
            }
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        loop {
            let answer = self.ask(&format!("{} [y/n] ", prompt))?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Please answer y or n.")?,
            }
        }
    }

    fn render_books(&mut self, books: &[BookRecord]) {
        let table = books_table(books);
        self.show(&table);
    }

    fn render_readings(&mut self, rows: &[(usize, ReadingEvent)], title: Option<&str>) {
        let table = readings_table(rows, title);
        self.show(&table);
    }

    fn notify(&mut self, message: &CmdMessage) {
        let line = format_message(message);
        self.show(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(p: &TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8_lossy(&p.output).into_owned()
    }

    #[test]
    fn menu_reprompts_on_invalid_selection() {
        let mut p = prompter("4\nedit\n");
        assert_eq!(p.prompt_menu().unwrap(), Mode::Edit);
        assert!(output(&p).contains("Invalid menu selection: 4"));
    }

    #[test]
    fn title_must_be_known_unless_adding() {
        let known = vec!["Dune".to_string()];
        let mut p = prompter("Doon\nDune\n");
        assert_eq!(p.prompt_title(&known, false).unwrap(), "Dune");
        assert!(output(&p).contains("No book titled \"Doon\""));

        let mut p = prompter("Emma\n");
        assert_eq!(p.prompt_title(&known, true).unwrap(), "Emma");
    }

    #[test]
    fn choice_is_zero_based_and_bounded() {
        let options = vec!["a".to_string(), "b".to_string()];
        let mut p = prompter("0\n3\nx\n2\n");
        assert_eq!(p.prompt_choice("Pick", &options).unwrap(), 1);
    }

    #[test]
    fn position_must_be_listed() {
        let mut p = prompter("1\n2\n");
        assert_eq!(p.prompt_position(&[0, 2]).unwrap(), 2);
    }

    #[test]
    fn field_keeps_inner_whitespace_and_empty_answers() {
        let mut p = prompter("Science Fiction\r\n\n");
        assert_eq!(p.prompt_field("Genre").unwrap(), "Science Fiction");
        assert_eq!(p.prompt_field("Genre").unwrap(), "");
    }

    /// An output that refuses every write.
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_surface_as_io_errors() {
        let mut p = TerminalPrompter::new(Cursor::new(b"2\n".to_vec()), BrokenPipe);
        assert!(matches!(p.prompt_menu(), Err(ShelvesError::Io(_))));
        assert!(matches!(
            p.prompt_choice("Pick", &["a".to_string()]),
            Err(ShelvesError::Io(_))
        ));
        // Display-only hooks log and carry on.
        p.render_books(&[]);
        p.notify(&CmdMessage::info("still here"));
    }

    #[test]
    fn end_of_input_closes_the_session() {
        let mut p = prompter("maybe\n");
        assert!(matches!(p.confirm("Sure?"), Err(ShelvesError::InputClosed)));
    }
}
