use crate::config::ShelvesConfig;
use crate::model::{BookRecord, ReadingEvent};
use crate::sync::SyncReport;
use std::path::PathBuf;

pub mod config;
pub mod doctor;
pub mod init;
pub mod manage_books;
pub mod manage_reading;
pub mod session;
pub mod view;

pub use session::{Mode, Prompter, SessionTrail, Stage};

/// Where configuration and data live.
#[derive(Debug, Clone)]
pub struct ShelvesPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl ShelvesPaths {
    pub fn new(config_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            data_dir: data_dir.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Structured outcome of a command. The CLI decides how to show it.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub books: Vec<BookRecord>,
    /// Reading events paired with their position in the log.
    pub readings: Vec<(usize, ReadingEvent)>,
    pub stages: Vec<Stage>,
    pub sync: Option<SyncReport>,
    pub config: Option<ShelvesConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_books(mut self, books: Vec<BookRecord>) -> Self {
        self.books = books;
        self
    }

    pub fn with_readings(mut self, readings: Vec<(usize, ReadingEvent)>) -> Self {
        self.readings = readings;
        self
    }

    pub fn with_config(mut self, config: ShelvesConfig) -> Self {
        self.config = Some(config);
        self
    }
}
