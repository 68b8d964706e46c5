use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelvesError {
    #[error("A book titled \"{0}\" already exists")]
    DuplicateTitle(String),

    #[error("No book titled \"{0}\"")]
    TitleNotFound(String),

    #[error("Position {position} is out of range (reading log has {len} entries)")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("Invalid value for {field}: \"{value}\" ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid menu selection: {0}")]
    InvalidMenuSelection(String),

    #[error("Input closed before the session finished")]
    InputClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl ShelvesError {
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShelvesError>;
