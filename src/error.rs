use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid recording: {0}")]
    InvalidRecording(String),

    #[error("Invalid clock time '{0}' (expected HH.MM.SS)")]
    InvalidClockTime(String),

    #[error("Invalid number of signals: {0}")]
    InvalidSignalCount(i32),

    #[error("Invalid header size")]
    InvalidHeader,

    #[error("Invalid subject table: {0}")]
    InvalidSubjectTable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
