//! Error types for the content repository.
//!
//! All errors are propagated via [`ContentError`], which wraps the
//! underlying parser errors with the file or record that failed. A load
//! either returns a complete [`Board`](trivia_board::Board) or one of these.

use std::path::PathBuf;

use trivia_board::BoardError;
use trivia_types::ModelError;

/// Errors that can occur while loading question content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The content file could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file extension does not name a known format.
    #[error("unsupported content format: {}", path.display())]
    UnsupportedFormat {
        /// The offending path.
        path: PathBuf,
    },

    /// A CSV parse error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON parse error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An XML parse error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// A record lacks a required field.
    #[error("record {record}: missing field {field}")]
    MissingField {
        /// 1-based record number.
        record: usize,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A point value is not a non-negative integer.
    #[error("record {record}: invalid point value {value:?}")]
    InvalidValue {
        /// 1-based record number.
        record: usize,
        /// The raw value.
        value: String,
    },

    /// A record describes an invalid question.
    #[error("record {record}: {source}")]
    Question {
        /// 1-based record number.
        record: usize,
        /// The model violation.
        source: ModelError,
    },

    /// The records do not form a valid board.
    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
}
