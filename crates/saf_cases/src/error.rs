//! Error types for the case reader

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while processing one `cases.json` file.
///
/// Never fatal to the pass: the file is logged and skipped.
#[derive(Error, Debug)]
pub enum CaseFileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Case {case_id}: event is not a JSON object")]
    NotAnObject { case_id: String },

    #[error("Case {case_id}: missing 'date' field")]
    MissingDate { case_id: String },

    #[error("Case {case_id}: invalid date '{value}': {reason}")]
    InvalidDate {
        case_id: String,
        value: String,
        reason: String,
    },

    #[error("Failed to write output: {0}")]
    Output(#[source] io::Error),
}

/// Failure reading or writing the persisted dedup state.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("Failed to access state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed state file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
