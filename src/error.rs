//! Error types shared by every pipeline stage.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a pipeline stage.
///
/// Statistical degeneracy is deliberately absent: see [`crate::stats::DegenerateSample`],
/// which the report stage converts into sentinel values instead of failing.
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("{}:{line}: {reason}", .path.display())]
    InputFormat {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("{}: word {word:?} has no total_count entry", .path.display())]
    MissingTotal { path: PathBuf, word: String },

    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Corpus {0} contains no words")]
    EmptyCorpus(String),

    #[error("Cannot sample {requested} documents from {available}")]
    SampleTooLarge { requested: usize, available: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = core::result::Result<T, CompareError>;

impl CompareError {
    pub(crate) fn format(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        CompareError::InputFormat {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }
}
