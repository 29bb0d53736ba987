use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Conditions that stop a search before any file is read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a phrase to search.")]
    EmptyPhrase,

    #[error("Phrase contains only punctuation. Please enter a valid phrase.")]
    PunctuationOnly,

    #[error("Please select a folder first.")]
    NoRoot,

    #[error("Folder not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Not a folder: {}", .0.display())]
    RootNotDirectory(PathBuf),
}

/// Per-file failure class. These never abort a scan; they become error
/// entries in the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanErrorKind {
    FileUnreadable,
    MalformedData,
}

impl std::fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileUnreadable => write!(f, "file_unreadable"),
            Self::MalformedData => write!(f, "malformed_data"),
        }
    }
}
