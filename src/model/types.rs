use std::path::PathBuf;

use serde::Serialize;

use crate::error::ScanErrorKind;

/// One flat JSON object from a data file. Field order follows the file.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// A data file under the search root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Absolute (or root-joined) path on disk.
    pub path: PathBuf,
    /// Path relative to the search root, always `/`-separated.
    pub relative_path: String,
}

/// One item of a result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEntry {
    /// A record with at least one string field containing the phrase.
    Hit { file: FileEntry, record: Record },
    /// A file that could not be read or parsed.
    Error {
        file: FileEntry,
        kind: ScanErrorKind,
        message: String,
    },
    /// Nothing matched and nothing failed.
    NotFound { phrase: String, message: String },
}

impl MatchEntry {
    pub fn error(file: FileEntry, kind: ScanErrorKind, reason: impl std::fmt::Display) -> Self {
        let message = format!("Error reading {}: {reason}", file.relative_path);
        Self::Error {
            file,
            kind,
            message,
        }
    }

    pub fn not_found(phrase: &str) -> Self {
        Self::NotFound {
            phrase: phrase.to_string(),
            message: format!("Phrase '{phrase}' not found in text files."),
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Ordered output of one scan: hits and errors in traversal order, or a
/// single not-found marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResultSet {
    /// The phrase as entered, before normalization.
    pub phrase: String,
    pub entries: Vec<MatchEntry>,
}

impl MatchResultSet {
    pub fn hits(&self) -> impl Iterator<Item = (&FileEntry, &Record)> {
        self.entries.iter().filter_map(|e| match e {
            MatchEntry::Hit { file, record } => Some((file, record)),
            _ => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &MatchEntry> {
        self.entries.iter().filter(|e| e.is_error())
    }

    pub fn hit_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_hit()).count()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.entries.as_slice(), [MatchEntry::NotFound { .. }])
    }
}
