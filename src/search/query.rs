use std::path::{Path, PathBuf};

use crate::error::ValidationError;
use crate::search::normalize::normalize;

/// A validated search phrase.
///
/// Holds the text as the user typed it (trimmed) for display and its
/// normalized form for matching. Construct with [`Phrase::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    original: String,
    normalized: String,
}

impl Phrase {
    /// Validate raw user input.
    ///
    /// Empty input and input that is nothing but punctuation are rejected so
    /// that no scan is started for them.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let original = raw.trim();
        if original.is_empty() {
            return Err(ValidationError::EmptyPhrase);
        }
        let normalized = normalize(original);
        if normalized.is_empty() {
            return Err(ValidationError::PunctuationOnly);
        }
        Ok(Self {
            original: original.to_string(),
            normalized,
        })
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// Check that `root` exists and is a directory.
pub fn validate_root(root: &Path) -> Result<PathBuf, ValidationError> {
    if root.as_os_str().is_empty() {
        return Err(ValidationError::NoRoot);
    }
    if !root.exists() {
        return Err(ValidationError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ValidationError::RootNotDirectory(root.to_path_buf()));
    }
    Ok(root.to_path_buf())
}
