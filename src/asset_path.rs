//! Asset path derivation for matched records.
//!
//! The audio dataset mirrors its asset tree in the JSON tree: a record in
//! `nier_audio_json/voice/ch01.json` with `"wav": "v_0001.wav"` refers to
//! the asset `voice/ch01/v_0001.wav`.

use serde::{Deserialize, Serialize};

use crate::model::types::Record;

pub const DEFAULT_STRIP_PREFIX: &str = "nier_audio_json/";
pub const DEFAULT_FIELD: &str = "wav";

/// How to turn a record's relative file path into an asset path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPathRule {
    /// Leading path segment removed when present.
    #[serde(default = "default_strip_prefix")]
    pub strip_prefix: String,
    /// Record field whose value names the asset file.
    #[serde(default = "default_field")]
    pub field: String,
    /// Data file extension removed from the end of the path.
    #[serde(skip)]
    pub extension: String,
}

fn default_strip_prefix() -> String {
    DEFAULT_STRIP_PREFIX.to_string()
}

fn default_field() -> String {
    DEFAULT_FIELD.to_string()
}

impl Default for AssetPathRule {
    fn default() -> Self {
        Self {
            strip_prefix: default_strip_prefix(),
            field: default_field(),
            extension: crate::search::scanner::DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl AssetPathRule {
    /// Derive the asset path for `record` found in `relative_path`.
    ///
    /// Returns `None` when the record has no asset field.
    pub fn derive(&self, relative_path: &str, record: &Record) -> Option<String> {
        let value = record.get(&self.field)?;
        let asset = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        let mut dir = relative_path;
        if !self.strip_prefix.is_empty()
            && let Some(rest) = dir.strip_prefix(self.strip_prefix.as_str())
        {
            dir = rest;
        }
        let suffix = format!(".{}", self.extension);
        if let Some(rest) = dir.strip_suffix(suffix.as_str()) {
            dir = rest;
        }
        let dir = dir.trim_start_matches('/');

        Some(format!("{dir}/{asset}"))
    }
}
