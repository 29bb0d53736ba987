//! Directory scanner: walks a root, parses every data file and collects the
//! records whose string fields contain the phrase.

use std::path::Path;

use rayon::prelude::*;
use serde_json::Value;
use walkdir::WalkDir;

use crate::error::{ScanErrorKind, ValidationError};
use crate::model::types::{FileEntry, MatchEntry, MatchResultSet, Record};
use crate::search::normalize::contains_phrase;
use crate::search::query::{Phrase, validate_root};

pub const DEFAULT_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Data file extension without the leading dot.
    pub extension: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

/// Outcome of reading a single candidate file.
#[derive(Debug)]
enum FileOutcome {
    Parsed {
        file: FileEntry,
        records: usize,
        hits: Vec<Record>,
    },
    /// Top-level value was valid JSON but not an array.
    Skipped(FileEntry),
    Failed(MatchEntry),
}

#[derive(Debug, Clone, Default)]
pub struct Scanner {
    opts: ScanOptions,
}

impl Scanner {
    pub fn new(opts: ScanOptions) -> Self {
        Self { opts }
    }

    /// Scan `root` for records matching `phrase`.
    ///
    /// Entries come back in traversal order (file names sorted at every
    /// directory level), records in file order. Per-file failures become
    /// error entries; only an invalid root is returned as `Err`.
    pub fn scan(&self, root: &Path, phrase: &Phrase) -> Result<MatchResultSet, ValidationError> {
        let root = validate_root(root)?;
        let span = tracing::info_span!(
            "scan",
            root = %root.display(),
            phrase = phrase.original()
        );
        let _enter = span.enter();
        tracing::info!("scan_start");

        let files = self.candidate_files(&root);
        let file_count = files.len();
        let needle = phrase.normalized();

        // Order of `collect` on an indexed parallel iterator matches the input.
        let outcomes: Vec<FileOutcome> = files
            .into_par_iter()
            .map(|file| scan_file(file, needle))
            .collect();

        let mut entries = Vec::new();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Parsed {
                    file,
                    records,
                    hits,
                } => {
                    tracing::debug!(
                        file = %file.relative_path,
                        records,
                        hits = hits.len(),
                        "file_scanned"
                    );
                    entries.extend(hits.into_iter().map(|record| MatchEntry::Hit {
                        file: file.clone(),
                        record,
                    }));
                }
                FileOutcome::Skipped(file) => {
                    tracing::debug!(file = %file.relative_path, "top-level value is not an array; skipped");
                }
                FileOutcome::Failed(entry) => {
                    if let MatchEntry::Error { kind, message, .. } = &entry {
                        tracing::warn!(%kind, "{message}");
                    }
                    entries.push(entry);
                }
            }
        }

        let result = MatchResultSet {
            phrase: phrase.original().to_string(),
            entries,
        };
        tracing::info!(
            files = file_count,
            hits = result.hit_count(),
            errors = result.error_count(),
            "scan_complete"
        );

        if result.entries.is_empty() {
            return Ok(MatchResultSet {
                entries: vec![MatchEntry::not_found(phrase.original())],
                ..result
            });
        }
        Ok(result)
    }

    /// Every file under `root` whose name ends with the data extension, in
    /// sorted traversal order.
    fn candidate_files(&self, root: &Path) -> Vec<FileEntry> {
        let suffix = format!(".{}", self.opts.extension);
        let mut out = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::warn!("skipping unreadable path: {err}");
                    continue;
                }
            };
            // Symlinks are not descended into, but a link that does not point
            // at a directory is read like a file (and fails if dangling).
            let file_type = entry.file_type();
            let is_file =
                file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir());
            if !is_file {
                continue;
            }
            if !entry.file_name().to_string_lossy().ends_with(&suffix) {
                continue;
            }
            let path = entry.path();
            out.push(FileEntry {
                path: path.to_path_buf(),
                relative_path: relative_path(root, path),
            });
        }
        out
    }
}

/// `path` relative to `root`, `/`-separated regardless of platform.
fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn scan_file(file: FileEntry, needle: &str) -> FileOutcome {
    let bytes = match std::fs::read(&file.path) {
        Ok(b) => b,
        Err(err) => {
            return FileOutcome::Failed(MatchEntry::error(file, ScanErrorKind::FileUnreadable, err));
        }
    };
    let value: Value = match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(err) => {
            return FileOutcome::Failed(MatchEntry::error(file, ScanErrorKind::MalformedData, err));
        }
    };
    let Value::Array(items) = value else {
        return FileOutcome::Skipped(file);
    };

    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(map) => records.push(map),
            other => {
                let reason = format!("element {idx} is {}, expected an object", json_kind(&other));
                return FileOutcome::Failed(MatchEntry::error(
                    file,
                    ScanErrorKind::MalformedData,
                    reason,
                ));
            }
        }
    }

    let total = records.len();
    let hits = records
        .into_iter()
        .filter(|r| record_matches(r, needle))
        .collect();
    FileOutcome::Parsed {
        file,
        records: total,
        hits,
    }
}

/// True when any string-valued field contains the normalized phrase.
pub fn record_matches(record: &Record, normalized_phrase: &str) -> bool {
    record
        .values()
        .filter_map(Value::as_str)
        .any(|s| contains_phrase(s, normalized_phrase))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
