//! Search layer.
//!
//! - **[`normalize`]**: case and punctuation folding shared by phrase and fields.
//! - **[`query`]**: phrase and root validation.
//! - **[`scanner`]**: directory walk, per-file parsing and record matching.

pub mod normalize;
pub mod query;
pub mod scanner;

pub use query::Phrase;
pub use scanner::{ScanOptions, Scanner};
