//! Error types for catalog and settings loading

use groundmap_core::ItemId;
use thiserror::Error;

/// Errors that abort loading the rule catalog
///
/// Everything else found while loading is reported as a warning in
/// [`LoadReport`](crate::LoadReport) and the offending directive is skipped.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Expected root node '{expected}', found '{found}'")]
    InvalidRoot { expected: String, found: String },
    #[error("Material '{material}' replaces a border with undefined item {item}")]
    UndefinedReplacement { material: String, item: ItemId },
}

/// Errors that can occur when reading or writing border settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}
