//! Error types for the block-state translator.

use thiserror::Error;

/// Result type alias using TranslationError.
pub type Result<T> = std::result::Result<T, TranslationError>;

/// Main error type for translation table generation.
///
/// Resolution itself never fails; these errors only come out of the
/// file boundaries (loading corpora and tables, writing documents).
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A corpus record is missing required fields.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Override tables could not be interpreted.
    #[error("Invalid override tables: {0}")]
    InvalidOverrides(String),

    /// A `name[state=value,...]` block string could not be parsed.
    #[error("Invalid block string: {0}")]
    InvalidBlockString(String),

    /// Failed to export the translation document.
    #[error("Export error: {0}")]
    Export(String),
}
