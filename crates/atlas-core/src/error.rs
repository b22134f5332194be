use std::path::PathBuf;

/// Errors from the data layer (CSV tables, mapping files).
///
/// Per-item failures during collection or extraction are handled where they
/// occur; these are the errors that make a whole input unusable.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("mapping file {path} has no {section:?} section")]
    MissingSection { path: PathBuf, section: &'static str },
    #[error("invalid numeric value {value:?} in {context}")]
    InvalidNumber { context: String, value: String },
}

pub type Result<T> = std::result::Result<T, DataError>;
