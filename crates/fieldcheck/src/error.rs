//! Error types for the fieldcheck library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fieldcheck operations.
///
/// Simple domain invalidity (an unknown language code, an impossible date)
/// is never an error: the validators report it as `false`. These variants
/// cover bad structure and bad setup.
#[derive(Debug, Error)]
pub enum FieldcheckError {
    /// A subvalue of a delimited field does not match its sub-grammar.
    #[error("Malformed {grammar} value at position {position} ('{segment}'): {reason}")]
    MalformedSegment {
        grammar: &'static str,
        position: usize,
        segment: String,
        reason: String,
    },

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file is not valid UTF-8.
    #[error("'{path}' must be encoded in ASCII or UTF-8")]
    Encoding { path: PathBuf },

    /// The requested worksheet is not present in the workbook.
    #[error("Worksheet '{worksheet}' not found in '{workbook}'")]
    WorksheetNotFound {
        worksheet: String,
        workbook: PathBuf,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error reading an Excel workbook.
    #[error("Excel error: {0}")]
    Excel(#[from] calamine::XlsxError),

    /// Empty file or no data to read.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON configuration could not be deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration could not be deserialized.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl FieldcheckError {
    /// Returns true if the error was caused by the user's data rather than the tool setup.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            FieldcheckError::MalformedSegment { .. } | FieldcheckError::EmptyData(_)
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FieldcheckError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for fieldcheck operations.
pub type Result<T> = std::result::Result<T, FieldcheckError>;
