//! Error types for Name Trends.
//!
//! Every error carries a stable numeric code, a category and a short
//! remediation hint. Errors serialize to structured JSON for the CLI:
//! ```json
//! {
//!   "code": 30,
//!   "category": "join",
//!   "message": "label table missing column: archetype",
//!   "recoverable": true,
//!   "context": { "table": "archetypes.csv" }
//! }
//! ```
//!
//! Per-record data problems are not errors: they end up in the enrichment
//! report and the record receives fallback values.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for Name Trends operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Threshold and pipeline configuration.
    Config,
    /// Record snapshots and their contents.
    Data,
    /// External cluster/archetype label tables.
    Join,
    /// File I/O and serialization.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Data => write!(f, "data"),
            ErrorCategory::Join => write!(f, "join"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for Name Trends.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unsupported schema version: {0}")]
    SchemaVersion(String),

    // Data errors (20-29)
    #[error("snapshot is not a JSON array of name records: {0}")]
    InvalidSnapshot(String),

    #[error("snapshot mixes genders: expected {expected}, found {found}")]
    MixedGender { expected: String, found: String },

    // Join errors (30-39)
    #[error("label table missing column: {column}")]
    MissingColumn { column: String },

    #[error("label table row {line} is malformed: {reason}")]
    MalformedRow { line: usize, reason: String },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// - 10-19: Configuration errors
    /// - 20-29: Data errors
    /// - 30-39: Join errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::SchemaVersion(_) => 11,
            Error::InvalidSnapshot(_) => 20,
            Error::MixedGender { .. } => 21,
            Error::MissingColumn { .. } => 30,
            Error::MalformedRow { .. } => 31,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::SchemaVersion(_) => ErrorCategory::Config,
            Error::InvalidSnapshot(_) | Error::MixedGender { .. } => ErrorCategory::Data,
            Error::MissingColumn { .. } | Error::MalformedRow { .. } => ErrorCategory::Join,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether a rerun after fixing the input can succeed.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::SchemaVersion(_))
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => "Run 'nt-core check' to validate trends.json.",
            Error::SchemaVersion(_) => {
                "The configuration was written for a different release. Regenerate it from the defaults."
            }
            Error::InvalidSnapshot(_) => {
                "Snapshots must be a JSON array of name records, one file per gender."
            }
            Error::MixedGender { .. } => "Split the snapshot so each file holds a single gender.",
            Error::MissingColumn { .. } => "Check the CSV header row of the label table.",
            Error::MalformedRow { .. } => "Fix or remove the offending row of the label table.",
            Error::Io(_) => "Check that the path exists and is writable, then retry.",
            Error::Json(_) => "Invalid JSON in file. Check syntax with 'jq . <file>'.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::SchemaVersion(_) => "Unsupported Configuration Version",
            Error::InvalidSnapshot(_) => "Invalid Snapshot",
            Error::MixedGender { .. } => "Mixed Gender Snapshot",
            Error::MissingColumn { .. } => "Label Table Column Missing",
            Error::MalformedRow { .. } => "Malformed Label Table Row",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    pub code: u32,
    pub category: ErrorCategory,
    pub message: String,
    pub recoverable: bool,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();
        match err {
            Error::MixedGender { expected, found } => {
                context.insert("expected".to_string(), serde_json::json!(expected));
                context.insert("found".to_string(), serde_json::json!(found));
            }
            Error::MissingColumn { column } => {
                context.insert("column".to_string(), serde_json::json!(column));
            }
            Error::MalformedRow { line, .. } => {
                context.insert("line".to_string(), serde_json::json!(line));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}
