//! Name Trends common types and errors.
//!
//! This crate provides foundational types shared across nt-core modules:
//! - The two-case "ranked or unranked" series value
//! - Time series with calendar axes (yearly and decadal)
//! - The persisted name record shape
//! - Closed label enumerations for each classification horizon
//! - Common error types and output formats

pub mod error;
pub mod labels;
pub mod output;
pub mod record;
pub mod series;
pub mod value;

pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use labels::{HistoricPattern, RecentPattern};
pub use output::OutputFormat;
pub use record::{
    Classifications, EraProfile, Gender, HistoricProfile, NameRecord, RelatedName, SearchEntry,
    ShapeIssue,
};
pub use series::{Axis, SeriesPoint, TimeSeries};
pub use value::SeriesValue;

/// Schema version of the persisted record format.
pub const SCHEMA_VERSION: &str = "1.0.0";
