//! Name Trends configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for trends.json
//! - Config resolution (CLI → env → XDG → /etc → defaults)
//! - Semantic validation

pub mod resolve;
pub mod trends;
pub mod validate;

pub use resolve::{load_config, resolve_config, ConfigSource, LoadedConfig};
pub use trends::{
    FiveYearThresholds, NarrativeThresholds, PipelineOptions, RetargetScope, TrendConfig,
    TwentyYearThresholds,
};
pub use validate::{ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
