//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::trends::{FiveYearThresholds, TrendConfig, TwentyYearThresholds};

/// Length of the yearly series the narrative windows are taken from.
const RECENT_SERIES_LEN: usize = 29;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate trends.json semantically.
pub fn validate_trends(config: &TrendConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    validate_five_year(&config.narrative.five_year)?;
    validate_twenty_year(&config.narrative.twenty_year)?;

    Ok(())
}

fn validate_five_year(t: &FiveYearThresholds) -> ValidationResult<()> {
    let prefix = "narrative.five_year";
    validate_window(&format!("{}.window", prefix), t.window)?;
    if t.rare_missing == 0 || t.rare_missing > t.window {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.rare_missing", prefix),
            message: format!("Must be in [1, window={}], got {}", t.window, t.rare_missing),
        });
    }
    validate_unit(&format!("{}.min_r_squared", prefix), t.min_r_squared, true)?;
    validate_non_negative(&format!("{}.small_mean_cutoff", prefix), t.small_mean_cutoff)?;
    validate_unit(&format!("{}.small_mean_ratio", prefix), t.small_mean_ratio, false)?;
    validate_unit(&format!("{}.large_mean_ratio", prefix), t.large_mean_ratio, false)?;
    Ok(())
}

fn validate_twenty_year(t: &TwentyYearThresholds) -> ValidationResult<()> {
    let prefix = "narrative.twenty_year";
    validate_window(&format!("{}.window", prefix), t.window)?;
    if t.min_points < 2 || t.min_points > t.window {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.min_points", prefix),
            message: format!("Must be in [2, window={}], got {}", t.window, t.min_points),
        });
    }
    for (name, value) in [
        ("steady_range", t.steady_range),
        ("steady_step", t.steady_step),
        ("erratic_step", t.erratic_step),
        ("trend_delta", t.trend_delta),
    ] {
        validate_non_negative(&format!("{}.{}", prefix, name), value)?;
    }
    if t.steady_step > t.erratic_step {
        return Err(ValidationError::SemanticError(format!(
            "{prefix}.steady_step ({}) must not exceed {prefix}.erratic_step ({})",
            t.steady_step, t.erratic_step
        )));
    }
    validate_unit(&format!("{}.gain_ratio", prefix), t.gain_ratio, false)?;
    validate_unit(&format!("{}.regain_ratio", prefix), t.regain_ratio, false)?;
    validate_unit(&format!("{}.turn_position", prefix), t.turn_position, false)?;
    validate_above_one(&format!("{}.decline_ratio", prefix), t.decline_ratio)?;
    validate_above_one(&format!("{}.fade_ratio", prefix), t.fade_ratio)?;
    Ok(())
}

fn validate_window(field: &str, window: usize) -> ValidationResult<()> {
    if window < 2 || window > RECENT_SERIES_LEN {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be in [2, {}], got {}", RECENT_SERIES_LEN, window),
        });
    }
    Ok(())
}

/// `[0, 1]` when `allow_zero`, otherwise `(0, 1]`.
fn validate_unit(field: &str, value: f64, allow_zero: bool) -> ValidationResult<()> {
    let low_ok = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if !value.is_finite() || !low_ok || value > 1.0 {
        let range = if allow_zero { "[0, 1]" } else { "(0, 1]" };
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be in {}, got {}", range, value),
        });
    }
    Ok(())
}

fn validate_non_negative(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be non-negative, got {}", value),
        });
    }
    Ok(())
}

fn validate_above_one(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 1.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be greater than 1, got {}", value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(validate_trends(&TrendConfig::default()).is_ok());
    }

    #[test]
    fn unit_bounds() {
        assert!(validate_unit("f", 0.0, true).is_ok());
        assert!(validate_unit("f", 0.0, false).is_err());
        assert!(validate_unit("f", 1.5, true).is_err());
        assert!(validate_unit("f", f64::NAN, true).is_err());
    }

    #[test]
    fn window_longer_than_series_rejected() {
        let mut config = TrendConfig::default();
        config.narrative.twenty_year.window = 40;
        let err = validate_trends(&config).unwrap_err();
        assert_eq!(err.code(), 65);
        assert!(err.to_string().contains("narrative.twenty_year.window"));
    }

    #[test]
    fn steady_step_above_erratic_step_rejected() {
        let mut config = TrendConfig::default();
        config.narrative.twenty_year.steady_step = 60.0;
        assert!(matches!(
            validate_trends(&config),
            Err(ValidationError::SemanticError(_))
        ));
    }

    #[test]
    fn version_mismatch_rejected() {
        let config = TrendConfig {
            schema_version: "0.9.0".into(),
            ..TrendConfig::default()
        };
        assert!(matches!(
            validate_trends(&config),
            Err(ValidationError::VersionMismatch { .. })
        ));
    }
}
