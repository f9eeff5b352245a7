//! Threshold configuration types for trends.json.
//!
//! Every field has a default so a partial file only overrides what it names.
//! Classifier rule thresholds are fixed and live with the rule lists; this
//! file covers the narrative heuristics and pipeline switches.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Complete trends.json configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TrendConfig {
    pub schema_version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub narrative: NarrativeThresholds,

    pub pipeline: PipelineOptions,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            narrative: NarrativeThresholds::default(),
            pipeline: PipelineOptions::default(),
        }
    }
}

impl TrendConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_str(&content)
    }

    /// Parse configuration from a JSON string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NarrativeThresholds {
    pub five_year: FiveYearThresholds,
    pub twenty_year: TwentyYearThresholds,
}

/// Heuristics for the "since 2020" sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FiveYearThresholds {
    /// Trailing years considered.
    pub window: usize,
    /// Missing years at which the name is reported as rare.
    pub rare_missing: usize,
    /// Fits below this R² are reported as flat.
    pub min_r_squared: f64,
    /// Mean count below which `small_mean_ratio` applies.
    pub small_mean_cutoff: f64,
    pub small_mean_ratio: f64,
    pub large_mean_ratio: f64,
}

impl Default for FiveYearThresholds {
    fn default() -> Self {
        Self {
            window: 5,
            rare_missing: 2,
            min_r_squared: 0.3,
            small_mean_cutoff: 100.0,
            small_mean_ratio: 0.10,
            large_mean_ratio: 0.05,
        }
    }
}

impl FiveYearThresholds {
    /// Minimum slope magnitude (births per year) that counts as a trend.
    pub fn slope_threshold(&self, mean: f64) -> f64 {
        let ratio = if mean < self.small_mean_cutoff {
            self.small_mean_ratio
        } else {
            self.large_mean_ratio
        };
        mean.abs() * ratio
    }
}

/// Heuristics for the "over the past 20 years" sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TwentyYearThresholds {
    pub window: usize,
    /// Ranked years needed before a shape is described.
    pub min_points: usize,
    /// Rank range at or below which the name counts as steady.
    pub steady_range: f64,
    /// Mean rank step at or below which the name counts as steady.
    pub steady_step: f64,
    /// Mean rank step above which the name counts as erratic.
    pub erratic_step: f64,
    /// Net rank movement that counts as a sustained gain or decline.
    pub trend_delta: f64,
    /// Last rank must fall below `first * gain_ratio` for a gain.
    pub gain_ratio: f64,
    /// Last rank must exceed `first * decline_ratio` for a decline.
    pub decline_ratio: f64,
    /// Peaks and valleys before this fraction of the window count as early.
    pub turn_position: f64,
    /// Last rank must exceed `best * fade_ratio` after an early peak.
    pub fade_ratio: f64,
    /// Last rank must fall below `worst * regain_ratio` after an early valley.
    pub regain_ratio: f64,
}

impl Default for TwentyYearThresholds {
    fn default() -> Self {
        Self {
            window: 20,
            min_points: 5,
            steady_range: 50.0,
            steady_step: 10.0,
            erratic_step: 40.0,
            trend_delta: 100.0,
            gain_ratio: 0.7,
            decline_ratio: 1.5,
            turn_position: 0.6,
            fade_ratio: 1.5,
            regain_ratio: 0.7,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PipelineOptions {
    pub retarget_scope: RetargetScope,
}

/// Which records the recent-pattern cluster retarget rewrites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RetargetScope {
    /// Every record takes its cluster label (or the fallback).
    #[default]
    All,
    /// Only records the rules left uncategorized.
    UncategorizedOnly,
}
