//! Step-change statistics.
//!
//! A step exists only between two directly adjacent present values; a gap
//! breaks adjacency.

use serde::{Deserialize, Serialize};

/// Swing summary of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Volatility {
    /// Mean of |v[i] - v[i-1]| over adjacent present pairs (0 when no pairs).
    pub mean_abs_step: f64,
    /// Largest |v[i] - v[i-1]| (0 when no pairs).
    pub max_swing: f64,
    /// Steps whose magnitude is at least the requested threshold.
    pub significant_swings: usize,
    /// Number of adjacent present pairs.
    pub steps: usize,
}

/// Signed steps `v[i] - v[i-1]` between directly adjacent present values.
pub fn adjacent_steps(values: &[Option<f64>]) -> Vec<f64> {
    values
        .windows(2)
        .filter_map(|w| match (w[0], w[1]) {
            (Some(a), Some(b)) => Some(b - a),
            _ => None,
        })
        .collect()
}

/// Summarize swings, counting steps with magnitude `>= threshold`.
pub fn volatility(values: &[Option<f64>], threshold: f64) -> Volatility {
    let steps = adjacent_steps(values);
    if steps.is_empty() {
        return Volatility::default();
    }
    let abs: Vec<f64> = steps.iter().map(|s| s.abs()).collect();
    Volatility {
        mean_abs_step: abs.iter().sum::<f64>() / abs.len() as f64,
        max_swing: abs.iter().cloned().fold(0.0, f64::max),
        significant_swings: abs.iter().filter(|s| **s >= threshold).count(),
        steps: abs.len(),
    }
}

/// Mean absolute change between consecutive entries of an already compacted
/// series (gaps removed beforehand). Returns 0 for fewer than two values.
pub fn mean_abs_change(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let total: f64 = values.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    total / (values.len() - 1) as f64
}
