//! Ordinary least-squares line fitting.
//!
//! Used for slope-based trend detection over short windows (5 years of
//! counts) where the goodness of fit gates whether a slope is trusted.

use serde::{Deserialize, Serialize};

/// A single observation on the regression plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Result of a least-squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination in [0, 1].
    pub r_squared: f64,
}

impl Regression {
    /// Degenerate fit: a flat line through `level`.
    pub fn flat(level: f64) -> Self {
        Self {
            slope: 0.0,
            intercept: level,
            r_squared: 0.0,
        }
    }
}

/// Fit a line through `points` by ordinary least squares.
///
/// Fewer than two points, zero x-variance or a constant y all produce a flat
/// fit with slope 0 and R² 0. Non-finite inputs are ignored. The result never
/// contains NaN.
pub fn linear_regression(points: &[Point]) -> Regression {
    let finite: Vec<Point> = points
        .iter()
        .copied()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();

    let n = finite.len();
    if n == 0 {
        return Regression::flat(0.0);
    }

    let nf = n as f64;
    let mean_x = finite.iter().map(|p| p.x).sum::<f64>() / nf;
    let mean_y = finite.iter().map(|p| p.y).sum::<f64>() / nf;

    if n < 2 {
        return Regression::flat(mean_y);
    }

    let first_y = finite[0].y;
    if finite.iter().all(|p| p.y == first_y) {
        return Regression::flat(first_y);
    }

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for p in &finite {
        let dx = p.x - mean_x;
        let dy = p.y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return Regression::flat(mean_y);
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = ((sxy * sxy) / (sxx * syy)).clamp(0.0, 1.0);

    Regression {
        slope,
        intercept,
        r_squared,
    }
}

/// Turn an indexed sequence with gaps into regression points (x = index).
pub fn points_from_options(values: &[Option<f64>]) -> Vec<Point> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|y| Point::new(i as f64, y)))
        .collect()
}
