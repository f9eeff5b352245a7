//! Bullet point 3: the shape of the last 20 years of ranks.

use nt_common::series::SeriesPoint;
use nt_common::NameRecord;
use nt_config::TwentyYearThresholds;
use nt_math::mean_abs_change;

use super::{render_first, Template};

/// Summary of the ranked years in the window.
#[derive(Debug, Clone)]
pub struct TwentyYearStats {
    pub name: String,
    pub first: SeriesPoint,
    pub last: SeriesPoint,
    /// Best rank (smallest number), earliest on ties.
    pub best: SeriesPoint,
    /// Worst rank (largest number), earliest on ties.
    pub worst: SeriesPoint,
    /// Position of `best` among the ranked years.
    pub best_position: usize,
    pub worst_position: usize,
    /// Number of ranked years.
    pub points: usize,
    /// Mean absolute change between consecutive ranked years.
    pub mean_step: f64,
    pub thresholds: TwentyYearThresholds,
}

impl TwentyYearStats {
    fn from_points(name: &str, points: &[SeriesPoint], t: &TwentyYearThresholds) -> Option<Self> {
        let first = *points.first()?;
        let last = *points.last()?;
        let mut best = (0, first);
        let mut worst = (0, first);
        for (i, p) in points.iter().enumerate() {
            if p.value < best.1.value {
                best = (i, *p);
            }
            if p.value > worst.1.value {
                worst = (i, *p);
            }
        }
        let ranks: Vec<f64> = points.iter().map(|p| f64::from(p.value)).collect();
        Some(Self {
            name: name.to_string(),
            first,
            last,
            best: best.1,
            worst: worst.1,
            best_position: best.0,
            worst_position: worst.0,
            points: points.len(),
            mean_step: mean_abs_change(&ranks),
            thresholds: t.clone(),
        })
    }

    fn range(&self) -> f64 {
        f64::from(self.worst.value - self.best.value)
    }

    /// `first - last`; positive when the name climbed.
    fn overall(&self) -> f64 {
        f64::from(self.first.value) - f64::from(self.last.value)
    }

    fn last_rank(&self) -> f64 {
        f64::from(self.last.value)
    }

    fn early(&self, position: usize) -> bool {
        (position as f64) < self.thresholds.turn_position * self.points as f64
    }
}

fn steady(s: &TwentyYearStats) -> bool {
    s.range() <= s.thresholds.steady_range && s.mean_step <= s.thresholds.steady_step
}

fn erratic(s: &TwentyYearStats) -> bool {
    s.mean_step > s.thresholds.erratic_step
}

fn gained(s: &TwentyYearStats) -> bool {
    s.overall() > s.thresholds.trend_delta
        && s.last_rank() < f64::from(s.first.value) * s.thresholds.gain_ratio
}

fn declined(s: &TwentyYearStats) -> bool {
    s.overall() < -s.thresholds.trend_delta
        && s.last_rank() > f64::from(s.first.value) * s.thresholds.decline_ratio
}

fn peaked_then_faded(s: &TwentyYearStats) -> bool {
    s.early(s.best_position) && s.last_rank() > f64::from(s.best.value) * s.thresholds.fade_ratio
}

fn dipped_then_recovered(s: &TwentyYearStats) -> bool {
    s.early(s.worst_position)
        && s.last_rank() < f64::from(s.worst.value) * s.thresholds.regain_ratio
}

fn always(_: &TwentyYearStats) -> bool {
    true
}

/// Ordered sentence shapes; the last one always applies.
pub static TWENTY_YEAR_TEMPLATES: &[Template<TwentyYearStats>] = &[
    Template {
        name: "steady",
        applies: steady,
        render: |s| {
            format!(
                "Over the past 20 years {} has maintained a steady ranking between #{} in {} and #{} in {}",
                s.name, s.best.value, s.best.year, s.worst.value, s.worst.year
            )
        },
    },
    Template {
        name: "erratic",
        applies: erratic,
        render: |s| {
            format!(
                "Over the past 20 years {} has jumped around erratically between #{} in {} and #{} in {}",
                s.name, s.best.value, s.best.year, s.worst.value, s.worst.year
            )
        },
    },
    Template {
        name: "gained",
        applies: gained,
        render: |s| {
            format!(
                "Over the past 20 years {} has steadily gained popularity from #{} in {} to #{} in {}",
                s.name, s.first.value, s.first.year, s.last.value, s.last.year
            )
        },
    },
    Template {
        name: "declined",
        applies: declined,
        render: |s| {
            format!(
                "Over the past 20 years {} has steadily declined in popularity from #{} in {} to #{} in {}",
                s.name, s.first.value, s.first.year, s.last.value, s.last.year
            )
        },
    },
    Template {
        name: "peaked",
        applies: peaked_then_faded,
        render: |s| {
            format!(
                "Over the past 20 years {} gained in popularity to #{} in {} but has since declined to #{} in {}",
                s.name, s.best.value, s.best.year, s.last.value, s.last.year
            )
        },
    },
    Template {
        name: "recovered",
        applies: dipped_then_recovered,
        render: |s| {
            format!(
                "Over the past 20 years {} dropped in popularity to #{} in {} but has since regained popularity to #{} in {}",
                s.name, s.worst.value, s.worst.year, s.last.value, s.last.year
            )
        },
    },
    Template {
        name: "cycled",
        applies: always,
        render: |s| {
            format!(
                "Over the past 20 years {} has cycled in and out of fashion achieving a peak of #{} in {} and a low of #{} in {}",
                s.name, s.best.value, s.best.year, s.worst.value, s.worst.year
            )
        },
    },
];

/// Stats for the trailing window, or `None` when the name has too few
/// ranked years to describe a shape.
pub fn twenty_year_stats(record: &NameRecord, t: &TwentyYearThresholds) -> Option<TwentyYearStats> {
    let window = record.recent_ranks().last(t.window);
    let points: Vec<SeriesPoint> = window.valid_points().collect();
    if points.len() < t.min_points {
        return None;
    }
    TwentyYearStats::from_points(record.name.trim(), &points, t)
}

pub fn twenty_year_trend(record: &NameRecord, t: &TwentyYearThresholds) -> Option<String> {
    let name = record.name.trim();
    if name.is_empty() || record.rank_from_1996.len() < t.window {
        return None;
    }
    match twenty_year_stats(record, t) {
        Some(stats) => render_first(TWENTY_YEAR_TEMPLATES, &stats),
        None => Some(format!(
            "Over the past 20 years {name} has had limited ranking data"
        )),
    }
}
