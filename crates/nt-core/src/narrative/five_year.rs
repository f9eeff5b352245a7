//! Bullet point 2: the trend since 2020.
//!
//! Birth counts are preferred. Records without a count series fall back to
//! ranks, negated so that a rising line still means rising popularity.

use nt_common::{NameRecord, SeriesValue};
use nt_config::FiveYearThresholds;
use nt_math::{linear_regression, mean, points_from_options};

use super::thousands;

/// Which series the window was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    Counts,
    Ranks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Gaining,
    Losing,
    Maintaining,
}

/// Window selected for the five-year sentence.
fn window(record: &NameRecord, size: usize) -> Option<(Basis, &[SeriesValue])> {
    let tail = |values: &[SeriesValue]| values.len() - size;
    if record.count_from_1996.len() >= size {
        let counts = &record.count_from_1996;
        Some((Basis::Counts, &counts[tail(counts)..]))
    } else if record.rank_from_1996.len() >= size {
        let ranks = &record.rank_from_1996;
        Some((Basis::Ranks, &ranks[tail(ranks)..]))
    } else {
        None
    }
}

/// Fit a line through the present values and decide the direction.
pub fn direction(values: &[Option<f64>], t: &FiveYearThresholds) -> Direction {
    let fit = linear_regression(&points_from_options(values));
    let Some(level) = mean(values) else {
        return Direction::Maintaining;
    };
    if fit.r_squared < t.min_r_squared {
        return Direction::Maintaining;
    }
    let threshold = t.slope_threshold(level.abs());
    if fit.slope > threshold {
        Direction::Gaining
    } else if fit.slope < -threshold {
        Direction::Losing
    } else {
        Direction::Maintaining
    }
}

pub fn five_year_trend(record: &NameRecord, t: &FiveYearThresholds) -> Option<String> {
    let name = record.name.trim();
    if name.is_empty() {
        return None;
    }
    let (basis, values) = window(record, t.window)?;
    let missing = values.iter().filter(|v| v.is_unranked()).count();
    let present: Vec<u32> = values.iter().filter_map(|v| v.get()).collect();
    if missing >= t.rare_missing || present.is_empty() {
        return Some(format!(
            "{name} is a very rare name and in recent years has been missing from the statistics"
        ));
    }

    let signed: Vec<Option<f64>> = values
        .iter()
        .map(|v| {
            v.as_f64().map(|x| match basis {
                Basis::Counts => x,
                Basis::Ranks => -x,
            })
        })
        .collect();
    let first = present[0];
    let last = present[present.len() - 1];
    let low = present.iter().copied().min().unwrap_or(first);
    let high = present.iter().copied().max().unwrap_or(first);

    let sentence = match (basis, direction(&signed, t)) {
        (Basis::Counts, Direction::Gaining) => format!(
            "Since 2020 {name} has been gaining popularity, rising from {} to {} births per year",
            thousands(first),
            thousands(last)
        ),
        (Basis::Counts, Direction::Losing) => format!(
            "Since 2020 {name} has been losing popularity, falling from {} to {} births per year",
            thousands(first),
            thousands(last)
        ),
        (Basis::Counts, Direction::Maintaining) => format!(
            "Since 2020 {name} has roughly maintained popularity between {} and {} births per year",
            thousands(low),
            thousands(high)
        ),
        (Basis::Ranks, Direction::Gaining) => {
            format!("Since 2020 {name} has been gaining popularity, climbing from #{first} to #{last}")
        }
        (Basis::Ranks, Direction::Losing) => {
            format!("Since 2020 {name} has been losing popularity, falling from #{first} to #{last}")
        }
        (Basis::Ranks, Direction::Maintaining) => {
            format!("Since 2020 {name} has roughly maintained popularity between #{low} and #{high}")
        }
    };
    Some(sentence)
}
