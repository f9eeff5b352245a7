//! Rank and count series with a calendar axis.
//!
//! A [`TimeSeries`] is an immutable run of [`SeriesValue`]s whose index 0
//! maps to a calendar position: a year for the recent series, a decade for
//! the historic one. Windows produce new series with the axis shifted so
//! labels stay correct.

use crate::value::SeriesValue;
use serde::Serialize;

/// Number of yearly positions in `rankFrom1996` / `countFrom1996`.
pub const RECENT_YEARS: usize = 29;
/// Calendar year of index 0 of the recent series.
pub const RECENT_BASE_YEAR: i32 = 1996;
/// Number of decades in `rankHistoric`.
pub const HISTORIC_DECADES: usize = 13;
/// First year of the decade at index 0 of the historic series.
pub const HISTORIC_BASE_DECADE: i32 = 1900;
/// The year the current rank/count describe.
pub const CURRENT_YEAR: i32 = RECENT_BASE_YEAR + RECENT_YEARS as i32 - 1;

/// Calendar mapping for series indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Axis {
    /// One position per year, `base` is the year of index 0.
    Yearly { base: i32 },
    /// One position per decade, `base` is the first year of decade 0.
    Decadal { base: i32 },
}

impl Axis {
    /// Calendar year at `index` (first year of the decade for decadal axes).
    pub fn year_at(self, index: usize) -> i32 {
        match self {
            Axis::Yearly { base } => base + index as i32,
            Axis::Decadal { base } => base + 10 * index as i32,
        }
    }

    fn shifted(self, by: usize) -> Axis {
        match self {
            Axis::Yearly { .. } => Axis::Yearly {
                base: self.year_at(by),
            },
            Axis::Decadal { .. } => Axis::Decadal {
                base: self.year_at(by),
            },
        }
    }
}

/// A present value together with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    /// Index within the series the point was taken from.
    pub index: usize,
    /// Calendar year (or decade start) of the index.
    pub year: i32,
    pub value: u32,
}

/// An immutable rank or count series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSeries {
    values: Vec<SeriesValue>,
    axis: Axis,
}

impl TimeSeries {
    pub fn new(values: Vec<SeriesValue>, axis: Axis) -> Self {
        Self { values, axis }
    }

    /// Yearly series starting at 1996.
    pub fn recent(values: &[SeriesValue]) -> Self {
        Self::new(
            values.to_vec(),
            Axis::Yearly {
                base: RECENT_BASE_YEAR,
            },
        )
    }

    /// Decadal series starting at the 1900s.
    pub fn historic(values: &[SeriesValue]) -> Self {
        Self::new(
            values.to_vec(),
            Axis::Decadal {
                base: HISTORIC_BASE_DECADE,
            },
        )
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn values(&self) -> &[SeriesValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`; out of range reads as unranked.
    pub fn get(&self, index: usize) -> SeriesValue {
        self.values
            .get(index)
            .copied()
            .unwrap_or(SeriesValue::Unranked)
    }

    /// Sub-series of up to `len` positions starting at `start`, clamped to
    /// the series bounds.
    pub fn windowed(&self, start: usize, len: usize) -> TimeSeries {
        let start = start.min(self.values.len());
        let end = start.saturating_add(len).min(self.values.len());
        TimeSeries {
            values: self.values[start..end].to_vec(),
            axis: self.axis.shifted(start),
        }
    }

    /// The trailing `n` positions (or the whole series when shorter).
    pub fn last(&self, n: usize) -> TimeSeries {
        let start = self.values.len().saturating_sub(n);
        self.windowed(start, n)
    }

    /// Present positions in order. Each call yields a fresh iterator.
    pub fn valid_points(&self) -> impl Iterator<Item = SeriesPoint> + '_ {
        self.values.iter().enumerate().filter_map(move |(index, v)| {
            v.get().map(|value| SeriesPoint {
                index,
                year: self.axis.year_at(index),
                value,
            })
        })
    }

    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_present()).count()
    }

    /// Positions satisfying `rank <= limit`.
    pub fn count_within(&self, limit: u32) -> usize {
        self.values.iter().filter(|v| v.within(limit)).count()
    }

    pub fn to_year(&self, index: usize) -> i32 {
        self.axis.year_at(index)
    }

    /// Decade label such as `"1950s"` for `index`.
    pub fn to_decade_label(&self, index: usize) -> String {
        let year = self.axis.year_at(index);
        format!("{}s", year - year.rem_euclid(10))
    }

    /// Values as optional floats for the statistics crate.
    pub fn as_options(&self) -> Vec<Option<f64>> {
        self.values.iter().map(|v| v.as_f64()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SeriesValue::{Present as P, Unranked as U};

    #[test]
    fn current_year_is_last_recent_index() {
        assert_eq!(CURRENT_YEAR, 2024);
        let s = TimeSeries::recent(&vec![U; RECENT_YEARS]);
        assert_eq!(s.to_year(RECENT_YEARS - 1), 2024);
    }

    #[test]
    fn decade_labels_start_at_1900s() {
        let s = TimeSeries::historic(&vec![U; HISTORIC_DECADES]);
        assert_eq!(s.to_decade_label(0), "1900s");
        assert_eq!(s.to_decade_label(5), "1950s");
        assert_eq!(s.to_decade_label(12), "2020s");
    }

    #[test]
    fn windows_shift_the_axis() {
        let s = TimeSeries::recent(&[P(1), P(2), U, P(4), P(5)]);
        let w = s.windowed(2, 2);
        assert_eq!(w.values(), &[U, P(4)]);
        assert_eq!(w.to_year(0), 1998);

        let tail = s.last(2);
        assert_eq!(tail.values(), &[P(4), P(5)]);
        assert_eq!(tail.to_year(1), 2000);
    }

    #[test]
    fn windows_clamp() {
        let s = TimeSeries::recent(&[P(1), P(2)]);
        assert_eq!(s.windowed(1, 10).len(), 1);
        assert!(s.windowed(5, 3).is_empty());
        assert_eq!(s.last(10).len(), 2);
    }

    #[test]
    fn valid_points_skip_unranked_and_restart() {
        let s = TimeSeries::historic(&[U, P(40), U, P(7)]);
        let first: Vec<_> = s.valid_points().collect();
        let second: Vec<_> = s.valid_points().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].index, 1);
        assert_eq!(first[0].year, 1910);
        assert_eq!(first[1].value, 7);
    }

    #[test]
    fn get_out_of_range_is_unranked() {
        let s = TimeSeries::recent(&[P(3)]);
        assert_eq!(s.get(0), P(3));
        assert_eq!(s.get(9), U);
    }

    #[test]
    fn as_options_mirrors_values() {
        let s = TimeSeries::recent(&[P(3), U]);
        assert_eq!(s.as_options(), vec![Some(3.0), None]);
        assert_eq!(s.present_count(), 1);
        assert_eq!(s.count_within(2), 0);
    }
}
