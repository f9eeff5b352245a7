//! Per-era summary of the decadal ranks and the era tags derived from it.

use nt_common::{EraProfile, HistoricProfile, SeriesValue, TimeSeries};

const EARLY: std::ops::Range<usize> = 0..5;
const MID: std::ops::Range<usize> = 5..8;
const END: std::ops::Range<usize> = 8..10;
const RECENT: std::ops::Range<usize> = 10..13;

pub const TAG_EARLY: &str = "Early 20th century";
pub const TAG_BOOMING: &str = "Booming";
pub const TAG_MILLENIAL: &str = "Millenial";
pub const TAG_MODERN: &str = "Modern era";
pub const TAG_VINTAGE_REVIVAL: &str = "Vintage revival";

/// 5 for a top 10 rank down to 1 for 76-100; 0 outside the top 100.
pub fn popularity(best_rank: Option<u32>) -> u8 {
    match best_rank {
        Some(1..=10) => 5,
        Some(11..=25) => 4,
        Some(26..=50) => 3,
        Some(51..=75) => 2,
        Some(76..=100) => 1,
        _ => 0,
    }
}

fn era(series: &TimeSeries, decades: std::ops::Range<usize>) -> EraProfile {
    let mut best: Option<(usize, u32)> = None;
    for index in decades {
        if let Some(rank) = series.get(index).get() {
            if best.map_or(true, |(_, b)| rank < b) {
                best = Some((index, rank));
            }
        }
    }
    EraProfile {
        best_rank: best.map(|(_, r)| r),
        best_decade: best.map(|(i, _)| series.to_decade_label(i)),
        popularity: popularity(best.map(|(_, r)| r)),
    }
}

/// `None` when the record has no decadal ranks at all.
pub fn historic_profile(rank_historic: &[SeriesValue]) -> Option<HistoricProfile> {
    if rank_historic.is_empty() {
        return None;
    }
    let series = TimeSeries::historic(rank_historic);
    Some(HistoricProfile {
        early_century: era(&series, EARLY),
        mid_century: era(&series, MID),
        end_century: era(&series, END),
        recent: era(&series, RECENT),
    })
}

/// Era tags: a single popular era, or the early-and-recent revival shape.
pub fn tags(profile: Option<&HistoricProfile>) -> Vec<String> {
    let Some(p) = profile else {
        return Vec::new();
    };
    let popular = [
        p.early_century.popularity > 0,
        p.mid_century.popularity > 0,
        p.end_century.popularity > 0,
        p.recent.popularity > 0,
    ];
    let tag = match popular {
        [true, false, false, false] => Some(TAG_EARLY),
        [false, true, false, false] => Some(TAG_BOOMING),
        [false, false, true, false] => Some(TAG_MILLENIAL),
        [false, false, false, true] => Some(TAG_MODERN),
        [true, false, false, true] => Some(TAG_VINTAGE_REVIVAL),
        _ => None,
    };
    tag.into_iter().map(String::from).collect()
}
