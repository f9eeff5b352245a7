//! Historic-pattern rules over the 13 decadal ranks from the 1900s.
//!
//! "Top 100" means present on the list with a rank of 100 or better; an
//! unranked decade is an absence, never a large rank.

use nt_common::series::HISTORIC_DECADES;
use nt_common::{HistoricPattern, SeriesValue};
use nt_math::{adjacent_steps, max_streak, streaks};

use super::{first_match, Rule};

/// Everything the historic rules look at, computed once per record.
#[derive(Debug, Clone)]
pub struct HistoricFeatures {
    pub values: Vec<SeriesValue>,
    pub top100: Vec<bool>,
    pub top100_count: usize,
    pub top20_count: usize,
    pub ranked_count: usize,
    /// Longest run of decades outside the top 100.
    pub max_gap: usize,
    pub first_top100: Option<usize>,
}

impl HistoricFeatures {
    /// Returns `None` for series shorter than 13 decades.
    pub fn from_values(values: &[SeriesValue]) -> Option<Self> {
        if values.len() < HISTORIC_DECADES {
            return None;
        }
        let values = values[values.len() - HISTORIC_DECADES..].to_vec();
        let top100: Vec<bool> = values.iter().map(|v| v.within(100)).collect();
        Some(Self {
            top100_count: top100.iter().filter(|t| **t).count(),
            top20_count: values.iter().filter(|v| v.within(20)).count(),
            ranked_count: values.iter().filter(|v| v.is_present()).count(),
            max_gap: max_streak(&top100, |t| !*t),
            first_top100: top100.iter().position(|t| *t),
            top100,
            values,
        })
    }

    fn top100_in(&self, range: std::ops::Range<usize>) -> usize {
        self.top100[range].iter().filter(|t| **t).count()
    }

    fn absent_in(&self, range: std::ops::Range<usize>) -> usize {
        self.top100[range].iter().filter(|t| !**t).count()
    }

    fn recent(&self) -> std::ops::Range<usize> {
        self.values.len() - 3..self.values.len()
    }

    fn modern(&self) -> std::ops::Range<usize> {
        9..self.values.len()
    }
}

const EARLY: std::ops::Range<usize> = 0..4;
const MID: std::ops::Range<usize> = 3..7;
const LATE: std::ops::Range<usize> = 6..10;

fn century_classic(f: &HistoricFeatures) -> bool {
    f.top100_count >= 10 && f.max_gap <= 1
}

fn golden_age(f: &HistoricFeatures) -> bool {
    let dominated = streaks(&f.values, |v| v.within(20))
        .iter()
        .any(|s| (3..=5).contains(&s.length));
    dominated && f.top100_in(f.recent()) == 0
}

fn early_century(f: &HistoricFeatures) -> bool {
    f.top100_in(EARLY) >= 3 && f.absent_in(6..f.values.len()) >= 5
}

fn mid_century(f: &HistoricFeatures) -> bool {
    let peak = f.values[MID].iter().filter(|v| v.within(50)).count() >= 2;
    peak && (f.top100_in(EARLY) <= 1 || f.top100_in(7..f.values.len()) <= 1)
}

fn late_century(f: &HistoricFeatures) -> bool {
    f.top100_in(LATE) > 0 && f.top100_in(EARLY) == 0 && f.top100_in(f.modern()) > 0
}

fn modern_era(f: &HistoricFeatures) -> bool {
    f.first_top100.is_some_and(|i| i >= 9)
}

fn pendulum(f: &HistoricFeatures) -> bool {
    f.top100_in(0..3) > 0 && f.absent_in(3..8) >= 3 && f.top100_in(f.modern()) > 0
}

fn lost_generation(f: &HistoricFeatures) -> bool {
    f.top100_in(EARLY) > 0 && f.top100_in(4..f.values.len()) == 0
}

fn steady_decline(f: &HistoricFeatures) -> bool {
    if !f.top100[0] {
        return false;
    }
    let ranked: Vec<u32> = f.values.iter().filter_map(|v| v.get()).collect();
    let declines = ranked.windows(2).filter(|w| w[1] > w[0]).count();
    declines as f64 >= 0.6 * f.ranked_count as f64
}

fn steady_rise(f: &HistoricFeatures) -> bool {
    let started_low = !f.values[0].within(50);
    let now_high = f.values[f.recent()].iter().any(|v| v.within(50));
    if !(started_low && now_high) {
        return false;
    }
    let options: Vec<Option<f64>> = f.values.iter().map(|v| v.as_f64()).collect();
    let rises = adjacent_steps(&options).iter().filter(|s| **s < 0.0).count();
    rises as f64 >= 0.5 * f.ranked_count as f64
}

fn peak_and_fade(f: &HistoricFeatures) -> bool {
    let Some(peak) = f.values.iter().position(|v| v.within(10)) else {
        return false;
    };
    let end = (peak + 5).min(f.values.len());
    f.absent_in((peak + 1).min(end)..end) > 0
}

fn brief_moment(f: &HistoricFeatures) -> bool {
    (1..=3).contains(&f.top100_count)
}

fn resilient(f: &HistoricFeatures) -> bool {
    (7..=9).contains(&f.top100_count) && f.top20_count == 0
}

fn intermittent(f: &HistoricFeatures) -> bool {
    (4..=6).contains(&f.top100_count) && f.max_gap >= 2
}

fn revolutionary(f: &HistoricFeatures) -> bool {
    [5usize, 8]
        .iter()
        .any(|&i| !f.top100[i - 1] && f.values[i].within(50))
}

/// Ordered historic rules; the first match labels the record.
pub static HISTORIC_RULES: &[Rule<HistoricFeatures, HistoricPattern>] = &[
    Rule {
        label: HistoricPattern::CenturyClassic,
        description: "10+ top 100 decades, never out for more than one decade",
        test: century_classic,
    },
    Rule {
        label: HistoricPattern::GoldenAge,
        description: "a 3-5 decade top 20 run, out of the top 100 for the last 3 decades",
        test: golden_age,
    },
    Rule {
        label: HistoricPattern::EarlyCentury,
        description: "3+ top 100 decades before 1940, absent 5+ decades since 1960",
        test: early_century,
    },
    Rule {
        label: HistoricPattern::MidCentury,
        description: "2+ top 50 decades in 1930-1960, little presence before or after",
        test: mid_century,
    },
    Rule {
        label: HistoricPattern::LateCentury,
        description: "emerged in 1960-1990, absent before 1940, still in the top 100",
        test: late_century,
    },
    Rule {
        label: HistoricPattern::ModernEra,
        description: "first top 100 decade is the 1990s or later",
        test: modern_era,
    },
    Rule {
        label: HistoricPattern::Pendulum,
        description: "top 100 before 1930, absent mid-century, back since the 1990s",
        test: pendulum,
    },
    Rule {
        label: HistoricPattern::LostGeneration,
        description: "top 100 before 1940, never since",
        test: lost_generation,
    },
    Rule {
        label: HistoricPattern::SteadyDecline,
        description: "top 100 in the 1900s, slipping in 60% of ranked decades",
        test: steady_decline,
    },
    Rule {
        label: HistoricPattern::SteadyRise,
        description: "outside the top 50 in the 1900s, top 50 recently, mostly climbing",
        test: steady_rise,
    },
    Rule {
        label: HistoricPattern::PeakAndFade,
        description: "a top 10 decade followed by an absence within 4 decades",
        test: peak_and_fade,
    },
    Rule {
        label: HistoricPattern::BriefMoment,
        description: "1-3 top 100 decades",
        test: brief_moment,
    },
    Rule {
        label: HistoricPattern::Resilient,
        description: "7-9 top 100 decades, never top 20",
        test: resilient,
    },
    Rule {
        label: HistoricPattern::Intermittent,
        description: "4-6 top 100 decades with a gap of 2+ decades",
        test: intermittent,
    },
    Rule {
        label: HistoricPattern::Revolutionary,
        description: "jumped straight into the top 50 in the 1950s or 1980s",
        test: revolutionary,
    },
];

/// Label a decadal rank series. Short or missing series get
/// [`HistoricPattern::NoData`] without evaluating any rule.
pub fn classify_historic(values: &[SeriesValue]) -> HistoricPattern {
    match HistoricFeatures::from_values(values) {
        Some(features) => {
            first_match(HISTORIC_RULES, &features).unwrap_or(HistoricPattern::Uncategorized)
        }
        None => HistoricPattern::NoData,
    }
}
