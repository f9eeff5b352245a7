//! Recent-pattern rules over the 29 yearly ranks from 1996.

use nt_common::series::RECENT_YEARS;
use nt_common::{RecentPattern, SeriesValue};
use nt_math::{adjacent_steps, extrema, mean, population_std_dev, streaks, volatility};

use super::{first_match, Rule};

const EARLY: std::ops::Range<usize> = 0..10;
const MIDDLE: std::ops::Range<usize> = 10..20;
const RECENT_LEN: usize = 5;
const LAST7_LEN: usize = 7;
const SWING: f64 = 150.0;

/// Everything the recent rules look at, computed once per record.
#[derive(Debug, Clone)]
pub struct RecentFeatures {
    pub values: Vec<SeriesValue>,
    /// Present ranks in order.
    pub ranked: Vec<u32>,
    pub within_100: usize,
    pub within_200: usize,
    pub within_500: usize,
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub std_dev: Option<f64>,
    pub first: SeriesValue,
    pub last: SeriesValue,
    pub first_present_index: Option<usize>,
    pub early: Vec<SeriesValue>,
    pub middle: Vec<SeriesValue>,
    pub recent: Vec<SeriesValue>,
    pub last7: Vec<SeriesValue>,
    pub max_swing: f64,
    pub significant_swings: usize,
    /// Adjacent present pairs where the rank number went down.
    pub improving_steps: usize,
}

impl RecentFeatures {
    /// Returns `None` for series shorter than 29 years.
    pub fn from_values(values: &[SeriesValue]) -> Option<Self> {
        if values.len() < RECENT_YEARS {
            return None;
        }
        let values = values[values.len() - RECENT_YEARS..].to_vec();
        let options: Vec<Option<f64>> = values.iter().map(|v| v.as_f64()).collect();
        let ranked: Vec<u32> = values.iter().filter_map(|v| v.get()).collect();
        let swings = volatility(&options, SWING);
        let n = values.len();

        Some(Self {
            within_100: values.iter().filter(|v| v.within(100)).count(),
            within_200: values.iter().filter(|v| v.within(200)).count(),
            within_500: values.iter().filter(|v| v.within(500)).count(),
            min: ranked.iter().copied().min(),
            max: ranked.iter().copied().max(),
            std_dev: population_std_dev(&options),
            first: values[0],
            last: values[n - 1],
            first_present_index: values.iter().position(|v| v.is_present()),
            early: values[EARLY].to_vec(),
            middle: values[MIDDLE].to_vec(),
            recent: values[n - RECENT_LEN..].to_vec(),
            last7: values[n - LAST7_LEN..].to_vec(),
            max_swing: swings.max_swing,
            significant_swings: swings.significant_swings,
            improving_steps: adjacent_steps(&options).iter().filter(|s| **s < 0.0).count(),
            ranked,
            values,
        })
    }
}

fn as_options(values: &[SeriesValue]) -> Vec<Option<f64>> {
    values.iter().map(|v| v.as_f64()).collect()
}

fn timeless(f: &RecentFeatures) -> bool {
    f.within_100 >= 25 && f.std_dev.is_some_and(|s| s <= 20.0)
}

fn steady_classic(f: &RecentFeatures) -> bool {
    f.within_200 == f.values.len() && f.max.is_some_and(|m| m <= 300)
}

fn comeback(f: &RecentFeatures) -> bool {
    f.middle.iter().filter(|v| v.beyond(500)).count() >= 10
        && f.recent.iter().any(|v| v.within(200))
}

fn shooting_star(f: &RecentFeatures) -> bool {
    extrema(&as_options(&f.last7)).is_some_and(|e| e.range() >= 300.0) && f.last.within(200)
}

fn slow_burn(f: &RecentFeatures) -> bool {
    let (Some(first), Some(last)) = (f.first.get(), f.last.get()) else {
        return false;
    };
    first >= last + 200
        && f.ranked.len() >= 20
        && f.improving_steps as f64 >= 0.5 * f.ranked.len() as f64
}

fn fading_glory(f: &RecentFeatures) -> bool {
    f.early.iter().filter(|v| v.within(100)).count() >= 7 && f.last.get().is_some_and(|l| l >= 500)
}

fn flash_trend(f: &RecentFeatures) -> bool {
    let runs = streaks(&f.values, |v| v.within(100));
    let Some(run) = runs.iter().find(|r| (3..=5).contains(&r.length)) else {
        return false;
    };
    let Some(peak) = f.values[run.start..=run.end()].iter().filter_map(|v| v.get()).min() else {
        return false;
    };
    f.values[run.end() + 1..].iter().any(|v| v.beyond(peak + 200))
}

fn cultural_moment(f: &RecentFeatures) -> bool {
    let (Some(min), Some(max)) = (f.min, f.max) else {
        return false;
    };
    f.max_swing >= SWING && min <= 100 && max - min >= 300
}

fn generational(f: &RecentFeatures) -> bool {
    let early = mean(&as_options(&f.early));
    let recent = mean(&as_options(&f.recent));
    matches!((early, recent), (Some(e), Some(r)) if e <= 100.0 && r >= 400.0)
}

fn sleeper(f: &RecentFeatures) -> bool {
    let mid_table = f.ranked.iter().filter(|r| (200..=500).contains(*r)).count();
    mid_table >= 25 && f.min.is_some_and(|m| m >= 200)
}

fn volatile(f: &RecentFeatures) -> bool {
    f.significant_swings >= 3
}

fn new_entrant(f: &RecentFeatures) -> bool {
    f.first_present_index
        .is_some_and(|i| i >= f.values.len().saturating_sub(10))
}

fn vintage_revival(f: &RecentFeatures) -> bool {
    let gaps = f.values[5..20].iter().filter(|v| v.is_unranked()).count();
    gaps >= 10 && f.last.get().is_some_and(|l| l < 500)
}

fn declining_classic(f: &RecentFeatures) -> bool {
    let (Some(first), Some(last)) = (f.first.get(), f.last.get()) else {
        return false;
    };
    first <= 50 && last > first + 100 && last <= 300
}

/// Ordered recent rules; the first match labels the record.
pub static RECENT_RULES: &[Rule<RecentFeatures, RecentPattern>] = &[
    Rule {
        label: RecentPattern::Timeless,
        description: "25+ years in the top 100 with a rank std-dev of 20 or less",
        test: timeless,
    },
    Rule {
        label: RecentPattern::SteadyClassic,
        description: "every year in the top 200 and never worse than 300",
        test: steady_classic,
    },
    Rule {
        label: RecentPattern::Comeback,
        description: "10+ years outside the top 500 in 2006-2015, back in the top 200 recently",
        test: comeback,
    },
    Rule {
        label: RecentPattern::ShootingStar,
        description: "rank range of 300+ over the last 7 years, now in the top 200",
        test: shooting_star,
    },
    Rule {
        label: RecentPattern::SlowBurn,
        description: "improved 200+ places since 1996 with mostly improving years",
        test: slow_burn,
    },
    Rule {
        label: RecentPattern::FadingGlory,
        description: "7+ top 100 years in 1996-2005, now ranked 500 or worse",
        test: fading_glory,
    },
    Rule {
        label: RecentPattern::FlashTrend,
        description: "a 3-5 year top 100 run followed by a drop of 200+ places",
        test: flash_trend,
    },
    Rule {
        label: RecentPattern::CulturalMoment,
        description: "a single-year swing of 150+ and a top 100 peak within a 300+ range",
        test: cultural_moment,
    },
    Rule {
        label: RecentPattern::Generational,
        description: "averaged top 100 in 1996-2005, averages 400 or worse recently",
        test: generational,
    },
    Rule {
        label: RecentPattern::Sleeper,
        description: "25+ years ranked 200-500 and never better than 200",
        test: sleeper,
    },
    Rule {
        label: RecentPattern::Volatile,
        description: "3+ single-year swings of 150 places or more",
        test: volatile,
    },
    Rule {
        label: RecentPattern::NewEntrant,
        description: "first ranked within the last 10 years",
        test: new_entrant,
    },
    Rule {
        label: RecentPattern::VintageRevival,
        description: "10+ unranked years in 2001-2015, ranked better than 500 now",
        test: vintage_revival,
    },
    Rule {
        label: RecentPattern::DecliningClassic,
        description: "top 50 in 1996, slipped 100+ places but still in the top 300",
        test: declining_classic,
    },
];

/// Label a yearly rank series. Short or missing series get
/// [`RecentPattern::NoData`] without evaluating any rule.
pub fn classify_recent(values: &[SeriesValue]) -> RecentPattern {
    match RecentFeatures::from_values(values) {
        Some(features) => {
            first_match(RECENT_RULES, &features).unwrap_or(RecentPattern::Uncategorized)
        }
        None => RecentPattern::NoData,
    }
}
