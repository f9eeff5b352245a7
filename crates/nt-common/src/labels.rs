//! Closed label enumerations for the rule-based horizons.
//!
//! Labels are persisted as their display text (`"Slow Burn"`). Joined labels
//! from external archetype tables are free text and are kept as `String` on
//! the record; the constants at the bottom name the joined labels the
//! pipeline itself reacts to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pattern over the ~29-year recent rank series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecentPattern {
    #[serde(rename = "Timeless")]
    Timeless,
    #[serde(rename = "Steady Classic")]
    SteadyClassic,
    #[serde(rename = "Comeback")]
    Comeback,
    #[serde(rename = "Shooting Star")]
    ShootingStar,
    #[serde(rename = "Slow Burn")]
    SlowBurn,
    #[serde(rename = "Fading Glory")]
    FadingGlory,
    #[serde(rename = "Flash Trend")]
    FlashTrend,
    #[serde(rename = "Cultural Moment")]
    CulturalMoment,
    #[serde(rename = "Generational")]
    Generational,
    #[serde(rename = "Sleeper")]
    Sleeper,
    #[serde(rename = "Volatile")]
    Volatile,
    #[serde(rename = "New Entrant")]
    NewEntrant,
    #[serde(rename = "Vintage Revival")]
    VintageRevival,
    #[serde(rename = "Declining Classic")]
    DecliningClassic,
    #[serde(rename = "Uncategorized")]
    Uncategorized,
    #[serde(rename = "No Recent Data")]
    NoData,
}

impl RecentPattern {
    const ALL: [RecentPattern; 16] = [
        RecentPattern::Timeless,
        RecentPattern::SteadyClassic,
        RecentPattern::Comeback,
        RecentPattern::ShootingStar,
        RecentPattern::SlowBurn,
        RecentPattern::FadingGlory,
        RecentPattern::FlashTrend,
        RecentPattern::CulturalMoment,
        RecentPattern::Generational,
        RecentPattern::Sleeper,
        RecentPattern::Volatile,
        RecentPattern::NewEntrant,
        RecentPattern::VintageRevival,
        RecentPattern::DecliningClassic,
        RecentPattern::Uncategorized,
        RecentPattern::NoData,
    ];

    /// Every label in rule order, fallbacks last.
    pub fn all() -> &'static [RecentPattern] {
        &Self::ALL
    }

    pub fn label(self) -> &'static str {
        match self {
            RecentPattern::Timeless => "Timeless",
            RecentPattern::SteadyClassic => "Steady Classic",
            RecentPattern::Comeback => "Comeback",
            RecentPattern::ShootingStar => "Shooting Star",
            RecentPattern::SlowBurn => "Slow Burn",
            RecentPattern::FadingGlory => "Fading Glory",
            RecentPattern::FlashTrend => "Flash Trend",
            RecentPattern::CulturalMoment => "Cultural Moment",
            RecentPattern::Generational => "Generational",
            RecentPattern::Sleeper => "Sleeper",
            RecentPattern::Volatile => "Volatile",
            RecentPattern::NewEntrant => "New Entrant",
            RecentPattern::VintageRevival => "Vintage Revival",
            RecentPattern::DecliningClassic => "Declining Classic",
            RecentPattern::Uncategorized => UNCATEGORIZED,
            RecentPattern::NoData => "No Recent Data",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.label() == label)
    }
}

impl fmt::Display for RecentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pattern over the 13-decade historic rank series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HistoricPattern {
    #[serde(rename = "Century Classic")]
    CenturyClassic,
    #[serde(rename = "Golden Age")]
    GoldenAge,
    #[serde(rename = "Early Century")]
    EarlyCentury,
    #[serde(rename = "Mid-Century")]
    MidCentury,
    #[serde(rename = "Late Century")]
    LateCentury,
    #[serde(rename = "Modern Era")]
    ModernEra,
    #[serde(rename = "Pendulum")]
    Pendulum,
    #[serde(rename = "Lost Generation")]
    LostGeneration,
    #[serde(rename = "Steady Decline")]
    SteadyDecline,
    #[serde(rename = "Steady Rise")]
    SteadyRise,
    #[serde(rename = "Peak and Fade")]
    PeakAndFade,
    #[serde(rename = "Brief Moment")]
    BriefMoment,
    #[serde(rename = "Resilient")]
    Resilient,
    #[serde(rename = "Intermittent")]
    Intermittent,
    #[serde(rename = "Revolutionary")]
    Revolutionary,
    #[serde(rename = "Uncategorized")]
    Uncategorized,
    #[serde(rename = "No Historic Data")]
    NoData,
}

impl HistoricPattern {
    const ALL: [HistoricPattern; 17] = [
        HistoricPattern::CenturyClassic,
        HistoricPattern::GoldenAge,
        HistoricPattern::EarlyCentury,
        HistoricPattern::MidCentury,
        HistoricPattern::LateCentury,
        HistoricPattern::ModernEra,
        HistoricPattern::Pendulum,
        HistoricPattern::LostGeneration,
        HistoricPattern::SteadyDecline,
        HistoricPattern::SteadyRise,
        HistoricPattern::PeakAndFade,
        HistoricPattern::BriefMoment,
        HistoricPattern::Resilient,
        HistoricPattern::Intermittent,
        HistoricPattern::Revolutionary,
        HistoricPattern::Uncategorized,
        HistoricPattern::NoData,
    ];

    /// Every label in rule order, fallbacks last.
    pub fn all() -> &'static [HistoricPattern] {
        &Self::ALL
    }

    pub fn label(self) -> &'static str {
        match self {
            HistoricPattern::CenturyClassic => "Century Classic",
            HistoricPattern::GoldenAge => "Golden Age",
            HistoricPattern::EarlyCentury => "Early Century",
            HistoricPattern::MidCentury => "Mid-Century",
            HistoricPattern::LateCentury => "Late Century",
            HistoricPattern::ModernEra => "Modern Era",
            HistoricPattern::Pendulum => PENDULUM,
            HistoricPattern::LostGeneration => "Lost Generation",
            HistoricPattern::SteadyDecline => "Steady Decline",
            HistoricPattern::SteadyRise => "Steady Rise",
            HistoricPattern::PeakAndFade => "Peak and Fade",
            HistoricPattern::BriefMoment => "Brief Moment",
            HistoricPattern::Resilient => "Resilient",
            HistoricPattern::Intermittent => "Intermittent",
            HistoricPattern::Revolutionary => "Revolutionary",
            HistoricPattern::Uncategorized => UNCATEGORIZED,
            HistoricPattern::NoData => "No Historic Data",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.label() == label)
    }
}

impl fmt::Display for HistoricPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rule fallback shared by both rule-based horizons.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Five-year label when the name is absent from the five-year table.
pub const FIVE_YEAR_UNKNOWN: &str = "Unknown";

/// Recent label when the cluster retarget finds no cluster for the name.
pub const RECENT_CLUSTER_FALLBACK: &str = "Uncategorized recent pattern";

/// Joined historic archetypes rewritten by the refinement pass.
pub const INTERMITTENT_PRESENCE: &str = "Intermittent Presence";
pub const STEADY_CLASSIC: &str = "Steady Classic";

/// Refinement outcomes.
pub const VINTAGE_REVIVAL: &str = "Vintage Revival";
pub const PENDULUM: &str = "Pendulum";
pub const FALLEN_CLASSIC: &str = "Fallen Classic";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_roundtrip_through_text() {
        for p in RecentPattern::all() {
            assert_eq!(RecentPattern::from_label(p.label()), Some(*p));
        }
        for p in HistoricPattern::all() {
            assert_eq!(HistoricPattern::from_label(p.label()), Some(*p));
        }
    }

    #[test]
    fn serde_uses_display_text() {
        let json = serde_json::to_string(&RecentPattern::NoData).unwrap();
        assert_eq!(json, "\"No Recent Data\"");
        let back: HistoricPattern = serde_json::from_str("\"Mid-Century\"").unwrap();
        assert_eq!(back, HistoricPattern::MidCentury);
    }

    #[test]
    fn labels_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for p in RecentPattern::all() {
            assert!(seen.insert(p.label()));
        }
        let mut seen = std::collections::HashSet::new();
        for p in HistoricPattern::all() {
            assert!(seen.insert(p.label()));
        }
    }
}
