//! The persisted name record and its nested shapes.
//!
//! Field names follow the snapshot format consumed by the site generator:
//! camelCase, with a few hyphenated keys kept for compatibility. Fields this
//! crate does not know about are carried in [`NameRecord::extra`] so a
//! rewrite never drops upstream data.

use crate::series::{TimeSeries, HISTORIC_DECADES, RECENT_YEARS};
use crate::value::{lenient, nullable, SeriesValue};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Gender partition of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum Gender {
    #[serde(alias = "boy", alias = "M", alias = "m", alias = "male")]
    Boy,
    #[serde(alias = "girl", alias = "F", alias = "f", alias = "female")]
    Girl,
}

impl Gender {
    /// Lowercase form used in generated sentences ("boy", "girl").
    pub fn lower(self) -> &'static str {
        match self {
            Gender::Boy => "boy",
            Gender::Girl => "girl",
        }
    }

    pub fn parse(text: &str) -> Option<Gender> {
        match text.trim().to_ascii_lowercase().as_str() {
            "boy" | "boys" | "m" | "male" => Some(Gender::Boy),
            "girl" | "girls" | "f" | "female" => Some(Gender::Girl),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Boy => write!(f, "Boy"),
            Gender::Girl => write!(f, "Girl"),
        }
    }
}

/// One related name resolved against the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RelatedName {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// `null` when the name is not in the collection.
    #[serde(default, with = "lenient")]
    #[schemars(with = "Option<u32>")]
    pub rank: Option<u32>,
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<u32>")]
    pub count: Option<u32>,
}

impl RelatedName {
    /// Passthrough entry for a related name with no match.
    pub fn unmatched(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gender: None,
            rank: None,
            count: None,
        }
    }
}

/// One label per horizon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Classifications {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub five_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historic: Option<String>,
}

/// Best showing within one era of the historic series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EraProfile {
    #[serde(rename = "best-rank")]
    pub best_rank: Option<u32>,
    #[serde(rename = "best-decade")]
    pub best_decade: Option<String>,
    /// 0 (never top 100) to 5 (top 10).
    pub popularity: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HistoricProfile {
    #[serde(rename = "1-early-century")]
    pub early_century: EraProfile,
    #[serde(rename = "2-mid-century")]
    pub mid_century: EraProfile,
    #[serde(rename = "3-end-century")]
    pub end_century: EraProfile,
    #[serde(rename = "4-recent")]
    pub recent: EraProfile,
}

/// One name in one gender partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NameRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<u32>")]
    pub rank: Option<u32>,
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<u32>")]
    pub count: Option<u32>,

    #[serde(rename = "rankFrom1996", default, deserialize_with = "nullable")]
    #[schemars(with = "Vec<String>")]
    pub rank_from_1996: Vec<SeriesValue>,
    #[serde(rename = "countFrom1996", default, deserialize_with = "nullable")]
    #[schemars(with = "Vec<String>")]
    pub count_from_1996: Vec<SeriesValue>,
    #[serde(default, deserialize_with = "nullable")]
    #[schemars(with = "Vec<String>")]
    pub rank_historic: Vec<SeriesValue>,

    #[serde(default, deserialize_with = "nullable")]
    pub related_names: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub related_names_with_rank: Vec<RelatedName>,
    #[serde(
        rename = "relatedTotalCountFrom1996",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Vec::is_empty"
    )]
    #[schemars(with = "Vec<String>")]
    pub related_total_count_from_1996: Vec<SeriesValue>,

    #[serde(default, deserialize_with = "nullable")]
    pub classifications: Classifications,

    #[serde(rename = "bulletPoint1", default, skip_serializing_if = "Option::is_none")]
    pub bullet_point_1: Option<String>,
    #[serde(rename = "bulletPoint2", default, skip_serializing_if = "Option::is_none")]
    pub bullet_point_2: Option<String>,
    #[serde(rename = "bulletPoint3", default, skip_serializing_if = "Option::is_none")]
    pub bullet_point_3: Option<String>,
    #[serde(rename = "bulletPoint4", default, skip_serializing_if = "Option::is_none")]
    pub bullet_point_4: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_slug: Option<String>,

    #[serde(rename = "historic-profile", default, skip_serializing_if = "Option::is_none")]
    pub historic_profile: Option<HistoricProfile>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Upstream fields carried through unchanged.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl NameRecord {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            name: name.into(),
            gender: Some(gender),
            ..Self::default()
        }
    }

    /// Yearly rank series from 1996.
    pub fn recent_ranks(&self) -> TimeSeries {
        TimeSeries::recent(&self.rank_from_1996)
    }

    /// Yearly birth count series from 1996.
    pub fn recent_counts(&self) -> TimeSeries {
        TimeSeries::recent(&self.count_from_1996)
    }

    /// Decadal rank series from the 1900s.
    pub fn historic_ranks(&self) -> TimeSeries {
        TimeSeries::historic(&self.rank_historic)
    }

    /// The entry the search index reads for this record.
    pub fn search_entry(&self) -> Option<SearchEntry> {
        Some(SearchEntry {
            name: self.name.clone(),
            slug: self.unique_slug.clone()?,
            gender: self.gender?,
            rank: self.rank,
        })
    }

    /// Structural problems that force fallback values during enrichment.
    pub fn shape_issues(&self) -> Vec<ShapeIssue> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(ShapeIssue::MissingName);
        }
        if self.gender.is_none() {
            issues.push(ShapeIssue::MissingGender);
        }
        if !self.rank_from_1996.is_empty() && self.rank_from_1996.len() != RECENT_YEARS {
            issues.push(ShapeIssue::SeriesLength {
                field: "rankFrom1996",
                expected: RECENT_YEARS,
                actual: self.rank_from_1996.len(),
            });
        }
        if !self.count_from_1996.is_empty() && self.count_from_1996.len() != RECENT_YEARS {
            issues.push(ShapeIssue::SeriesLength {
                field: "countFrom1996",
                expected: RECENT_YEARS,
                actual: self.count_from_1996.len(),
            });
        }
        if !self.rank_historic.is_empty() && self.rank_historic.len() != HISTORIC_DECADES {
            issues.push(ShapeIssue::SeriesLength {
                field: "rankHistoric",
                expected: HISTORIC_DECADES,
                actual: self.rank_historic.len(),
            });
        }
        if self.rank_from_1996.len() == self.count_from_1996.len() {
            let misaligned = self
                .rank_from_1996
                .iter()
                .zip(&self.count_from_1996)
                .position(|(r, c)| r.is_present() != c.is_present());
            if let Some(index) = misaligned {
                issues.push(ShapeIssue::Misaligned { index });
            }
        }
        issues
    }
}

/// A structural problem with a single record.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeIssue {
    #[error("record has no name")]
    MissingName,
    #[error("record has no gender")]
    MissingGender,
    #[error("{field} has {actual} entries, expected {expected}")]
    SeriesLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("rank and count disagree about presence at index {index}")]
    Misaligned { index: usize },
    #[error("entry is not a readable name record: {reason}")]
    Unreadable { reason: String },
}

/// Entry of the client-side search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchEntry {
    pub name: String,
    pub slug: String,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}
