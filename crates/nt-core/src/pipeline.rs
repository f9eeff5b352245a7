//! The enrichment run over a whole name collection.
//!
//! Passes run in a fixed order because later passes read what earlier ones
//! wrote: slugs, related names and totals, rule classification, label joins,
//! historic refinement, era profiles and tags, then narratives. Each pass is
//! a plain function so tests can run it alone. Every pass re-derives its
//! fields from the series, so a second run gives the same result.

use std::collections::{BTreeMap, BTreeSet};

use nt_common::labels::{FIVE_YEAR_UNKNOWN, UNCATEGORIZED};
use nt_common::{Gender, NameRecord, ShapeIssue};
use nt_config::{RetargetScope, TrendConfig};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classify::{classify_historic, classify_recent, refine_historic, ClusterJoin, LabelTable};
use crate::narrative;
use crate::profile::{historic_profile, tags};
use crate::related::{aggregate_counts, resolve, NameIndex};
use crate::slug::assign_slugs;
use crate::snapshot::UnreadableEntry;

/// Both gender partitions, each in snapshot order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameCollection {
    pub boys: Vec<NameRecord>,
    pub girls: Vec<NameRecord>,
    /// Snapshot entries that did not parse, carried so a rewrite keeps them.
    pub unreadable: BTreeMap<Gender, Vec<UnreadableEntry>>,
}

impl NameCollection {
    pub fn new(boys: Vec<NameRecord>, girls: Vec<NameRecord>) -> Self {
        Self {
            boys,
            girls,
            unreadable: BTreeMap::new(),
        }
    }

    /// Replace one partition with freshly loaded contents.
    pub fn insert_partition(
        &mut self,
        gender: Gender,
        records: Vec<NameRecord>,
        unreadable: Vec<UnreadableEntry>,
    ) {
        match gender {
            Gender::Boy => self.boys = records,
            Gender::Girl => self.girls = records,
        }
        if unreadable.is_empty() {
            self.unreadable.remove(&gender);
        } else {
            self.unreadable.insert(gender, unreadable);
        }
    }

    pub fn partition(&self, gender: Gender) -> &[NameRecord] {
        match gender {
            Gender::Boy => &self.boys,
            Gender::Girl => &self.girls,
        }
    }

    pub fn unreadable(&self, gender: Gender) -> &[UnreadableEntry] {
        self.unreadable.get(&gender).map_or(&[][..], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.boys.len() + self.girls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boys.is_empty() && self.girls.is_empty()
    }

    /// Boys first, then girls.
    pub fn iter(&self) -> impl Iterator<Item = &NameRecord> {
        self.boys.iter().chain(self.girls.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut NameRecord> {
        self.boys.iter_mut().chain(self.girls.iter_mut())
    }

    pub fn partitions_mut(&mut self) -> [(Gender, &mut Vec<NameRecord>); 2] {
        [(Gender::Boy, &mut self.boys), (Gender::Girl, &mut self.girls)]
    }
}

/// Optional external label tables. A missing table skips its join, except
/// that the five-year label then falls back to `Unknown`.
#[derive(Debug, Clone, Default)]
pub struct LabelTables {
    /// `name [| gender] -> archetype` for the five-year horizon.
    pub five_year: Option<LabelTable>,
    /// Cluster archetypes that replace the recent rule label.
    pub recent_clusters: Option<ClusterJoin>,
    /// `name | gender -> archetype` overriding the historic rule label.
    pub historic_archetypes: Option<LabelTable>,
}

/// A structural problem found in one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordIssue {
    pub gender: Gender,
    /// Position in the partition's snapshot array.
    pub index: usize,
    pub name: String,
    pub issue: ShapeIssue,
}

/// What a run did, for the CLI summary and logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentReport {
    pub records: usize,
    pub five_year: BTreeMap<String, usize>,
    pub recent: BTreeMap<String, usize>,
    pub historic: BTreeMap<String, usize>,
    pub tags: BTreeMap<String, usize>,
    /// Recent labels replaced by the cluster join.
    pub retargeted: usize,
    /// Historic labels replaced by the archetype table.
    pub overridden: usize,
    /// Historic labels rewritten by the 2020s refinement.
    pub refined: usize,
    pub issues: Vec<RecordIssue>,
}

impl EnrichmentReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn tally(&mut self, record: &NameRecord) {
        let c = &record.classifications;
        for (counts, label) in [
            (&mut self.five_year, &c.five_year),
            (&mut self.recent, &c.recent),
            (&mut self.historic, &c.historic),
        ] {
            if let Some(label) = label {
                *counts.entry(label.clone()).or_default() += 1;
            }
        }
        for tag in &record.tags {
            *self.tags.entry(tag.clone()).or_default() += 1;
        }
    }
}

/// Record shape problems and fill a missing gender from the partition.
/// Unreadable snapshot entries are reported too.
pub fn check_shapes(collection: &mut NameCollection) -> Vec<RecordIssue> {
    let mut issues = Vec::new();
    let NameCollection {
        boys,
        girls,
        unreadable,
    } = collection;
    for (gender, records) in [(Gender::Boy, boys), (Gender::Girl, girls)] {
        let skipped = unreadable.get(&gender).map_or(&[][..], Vec::as_slice);
        let mut found = Vec::new();
        for entry in skipped {
            found.push(RecordIssue {
                gender,
                index: entry.index,
                name: entry.name.clone(),
                issue: ShapeIssue::Unreadable {
                    reason: entry.reason.clone(),
                },
            });
        }

        let taken: BTreeSet<usize> = skipped.iter().map(|e| e.index).collect();
        let positions = (0..).filter(|i| !taken.contains(i));
        for (index, record) in positions.zip(records.iter_mut()) {
            for issue in record.shape_issues() {
                warn!(%gender, index, name = %record.name, %issue, "record shape problem");
                found.push(RecordIssue {
                    gender,
                    index,
                    name: record.name.clone(),
                    issue,
                });
            }
            if record.gender.is_none() {
                record.gender = Some(gender);
            }
        }
        found.sort_by_key(|i| i.index);
        issues.extend(found);
    }
    issues
}

/// Assign `uniqueSlug` per partition.
pub fn assign_unique_slugs(collection: &mut NameCollection) {
    for (gender, records) in collection.partitions_mut() {
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        let slugs = assign_slugs(&names);
        for (record, slug) in records.iter_mut().zip(slugs) {
            record.unique_slug = Some(slug);
        }
        debug!(%gender, records = records.len(), "assigned slugs");
    }
}

/// Resolve `relatedNamesWithRank` and `relatedTotalCountFrom1996` against
/// the full collection.
pub fn resolve_related_names(collection: &mut NameCollection) {
    let resolved: Vec<_> = {
        let index = NameIndex::build(collection.iter());
        debug!(distinct_names = index.len(), "built related-name index");
        collection
            .iter()
            .map(|r| {
                (
                    resolve(&r.related_names, &index),
                    aggregate_counts(&r.related_names, &index),
                )
            })
            .collect()
    };
    for (record, (with_rank, totals)) in collection.iter_mut().zip(resolved) {
        record.related_names_with_rank = with_rank;
        record.related_total_count_from_1996 = totals;
    }
}

/// Rule labels for the recent and historic horizons.
pub fn classify_rules(record: &mut NameRecord) {
    record.classifications.recent = Some(classify_recent(&record.rank_from_1996).to_string());
    record.classifications.historic = Some(classify_historic(&record.rank_historic).to_string());
}

/// Outcome of the label joins on one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinOutcome {
    pub retargeted: bool,
    pub overridden: bool,
    pub refined: bool,
}

/// Apply the external label tables, then the 2020s refinement.
pub fn apply_joins(record: &mut NameRecord, tables: &LabelTables, scope: RetargetScope) -> JoinOutcome {
    let mut outcome = JoinOutcome::default();
    let name = record.name.trim();
    let gender = record.gender;
    let c = &mut record.classifications;

    let five_year = tables
        .five_year
        .as_ref()
        .and_then(|table| table.lookup(name, gender))
        .unwrap_or(FIVE_YEAR_UNKNOWN);
    c.five_year = Some(five_year.to_string());

    if let Some(clusters) = &tables.recent_clusters {
        let eligible = match scope {
            RetargetScope::All => true,
            RetargetScope::UncategorizedOnly => c.recent.as_deref() == Some(UNCATEGORIZED),
        };
        if eligible {
            c.recent = Some(clusters.label_for(name, gender).to_string());
            outcome.retargeted = true;
        }
    }

    if let Some(table) = &tables.historic_archetypes {
        if let Some(label) = table.lookup(name, gender) {
            c.historic = Some(label.to_string());
            outcome.overridden = true;
        }
    }

    if let Some(label) = c.historic.as_deref() {
        if let Some(refined) = refine_historic(label, &record.rank_historic) {
            c.historic = Some(refined.to_string());
            outcome.refined = true;
        }
    }
    outcome
}

/// Era profile and tags from the decadal ranks.
pub fn apply_profile(record: &mut NameRecord) {
    record.historic_profile = historic_profile(&record.rank_historic);
    record.tags = tags(record.historic_profile.as_ref());
}

/// Run every pass over the collection.
pub fn enrich(
    collection: &mut NameCollection,
    tables: &LabelTables,
    config: &TrendConfig,
) -> EnrichmentReport {
    info!(
        boys = collection.boys.len(),
        girls = collection.girls.len(),
        "enrichment started"
    );
    let mut report = EnrichmentReport {
        records: collection.len(),
        issues: check_shapes(collection),
        ..EnrichmentReport::default()
    };

    assign_unique_slugs(collection);
    resolve_related_names(collection);

    for record in collection.iter_mut() {
        classify_rules(record);
        let outcome = apply_joins(record, tables, config.pipeline.retarget_scope);
        report.retargeted += usize::from(outcome.retargeted);
        report.overridden += usize::from(outcome.overridden);
        report.refined += usize::from(outcome.refined);

        apply_profile(record);
        narrative::generate(record, &config.narrative).apply(record);
        report.tally(record);
    }

    debug!(labels = ?report.recent, "recent labels");
    debug!(labels = ?report.historic, "historic labels");
    info!(
        records = report.records,
        retargeted = report.retargeted,
        overridden = report.overridden,
        refined = report.refined,
        issues = report.issues.len(),
        "enrichment finished"
    );
    report
}
