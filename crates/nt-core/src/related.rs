//! Related-name resolution against the whole collection.
//!
//! The index is built once from both gender partitions and borrowed
//! read-only; callers compute every record's output first and apply the
//! results afterwards.

use std::collections::{HashMap, HashSet};

use nt_common::series::RECENT_YEARS;
use nt_common::{NameRecord, RelatedName, SeriesValue};

/// Case-insensitive `name -> records` lookup across genders.
#[derive(Debug, Default)]
pub struct NameIndex<'a> {
    by_name: HashMap<String, Vec<&'a NameRecord>>,
}

impl<'a> NameIndex<'a> {
    /// Index records in iteration order; a name present in both partitions
    /// keeps one entry per record.
    pub fn build(records: impl IntoIterator<Item = &'a NameRecord>) -> Self {
        let mut by_name: HashMap<String, Vec<&'a NameRecord>> = HashMap::new();
        for record in records {
            let key = record.name.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            by_name.entry(key).or_default().push(record);
        }
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> &[&'a NameRecord] {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Distinct lowercase names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Listed related names with blanks removed, in list order.
fn listed(related: &[String]) -> impl Iterator<Item = &str> {
    related.iter().map(|n| n.trim()).filter(|n| !n.is_empty())
}

/// Related names with case-insensitive duplicates removed, keeping the
/// first spelling.
fn distinct(related: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    listed(related)
        .filter(|n| seen.insert(n.to_lowercase()))
        .collect()
}

/// One entry per matching record for every listed name, or a `rank: null`
/// passthrough. A name listed twice is resolved twice.
pub fn resolve(related: &[String], index: &NameIndex<'_>) -> Vec<RelatedName> {
    let mut out = Vec::new();
    for name in listed(related) {
        let matches = index.get(name);
        if matches.is_empty() {
            out.push(RelatedName::unmatched(name));
            continue;
        }
        out.extend(matches.iter().map(|r| RelatedName {
            name: r.name.clone(),
            gender: r.gender,
            rank: r.rank,
            count: r.count,
        }));
    }
    out
}

/// Year-by-year birth totals over every matching record of every related
/// name. A name listed twice is counted once. Years nobody contributed to
/// stay unranked.
pub fn aggregate_counts(related: &[String], index: &NameIndex<'_>) -> Vec<SeriesValue> {
    let mut totals = vec![SeriesValue::Unranked; RECENT_YEARS];
    for name in distinct(related) {
        for record in index.get(name) {
            for (total, count) in totals.iter_mut().zip(&record.count_from_1996) {
                *total = *total + *count;
            }
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use nt_common::Gender;
    use SeriesValue::{Present as P, Unranked as U};

    fn named(name: &str, gender: Gender, rank: u32, counts: Vec<SeriesValue>) -> NameRecord {
        let mut r = NameRecord::new(name, gender);
        r.rank = Some(rank);
        r.count_from_1996 = counts;
        r
    }

    fn collection() -> Vec<NameRecord> {
        let mut jordan_boy = vec![U; RECENT_YEARS];
        jordan_boy[28] = P(300);
        let mut jordan_girl = vec![U; RECENT_YEARS];
        jordan_girl[28] = P(120);
        jordan_girl[0] = P(0);
        vec![
            named("Jordan", Gender::Boy, 90, jordan_boy),
            named("Jordan", Gender::Girl, 400, jordan_girl),
            named("Jordyn", Gender::Girl, 350, vec![P(10); RECENT_YEARS]),
        ]
    }

    #[test]
    fn resolves_every_gender_and_passes_through_misses() {
        let records = collection();
        let index = NameIndex::build(&records);
        assert_eq!(index.len(), 2);

        let related = vec!["jordan".to_string(), "Zebedee".to_string(), " ".to_string()];
        let resolved = resolve(&related, &index);
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0].name, "Jordan");
        assert_eq!(resolved[0].gender, Some(Gender::Boy));
        assert_eq!(resolved[0].rank, Some(90));
        assert_eq!(resolved[1].gender, Some(Gender::Girl));
        assert_eq!(resolved[2], RelatedName::unmatched("Zebedee"));
    }

    #[test]
    fn repeated_names_resolve_per_listing_but_total_once() {
        let records = collection();
        let index = NameIndex::build(&records);
        let related = vec!["Jordyn".to_string(), "jordyn".to_string(), "Ghost".to_string(), "Ghost".to_string()];

        let resolved = resolve(&related, &index);
        let names: Vec<(&str, Option<u32>)> = resolved.iter().map(|r| (r.name.as_str(), r.rank)).collect();
        assert_eq!(
            names,
            [("Jordyn", Some(350)), ("Jordyn", Some(350)), ("Ghost", None), ("Ghost", None)]
        );

        let totals = aggregate_counts(&related, &index);
        assert_eq!(totals[0], P(10));
    }

    #[test]
    fn totals_sum_across_genders_and_keep_zeros() {
        let records = collection();
        let index = NameIndex::build(&records);
        let totals = aggregate_counts(&["Jordan".to_string(), "Jordyn".to_string()], &index);
        assert_eq!(totals.len(), RECENT_YEARS);
        assert_eq!(totals[28], P(430));
        assert_eq!(totals[0], P(10));
        assert_eq!(totals[5], P(10));

        let only_jordan = aggregate_counts(&["Jordan".to_string()], &index);
        assert_eq!(only_jordan[0], P(0));
        assert_eq!(only_jordan[1], U);
    }

    #[test]
    fn unmatched_names_contribute_nothing() {
        let records = collection();
        let index = NameIndex::build(&records);
        let totals = aggregate_counts(&["Nobody".to_string(), "Ghost".to_string()], &index);
        assert_eq!(totals, vec![U; RECENT_YEARS]);
        assert_eq!(aggregate_counts(&[], &index), vec![U; RECENT_YEARS]);
    }
}
