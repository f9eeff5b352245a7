//! JSON Schema for the snapshot, search index and configuration documents.
//!
//! ```bash
//! nt-core schema --list
//! nt-core schema NameRecord
//! nt-core schema --all
//! ```

use std::collections::BTreeMap;

use nt_common::{EraProfile, Gender, HistoricProfile, NameRecord, RelatedName, SearchEntry};
use nt_config::TrendConfig;
use schemars::schema_for;
use serde_json::Value;

/// Schema names with a one-line description.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        ("NameRecord", "One name in a gender snapshot, before or after enrichment"),
        ("Gender", "Snapshot partition a record belongs to"),
        ("RelatedName", "Related name resolved against the collection"),
        ("HistoricProfile", "Best rank and popularity per era"),
        ("EraProfile", "Best rank, decade and popularity within one era"),
        ("SearchEntry", "Entry of the client-side search index"),
        ("TrendConfig", "Narrative thresholds and pipeline options (trends.json)"),
    ]
}

/// Schema for a type by name, or `None` if the name is unknown.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "NameRecord" => schema_for!(NameRecord),
        "Gender" => schema_for!(Gender),
        "RelatedName" => schema_for!(RelatedName),
        "HistoricProfile" => schema_for!(HistoricProfile),
        "EraProfile" => schema_for!(EraProfile),
        "SearchEntry" => schema_for!(SearchEntry),
        "TrendConfig" => schema_for!(TrendConfig),
        _ => return None,
    };
    serde_json::to_value(schema).ok()
}

pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    available_schemas()
        .into_iter()
        .filter_map(|(name, _)| generate_schema(name).map(|s| (name.to_string(), s)))
        .collect()
}
