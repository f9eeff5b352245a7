//! Fuzz target for snapshot parsing followed by a full enrichment run.
//!
//! Any JSON array that deserializes into records must enrich without
//! panicking, whatever its series lengths or sentinel spellings.

#![no_main]

use libfuzzer_sys::fuzz_target;
use nt_common::NameRecord;
use nt_config::TrendConfig;
use nt_core::pipeline::{enrich, LabelTables, NameCollection};

fuzz_target!(|data: &[u8]| {
    let Ok(records) = serde_json::from_slice::<Vec<NameRecord>>(data) else {
        return;
    };
    let (boys, girls): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|r| r.gender != Some(nt_common::Gender::Girl));
    let mut collection = NameCollection::new(boys, girls);
    let _ = enrich(&mut collection, &LabelTables::default(), &TrendConfig::default());
    let _ = serde_json::to_vec(&collection.boys);
});
