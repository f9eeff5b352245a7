//! Fuzz target for the CSV label-table reader.

#![no_main]

use libfuzzer_sys::fuzz_target;
use nt_core::classify::archetype::{cluster_labels, CsvTable, LabelTable};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(table) = CsvTable::parse(text) else {
        return;
    };
    let _ = LabelTable::from_csv(&table, "archetype");
    let _ = cluster_labels(&table, &table);
});
