//! Bullet point 1: the latest year's rank and birth count.

use nt_common::series::CURRENT_YEAR;
use nt_common::NameRecord;

use super::{ordinal, thousands};

/// `None` unless the record has a name, gender, and non-zero rank and count.
pub fn current_status(record: &NameRecord) -> Option<String> {
    let name = record.name.trim();
    if name.is_empty() {
        return None;
    }
    let gender = record.gender?.lower();
    let rank = record.rank.filter(|r| *r > 0)?;
    let count = record.count.filter(|c| *c > 0)?;
    Some(format!(
        "In {CURRENT_YEAR} {} {gender} babies were named {name} making it the {} most popular {gender}'s name",
        thousands(count),
        ordinal(rank),
    ))
}
