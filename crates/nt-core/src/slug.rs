//! URL slugs unique within one gender partition.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

static RE_NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static slug pattern"));

/// Slug used when a name has no ASCII letters or digits at all.
const EMPTY_SLUG: &str = "name";

/// Lowercase, collapse every run of other characters to `-`, trim dashes.
/// A trailing `-` in the name is spelled out so `Jo-` and `Jo` differ.
pub fn slugify(name: &str) -> String {
    let spelled = if name.ends_with('-') {
        format!("{name}dash")
    } else {
        name.to_string()
    };
    let lower = spelled.to_lowercase();
    let slug = RE_NON_ALNUM.replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Slugs for one partition, in input order.
///
/// A base slug used once is kept as is. Colliding bases are numbered `-1`,
/// `-2`, ... in input order, skipping any number that would clash with a
/// slug already taken.
pub fn assign_slugs<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let bases: Vec<String> = names.iter().map(|n| slugify(n.as_ref())).collect();
    let mut uses: HashMap<&str, usize> = HashMap::new();
    for base in &bases {
        *uses.entry(base.as_str()).or_default() += 1;
    }

    let mut taken: HashSet<String> = bases
        .iter()
        .filter(|b| uses[b.as_str()] == 1)
        .cloned()
        .collect();
    let mut counters: HashMap<&str, usize> = HashMap::new();

    bases
        .iter()
        .map(|base| {
            if uses[base.as_str()] == 1 {
                return base.clone();
            }
            let counter = counters.entry(base.as_str()).or_insert(0);
            loop {
                *counter += 1;
                let candidate = format!("{base}-{counter}");
                if taken.insert(candidate.clone()) {
                    return candidate;
                }
            }
        })
        .collect()
}
