//! Rule-based trend classification.
//!
//! Each horizon is an ordered list of [`Rule`]s evaluated first-match over a
//! precomputed feature struct. Lists are plain data so callers (and tests)
//! can enumerate them in order.
//!
//! - [`recent`]: 29 yearly ranks from 1996
//! - [`historic`]: 13 decadal ranks from the 1900s
//! - [`archetype`]: external cluster/archetype label joins
//! - [`refine`]: label rewrites that depend on the final decade

pub mod archetype;
pub mod historic;
pub mod recent;
pub mod refine;

pub use archetype::{ClusterJoin, JoinKey, LabelTable};
pub use historic::{classify_historic, HistoricFeatures, HISTORIC_RULES};
pub use recent::{classify_recent, RecentFeatures, RECENT_RULES};
pub use refine::refine_historic;

/// One named predicate in an ordered rule list.
pub struct Rule<F, L> {
    pub label: L,
    /// Human-readable condition, used by `classify --explain` output.
    pub description: &'static str,
    pub test: fn(&F) -> bool,
}

impl<F, L: Copy> Rule<F, L> {
    pub fn matches(&self, features: &F) -> bool {
        (self.test)(features)
    }
}

/// Label of the first rule whose predicate holds.
pub fn first_match<F, L: Copy>(rules: &[Rule<F, L>], features: &F) -> Option<L> {
    rules.iter().find(|r| r.matches(features)).map(|r| r.label)
}

/// Every rule whose predicate holds, in rule order.
pub fn matching_rules<'r, F, L: Copy>(rules: &'r [Rule<F, L>], features: &F) -> Vec<&'r Rule<F, L>> {
    rules.iter().filter(|r| r.matches(features)).collect()
}

/// Labels of every rule whose predicate holds, in rule order.
pub fn all_matches<F, L: Copy>(rules: &[Rule<F, L>], features: &F) -> Vec<L> {
    matching_rules(rules, features)
        .into_iter()
        .map(|r| r.label)
        .collect()
}
