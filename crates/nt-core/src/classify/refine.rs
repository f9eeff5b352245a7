//! Historic label rewrites keyed on the 2020s decade.
//!
//! The archetype override table uses two broad labels that the 2020s value
//! splits further.

use nt_common::labels::{
    FALLEN_CLASSIC, INTERMITTENT_PRESENCE, PENDULUM, STEADY_CLASSIC, VINTAGE_REVIVAL,
};
use nt_common::SeriesValue;

/// Index of the 2020s decade in the historic series.
const LATEST_DECADE: usize = 12;

/// Refined label, or `None` when `label` is left as is.
pub fn refine_historic(label: &str, historic: &[SeriesValue]) -> Option<&'static str> {
    let latest_ranked = historic
        .get(LATEST_DECADE)
        .is_some_and(|v| v.is_present());
    match label {
        INTERMITTENT_PRESENCE if latest_ranked => Some(VINTAGE_REVIVAL),
        INTERMITTENT_PRESENCE => Some(PENDULUM),
        STEADY_CLASSIC if !latest_ranked => Some(FALLEN_CLASSIC),
        _ => None,
    }
}
