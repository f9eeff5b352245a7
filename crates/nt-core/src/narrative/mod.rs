//! Sentence generation for the four record bullet points.
//!
//! Every generator is a pure function of the record and thresholds. Missing
//! or short series omit the bullet; sparse data inside a series produces a
//! fallback sentence instead. Generators never fail.
//!
//! The 20-year and historic sentences pick from ordered [`Template`] lists,
//! first match wins, mirroring the classifier rule lists.

pub mod current;
pub mod five_year;
pub mod historic;
pub mod ordinal;
pub mod twenty_year;

use nt_common::NameRecord;
use nt_config::NarrativeThresholds;
use serde::Serialize;

pub use current::current_status;
pub use five_year::five_year_trend;
pub use historic::historic_trend;
pub use ordinal::{ordinal, thousands};
pub use twenty_year::twenty_year_trend;

/// One sentence shape: when it applies and how it renders.
pub struct Template<S> {
    pub name: &'static str,
    pub applies: fn(&S) -> bool,
    pub render: fn(&S) -> String,
}

/// Render the first template that applies.
pub fn render_first<S>(templates: &[Template<S>], stats: &S) -> Option<String> {
    templates
        .iter()
        .find(|t| (t.applies)(stats))
        .map(|t| (t.render)(stats))
}

/// Name of the first template that applies, for diagnostics.
pub fn selected<S>(templates: &[Template<S>], stats: &S) -> Option<&'static str> {
    templates.iter().find(|t| (t.applies)(stats)).map(|t| t.name)
}

/// The four generated bullet points of one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Narratives {
    pub current: Option<String>,
    pub five_year: Option<String>,
    pub twenty_year: Option<String>,
    pub historic: Option<String>,
}

impl Narratives {
    /// Overwrite the record's bullet points, clearing any that are omitted.
    pub fn apply(self, record: &mut NameRecord) {
        record.bullet_point_1 = self.current;
        record.bullet_point_2 = self.five_year;
        record.bullet_point_3 = self.twenty_year;
        record.bullet_point_4 = self.historic;
    }
}

pub fn generate(record: &NameRecord, thresholds: &NarrativeThresholds) -> Narratives {
    Narratives {
        current: current_status(record),
        five_year: five_year_trend(record, &thresholds.five_year),
        twenty_year: twenty_year_trend(record, &thresholds.twenty_year),
        historic: historic_trend(record),
    }
}
