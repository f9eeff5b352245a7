//! Bullet point 4: the century-scale story from the decadal top 100 lists.

use nt_common::series::{SeriesPoint, HISTORIC_DECADES};
use nt_common::{NameRecord, TimeSeries};

use super::{render_first, Template};

/// Decades before this index count as the early 20th century.
const EARLY_END: usize = 4;
/// Decades from this index on count as recent.
const RECENT_START: usize = 10;

/// The ranked decades of a record and the labels the templates use.
#[derive(Debug, Clone)]
pub struct HistoricStats {
    pub name: String,
    pub series: TimeSeries,
    pub ranked: Vec<SeriesPoint>,
    /// Best (smallest) rank, earliest decade on ties.
    pub best: Option<SeriesPoint>,
    /// Current yearly rank of the name.
    pub current_rank: Option<u32>,
}

impl HistoricStats {
    pub fn new(record: &NameRecord) -> Option<Self> {
        if record.rank_historic.len() < HISTORIC_DECADES {
            return None;
        }
        let tail = &record.rank_historic[record.rank_historic.len() - HISTORIC_DECADES..];
        let series = TimeSeries::historic(tail);
        let ranked: Vec<SeriesPoint> = series.valid_points().collect();
        let best = ranked
            .iter()
            .copied()
            .reduce(|best, p| if p.value < best.value { p } else { best });
        Some(Self {
            name: record.name.trim().to_string(),
            series,
            ranked,
            best,
            current_rank: record.rank,
        })
    }

    fn label(&self, index: usize) -> String {
        self.series.to_decade_label(index)
    }

    fn first(&self) -> Option<SeriesPoint> {
        self.ranked.first().copied()
    }

    fn last(&self) -> Option<SeriesPoint> {
        self.ranked.last().copied()
    }

    fn best_index(&self) -> usize {
        self.best.map_or(0, |p| p.index)
    }

    fn best_phrase(&self) -> String {
        match self.best {
            Some(p) => format!("#{} in the {}", p.value, self.label(p.index)),
            None => String::new(),
        }
    }

    fn last_index(&self) -> usize {
        self.last().map_or(0, |p| p.index)
    }

    /// Dropped out after the early decades and came back recently, with a
    /// current rank inside the top 100.
    fn revival_gap(&self) -> Option<(usize, usize)> {
        let early = self.ranked.iter().any(|p| p.index < EARLY_END);
        let recent = self.ranked.iter().any(|p| p.index >= RECENT_START);
        let gap = (EARLY_END..RECENT_START).all(|i| self.series.get(i).is_unranked());
        let ranked_now = self.current_rank.is_some_and(|r| r < 100);
        if !(early && recent && gap && ranked_now) {
            return None;
        }
        let values = self.series.values();
        let start = (3..values.len()).find(|&i| values[i].is_unranked())?;
        let end = (start + 1..values.len()).find(|&i| values[i].is_present())?;
        Some((start, end))
    }

    fn faded_after(&self, era: std::ops::Range<usize>) -> bool {
        self.last_index() < RECENT_START && era.contains(&self.best_index())
    }
}

fn never(s: &HistoricStats) -> bool {
    s.ranked.is_empty()
}

fn always_ranked(s: &HistoricStats) -> bool {
    s.ranked.len() == s.series.len()
}

fn revived(s: &HistoricStats) -> bool {
    s.revival_gap().is_some()
}

fn rare(s: &HistoricStats) -> bool {
    s.ranked.len() <= 3
}

fn modern(s: &HistoricStats) -> bool {
    s.first().is_some_and(|p| p.index >= 8)
}

fn early_fade(s: &HistoricStats) -> bool {
    s.faded_after(0..4)
}

fn mid_fade(s: &HistoricStats) -> bool {
    s.faded_after(4..7)
}

fn late_fade(s: &HistoricStats) -> bool {
    s.faded_after(7..10)
}

fn bounded_span(s: &HistoricStats) -> bool {
    let (Some(first), Some(last)) = (s.first(), s.last()) else {
        return false;
    };
    let span = (last.index - first.index + 1) * 10;
    span <= 50 && first.index > 0 && last.index < RECENT_START
}

fn any(_: &HistoricStats) -> bool {
    true
}

fn render_revival(s: &HistoricStats) -> String {
    let (start, end) = s.revival_gap().unwrap_or((0, 0));
    format!(
        "Historically {} was very popular in the early 20th century ({}), dropped out of the top 100 for {} years, but has revived and is now ranked #{}",
        s.name,
        s.best_phrase(),
        (end - start) * 10,
        s.current_rank.unwrap_or_default()
    )
}

fn render_rare(s: &HistoricStats) -> String {
    let decades: Vec<String> = s.ranked.iter().map(|p| s.label(p.index)).collect();
    let plural = if s.ranked.len() > 1 { "s" } else { "" };
    format!(
        "Historically {} has only made it to the top 100 list {} time{} in the {}",
        s.name,
        s.ranked.len(),
        plural,
        decades.join(", ")
    )
}

fn render_fade(s: &HistoricStats, era: &str) -> String {
    let popular = if era == "early" { "most popular" } else { "popular" };
    format!(
        "Historically {} was {} in the {} 20th century ({}) but hasn't ranked in the top 100 since the {}",
        s.name,
        popular,
        era,
        s.best_phrase(),
        s.label(s.last_index())
    )
}

/// Ordered sentence shapes; the last one always applies.
pub static HISTORIC_TEMPLATES: &[Template<HistoricStats>] = &[
    Template {
        name: "never",
        applies: never,
        render: |s| format!("Historically {} has never made it to the top 100 lists", s.name),
    },
    Template {
        name: "always",
        applies: always_ranked,
        render: |s| {
            format!(
                "Historically {} has always been a popular name and has never dropped out of the top 100 names",
                s.name
            )
        },
    },
    Template {
        name: "revival",
        applies: revived,
        render: render_revival,
    },
    Template {
        name: "rare",
        applies: rare,
        render: render_rare,
    },
    Template {
        name: "modern",
        applies: modern,
        render: |s| {
            format!(
                "Historically {} is a modern name and didn't rank in the top 100 until the {}",
                s.name,
                s.label(s.first().map_or(0, |p| p.index))
            )
        },
    },
    Template {
        name: "early-fade",
        applies: early_fade,
        render: |s| render_fade(s, "early"),
    },
    Template {
        name: "mid-fade",
        applies: mid_fade,
        render: |s| render_fade(s, "mid"),
    },
    Template {
        name: "late-fade",
        applies: late_fade,
        render: |s| render_fade(s, "late"),
    },
    Template {
        name: "span",
        applies: bounded_span,
        render: |s| {
            format!(
                "Historically {} made it to the top 100 names between the {} and {} peaking in the {}",
                s.name,
                s.label(s.first().map_or(0, |p| p.index)),
                s.label(s.last_index()),
                s.label(s.best_index())
            )
        },
    },
    Template {
        name: "peak",
        applies: any,
        render: |s| {
            format!(
                "Historically {} achieved its peak popularity of {}",
                s.name,
                s.best_phrase()
            )
        },
    },
];

pub fn historic_trend(record: &NameRecord) -> Option<String> {
    if record.name.trim().is_empty() {
        return None;
    }
    render_first(HISTORIC_TEMPLATES, &HistoricStats::new(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::selected;
    use nt_common::{Gender, SeriesValue};
    use SeriesValue::{Present as P, Unranked as U};

    fn record(decades: [SeriesValue; 13], rank: Option<u32>) -> NameRecord {
        let mut r = NameRecord::new("Clara", Gender::Girl);
        r.rank_historic = decades.to_vec();
        r.rank = rank;
        r
    }

    fn shape(decades: [SeriesValue; 13]) -> &'static str {
        let stats = HistoricStats::new(&record(decades, None)).unwrap();
        selected(HISTORIC_TEMPLATES, &stats).unwrap()
    }

    #[test]
    fn always_in_the_top_100() {
        assert_eq!(
            historic_trend(&record([P(30); 13], Some(40))).as_deref(),
            Some("Historically Clara has always been a popular name and has never dropped out of the top 100 names")
        );
    }

    #[test]
    fn revival_after_a_gap() {
        let decades = [
            P(8), P(12), P(20), P(70), U, U, U, U, U, U, P(90), P(60), P(45),
        ];
        assert_eq!(
            historic_trend(&record(decades, Some(38))).as_deref(),
            Some("Historically Clara was very popular in the early 20th century (#8 in the 1900s), dropped out of the top 100 for 60 years, but has revived and is now ranked #38")
        );
        // Without a current top 100 rank the revival sentence does not apply.
        assert_ne!(shape(decades), "revival");
    }

    #[test]
    fn rare_lists_decades() {
        let mut decades = [U; 13];
        decades[5] = P(88);
        decades[7] = P(95);
        assert_eq!(
            historic_trend(&record(decades, None)).as_deref(),
            Some("Historically Clara has only made it to the top 100 list 2 times in the 1950s, 1970s")
        );
        decades[7] = U;
        assert!(historic_trend(&record(decades, None))
            .unwrap()
            .ends_with("1 time in the 1950s"));
    }

    #[test]
    fn fades_by_era() {
        let early = [P(5), P(9), P(30), P(60), P(90), U, U, U, U, U, U, U, U];
        assert_eq!(shape(early), "early-fade");
        assert_eq!(
            historic_trend(&record(early, None)).as_deref(),
            Some("Historically Clara was most popular in the early 20th century (#5 in the 1900s) but hasn't ranked in the top 100 since the 1940s")
        );

        let mid = [U, U, P(80), P(40), P(10), P(30), P(70), U, U, U, U, U, U];
        assert_eq!(shape(mid), "mid-fade");

        let late = [U, U, U, U, U, P(90), P(60), P(30), P(12), P(50), U, U, U];
        assert_eq!(shape(late), "late-fade");
    }

    #[test]
    fn modern_and_default_shapes() {
        let modern = [U, U, U, U, U, U, U, U, P(90), P(50), P(20), P(15), P(30)];
        assert_eq!(shape(modern), "modern");

        let spread = [P(90), U, P(70), U, U, P(40), U, U, U, U, P(60), P(80), U];
        assert_eq!(shape(spread), "peak");
        assert_eq!(
            historic_trend(&record(spread, None)).as_deref(),
            Some("Historically Clara achieved its peak popularity of #40 in the 1950s")
        );
    }

    #[test]
    fn bounded_span_is_shadowed_by_the_fades() {
        let decades = [U, U, P(70), P(40), P(55), P(90), U, U, U, U, U, U, U];
        let stats = HistoricStats::new(&record(decades, None)).unwrap();
        assert!(bounded_span(&stats));
        assert!(early_fade(&stats));
        assert_eq!(shape(decades), "early-fade");

        let span = HISTORIC_TEMPLATES
            .iter()
            .find(|t| t.name == "span")
            .unwrap();
        assert_eq!(
            (span.render)(&stats),
            "Historically Clara made it to the top 100 names between the 1920s and 1950s peaking in the 1930s"
        );
    }

    #[test]
    fn never_ranked_and_missing() {
        assert_eq!(shape([U; 13]), "never");
        let mut short = record([U; 13], None);
        short.rank_historic.truncate(5);
        assert!(historic_trend(&short).is_none());
    }
}
