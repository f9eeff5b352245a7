//! End-to-end enrichment scenarios over small in-memory collections.

use nt_common::labels::UNCATEGORIZED;
use nt_common::series::RECENT_YEARS;
use nt_common::{Gender, HistoricPattern, NameRecord, RecentPattern, RelatedName, SeriesValue};
use nt_config::TrendConfig;
use nt_core::classify::{all_matches, classify_historic, classify_recent, HistoricFeatures, HISTORIC_RULES};
use nt_core::narrative::ordinal::ordinal;
use nt_core::pipeline::{enrich, LabelTables, NameCollection};
use nt_core::related::{aggregate_counts, NameIndex};
use nt_math::{linear_regression, Point};
use SeriesValue::{Present as P, Unranked as U};

fn with_tail(tail: &[u32]) -> Vec<SeriesValue> {
    let mut values = vec![U; RECENT_YEARS - tail.len()];
    values.extend(tail.iter().map(|v| P(*v)));
    values
}

fn new_entrant() -> NameRecord {
    let mut r = NameRecord::new("Nova", Gender::Girl);
    r.rank = Some(10);
    r.count = Some(3000);
    r.rank_from_1996 = with_tail(&[50, 40, 30, 20, 10]);
    r.count_from_1996 = with_tail(&[1000, 1500, 2000, 2500, 3000]);
    r.rank_historic = vec![U; 12];
    r.rank_historic.push(P(15));
    r
}

fn century_classic() -> NameRecord {
    let mut r = NameRecord::new("William", Gender::Boy);
    r.rank = Some(4);
    r.count = Some(15_500);
    r.rank_from_1996 = vec![P(12); RECENT_YEARS];
    r.count_from_1996 = vec![P(15_000); RECENT_YEARS];
    r.rank_historic = vec![P(3); 13];
    r.related_names = vec!["Liam".into(), "Wilhelmina".into()];
    r
}

fn enriched(boys: Vec<NameRecord>, girls: Vec<NameRecord>) -> NameCollection {
    let mut collection = NameCollection::new(boys, girls);
    let report = enrich(&mut collection, &LabelTables::default(), &TrendConfig::default());
    assert!(report.is_clean(), "unexpected issues: {:?}", report.issues);
    collection
}

#[test]
fn late_arrival_is_a_new_entrant_gaining_popularity() {
    let collection = enriched(vec![], vec![new_entrant()]);
    let nova = &collection.girls[0];

    assert_eq!(
        nova.classifications.recent.as_deref(),
        Some(RecentPattern::NewEntrant.label())
    );
    let five_year = nova.bullet_point_2.as_deref().unwrap();
    assert!(five_year.contains("gaining popularity"), "{five_year}");
    assert_eq!(
        nova.bullet_point_1.as_deref(),
        Some("In 2024 3,000 girl babies were named Nova making it the 10th most popular girl's name")
    );
    assert_eq!(
        nova.classifications.historic.as_deref(),
        Some(HistoricPattern::ModernEra.label())
    );
}

#[test]
fn always_ranked_decades_make_a_century_classic() {
    let collection = enriched(vec![century_classic()], vec![]);
    let william = &collection.boys[0];

    assert_eq!(
        william.classifications.historic.as_deref(),
        Some(HistoricPattern::CenturyClassic.label())
    );
    assert_eq!(
        william.bullet_point_4.as_deref(),
        Some("Historically William has always been a popular name and has never dropped out of the top 100 names")
    );
    assert_eq!(william.tags, Vec::<String>::new());
    let profile = william.historic_profile.as_ref().unwrap();
    assert_eq!(profile.early_century.popularity, 5);
    assert_eq!(profile.recent.best_decade.as_deref(), Some("2000s"));
}

#[test]
fn absent_related_name_passes_through_without_counts() {
    let mut liam = NameRecord::new("Liam", Gender::Boy);
    liam.rank = Some(1);
    liam.count = Some(20_000);
    liam.rank_from_1996 = vec![P(1); RECENT_YEARS];
    liam.count_from_1996 = vec![P(20_000); RECENT_YEARS];
    liam.rank_historic = vec![P(90); 13];

    let collection = enriched(vec![century_classic(), liam], vec![]);
    let william = &collection.boys[0];

    assert_eq!(william.related_names_with_rank.len(), 2);
    assert_eq!(william.related_names_with_rank[0].rank, Some(1));
    assert_eq!(william.related_names_with_rank[0].count, Some(20_000));
    assert_eq!(
        william.related_names_with_rank[1],
        RelatedName::unmatched("Wilhelmina")
    );
    assert_eq!(william.related_total_count_from_1996, vec![P(20_000); RECENT_YEARS]);
}

#[test]
fn aggregate_over_unmatched_names_stays_unranked() {
    let records = vec![century_classic()];
    let index = NameIndex::build(&records);
    let totals = aggregate_counts(&["Nobody".to_string(), "Somebody".to_string()], &index);
    assert_eq!(totals, vec![U; RECENT_YEARS]);
}

#[test]
fn earlier_historic_rule_wins_on_overlap() {
    let decades = [P(5), P(9), U, P(12), P(20), U, P(40), P(60), U, P(70), P(80), P(90), P(95)];
    let features = HistoricFeatures::from_values(&decades).unwrap();
    let matches = all_matches(HISTORIC_RULES, &features);
    assert_eq!(matches[0], HistoricPattern::CenturyClassic);
    assert!(matches.len() > 1);
    assert_eq!(classify_historic(&decades), HistoricPattern::CenturyClassic);
}

#[test]
fn every_record_gets_exactly_one_label_per_horizon() {
    let shapes: Vec<Vec<SeriesValue>> = vec![
        vec![U; RECENT_YEARS],
        vec![P(900); RECENT_YEARS],
        with_tail(&[3]),
        vec![],
    ];
    for shape in shapes {
        let label = classify_recent(&shape);
        assert!(RecentPattern::all().contains(&label));
    }
    assert_eq!(classify_recent(&vec![P(900); RECENT_YEARS]).label(), UNCATEGORIZED);
}

#[test]
fn ordinal_suffixes() {
    let rendered: Vec<String> = [1, 2, 3, 11, 12, 13, 21, 101].into_iter().map(ordinal).collect();
    assert_eq!(
        rendered,
        ["1st", "2nd", "3rd", "11th", "12th", "13th", "21st", "101st"]
    );
}

#[test]
fn constant_series_regression_is_flat() {
    let points: Vec<Point> = (0..5).map(|x| Point::new(x as f64, 42.0)).collect();
    let fit = linear_regression(&points);
    assert_eq!(fit.slope, 0.0);
    assert_eq!(fit.r_squared, 0.0);
}

#[test]
fn sentinel_survives_a_json_round_trip_through_enrichment() {
    let json = r#"[{
        "name": "Ivy",
        "gender": "Girl",
        "rank": "40",
        "count": 3100,
        "rankFrom1996": ["x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x",
                         "300","200","120","80","40"],
        "countFrom1996": ["x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x",
                         "400","700","1200","2000","3100"],
        "rankHistoric": ["x","x","x","x","x","x","x","x","x","x","x","x","70"],
        "relatedNames": [],
        "sourceBatch": "2024-06"
    }]"#;
    let girls: Vec<NameRecord> = serde_json::from_str(json).unwrap();
    let collection = enriched(vec![], girls);
    let ivy = &collection.girls[0];

    let out = serde_json::to_value(ivy).unwrap();
    assert_eq!(out["rankFrom1996"][0], "x");
    assert_eq!(out["rankFrom1996"][28], "40");
    assert_eq!(out["sourceBatch"], "2024-06");
    assert_eq!(out["uniqueSlug"], "ivy");
    assert_eq!(out["classifications"]["recent"], "New Entrant");
}
