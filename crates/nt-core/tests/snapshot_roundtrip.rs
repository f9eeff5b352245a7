//! Load, enrich, save and reload a snapshot pair on disk.

use nt_common::{Gender, NameRecord, SeriesValue};
use nt_config::TrendConfig;
use nt_core::pipeline::{enrich, LabelTables};
use nt_core::snapshot::{load_collection, save_search_index, save_snapshot, SnapshotError};
use tempfile::TempDir;

const BOYS: &str = r#"[
  {"name": "Jordan", "gender": "Boy", "rank": 90, "count": 2900,
   "rankFrom1996": ["40","45","52","60","66","71","75","80","81","82","84","85","86","88","89","90","90","91","92","93","94","95","95","96","97","97","98","89","90"],
   "countFrom1996": ["9000","8700","8100","7600","7000","6600","6200","5900","5600","5400","5200","5000","4800","4600","4400","4200","4000","3900","3700","3600","3400","3300","3200","3100","3000","2950","2900","3050","2900"],
   "rankHistoric": ["x","x","x","x","x","x","180","60","40","45","70","95","90"],
   "relatedNames": ["Jordyn", "Jordan"],
   "editorNote": {"reviewed": true}},
  {"name": "Jordan", "gender": "Boy", "rank": "x"}
]"#;

const GIRLS: &str = r#"[
  {"name": "Jordyn", "gender": "Girl", "rank": 350, "count": 700,
   "rankFrom1996": ["x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","350"],
   "countFrom1996": ["x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","700"],
   "rankHistoric": ["x","x","x","x","x","x","x","x","x","x","x","x","x"],
   "relatedNames": ["Jordan"]},
  {"name": "Jordan", "gender": "Girl", "rank": 400, "count": 600,
   "rankFrom1996": ["x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","400"],
   "countFrom1996": ["x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","x","600"],
   "rankHistoric": ["x","x","x","x","x","x","x","x","x","x","x","x","x"]}
]"#;

#[test]
fn enriched_pair_round_trips_through_disk() {
    let dir = TempDir::new().unwrap();
    let boys_path = dir.path().join("boys.json");
    let girls_path = dir.path().join("girls.json");
    std::fs::write(&boys_path, BOYS).unwrap();
    std::fs::write(&girls_path, GIRLS).unwrap();

    let mut collection = load_collection(Some(boys_path.as_path()), Some(girls_path.as_path())).unwrap();
    let report = enrich(&mut collection, &LabelTables::default(), &TrendConfig::default());
    assert_eq!(report.records, 4);
    save_snapshot(&boys_path, &collection.boys).unwrap();
    save_snapshot(&girls_path, &collection.girls).unwrap();
    save_search_index(&dir.path().join("search.json"), &collection).unwrap();

    let reloaded = load_collection(Some(boys_path.as_path()), Some(girls_path.as_path())).unwrap();
    assert_eq!(reloaded, collection);

    let jordan = &reloaded.boys[0];
    assert_eq!(jordan.unique_slug.as_deref(), Some("jordan-1"));
    assert_eq!(reloaded.boys[1].unique_slug.as_deref(), Some("jordan-2"));
    assert_eq!(reloaded.girls[1].unique_slug.as_deref(), Some("jordan"));
    assert_eq!(jordan.extra["editorNote"]["reviewed"], true);

    // Jordyn once, then Jordan for both boy records and the girl record.
    let related: Vec<_> = jordan
        .related_names_with_rank
        .iter()
        .map(|r| (r.name.as_str(), r.gender))
        .collect();
    assert_eq!(
        related,
        vec![
            ("Jordyn", Some(Gender::Girl)),
            ("Jordan", Some(Gender::Boy)),
            ("Jordan", Some(Gender::Boy)),
            ("Jordan", Some(Gender::Girl)),
        ]
    );
    assert_eq!(
        jordan.related_total_count_from_1996[28],
        SeriesValue::Present(700 + 2900 + 600)
    );
    assert_eq!(jordan.related_total_count_from_1996[0], SeriesValue::Present(9000));

    let sparse = &reloaded.boys[1];
    assert!(sparse.rank.is_none());
    assert_eq!(sparse.classifications.recent.as_deref(), Some("No Recent Data"));
    assert!(sparse.bullet_point_1.is_none());
}

#[test]
fn rewritten_snapshot_uses_string_sentinels() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("girls.json");
    let mut record = NameRecord::new("Wren", Gender::Girl);
    record.rank_historic = vec![SeriesValue::Unranked, SeriesValue::Present(88)];
    save_snapshot(&path, &[record]).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"x\""));
    assert!(text.contains("\"88\""));
}

#[test]
fn girls_file_with_a_boy_is_rejected() {
    let dir = TempDir::new().unwrap();
    let girls_path = dir.path().join("girls.json");
    std::fs::write(&girls_path, BOYS).unwrap();

    let err = load_collection(None, Some(girls_path.as_path())).unwrap_err();
    assert!(matches!(
        err,
        SnapshotError::MixedGender {
            expected: Gender::Girl,
            found: Gender::Boy,
            index: 0,
            ..
        }
    ));
}
