//! Reading and writing record snapshots.
//!
//! A snapshot is a JSON array of name records holding a single gender.
//! Entries are parsed one at a time: an entry that is not a readable record
//! is set aside as [`UnreadableEntry`] and written back verbatim at its
//! original position. Writes go to a temporary sibling file first and are
//! renamed into place so a failed run never leaves a truncated snapshot
//! behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use nt_common::{Gender, NameRecord, SearchEntry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::pipeline::NameCollection;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: record {index} is {found}, expected only {expected} records")]
    MixedGender {
        path: PathBuf,
        index: usize,
        expected: Gender,
        found: Gender,
    },
}

impl SnapshotError {
    pub fn path(&self) -> &Path {
        match self {
            SnapshotError::Io { path, .. }
            | SnapshotError::Json { path, .. }
            | SnapshotError::MixedGender { path, .. } => path,
        }
    }
}

impl From<&SnapshotError> for nt_common::Error {
    fn from(err: &SnapshotError) -> Self {
        match err {
            SnapshotError::Io { source, .. } => {
                nt_common::Error::Io(std::io::Error::new(source.kind(), err.to_string()))
            }
            SnapshotError::Json { .. } => nt_common::Error::InvalidSnapshot(err.to_string()),
            SnapshotError::MixedGender {
                expected, found, ..
            } => nt_common::Error::MixedGender {
                expected: expected.to_string(),
                found: found.to_string(),
            },
        }
    }
}

/// A snapshot entry that did not parse as a name record.
#[derive(Debug, Clone, PartialEq)]
pub struct UnreadableEntry {
    /// Position in the snapshot array.
    pub index: usize,
    /// The `name` field when it is a string, else empty.
    pub name: String,
    pub reason: String,
    pub raw: Value,
}

impl UnreadableEntry {
    fn new(index: usize, raw: Value, err: serde_json::Error) -> Self {
        Self {
            index,
            name: raw
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            reason: err.to_string(),
            raw,
        }
    }
}

/// The parsed contents of one snapshot file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub records: Vec<NameRecord>,
    /// Entries in ascending `index` order.
    pub unreadable: Vec<UnreadableEntry>,
}

impl Snapshot {
    /// Parse each array entry on its own so one bad entry does not sink the
    /// rest of the file.
    pub fn from_entries(entries: Vec<Value>) -> Self {
        let mut snapshot = Snapshot::default();
        for (index, raw) in entries.into_iter().enumerate() {
            match NameRecord::deserialize(&raw) {
                Ok(record) => snapshot.records.push(record),
                Err(err) => {
                    let entry = UnreadableEntry::new(index, raw, err);
                    warn!(index, name = %entry.name, reason = %entry.reason, "unreadable snapshot entry");
                    snapshot.unreadable.push(entry);
                }
            }
        }
        snapshot
    }

    pub fn len(&self) -> usize {
        self.records.len() + self.unreadable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.unreadable.is_empty()
    }
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    let content = std::fs::read(path).map_err(|e| SnapshotError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let entries: Vec<Value> = serde_json::from_slice(&content).map_err(|e| SnapshotError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    let snapshot = Snapshot::from_entries(entries);
    debug!(
        path = %path.display(),
        records = snapshot.records.len(),
        unreadable = snapshot.unreadable.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

/// Reject a snapshot holding a record of the other gender. Records without
/// a gender are accepted; enrichment fills them from the partition.
pub fn check_partition(
    path: &Path,
    records: &[NameRecord],
    expected: Gender,
) -> Result<(), SnapshotError> {
    let stray = records
        .iter()
        .enumerate()
        .find_map(|(i, r)| r.gender.filter(|g| *g != expected).map(|g| (i, g)));
    match stray {
        Some((index, found)) => Err(SnapshotError::MixedGender {
            path: path.to_path_buf(),
            index,
            expected,
            found,
        }),
        None => Ok(()),
    }
}

pub fn load_partition(path: &Path, gender: Gender) -> Result<Snapshot, SnapshotError> {
    let snapshot = load_snapshot(path)?;
    check_partition(path, &snapshot.records, gender)?;
    Ok(snapshot)
}

/// Load both snapshots into one collection.
pub fn load_collection(
    boys: Option<&Path>,
    girls: Option<&Path>,
) -> Result<NameCollection, SnapshotError> {
    let mut collection = NameCollection::default();
    for (gender, path) in [(Gender::Boy, boys), (Gender::Girl, girls)] {
        if let Some(path) = path {
            let snapshot = load_partition(path, gender)?;
            collection.insert_partition(gender, snapshot.records, snapshot.unreadable);
        }
    }
    Ok(collection)
}

pub fn save_snapshot(path: &Path, records: &[NameRecord]) -> Result<(), SnapshotError> {
    save_entries(path, records, &[])
}

/// Write one partition of the collection, unreadable entries included.
pub fn save_partition(
    path: &Path,
    collection: &NameCollection,
    gender: Gender,
) -> Result<(), SnapshotError> {
    save_entries(
        path,
        collection.partition(gender),
        collection.unreadable(gender),
    )
}

#[derive(Serialize)]
#[serde(untagged)]
enum Entry<'a> {
    Record(&'a NameRecord),
    Raw(&'a Value),
}

/// Interleave records with the unreadable entries at their original
/// positions.
fn merge_entries<'a>(records: &'a [NameRecord], unreadable: &'a [UnreadableEntry]) -> Vec<Entry<'a>> {
    let mut records = records.iter();
    let mut out = Vec::with_capacity(records.len() + unreadable.len());
    for entry in unreadable {
        while out.len() < entry.index {
            match records.next() {
                Some(record) => out.push(Entry::Record(record)),
                None => break,
            }
        }
        out.push(Entry::Raw(&entry.raw));
    }
    out.extend(records.map(Entry::Record));
    out
}

fn save_entries(
    path: &Path,
    records: &[NameRecord],
    unreadable: &[UnreadableEntry],
) -> Result<(), SnapshotError> {
    write_json_pretty_atomic(path, &merge_entries(records, unreadable))?;
    debug!(
        path = %path.display(),
        records = records.len(),
        unreadable = unreadable.len(),
        "wrote snapshot"
    );
    Ok(())
}

/// Entries for the client-side search index; records without a slug are
/// left out.
pub fn search_index(collection: &NameCollection) -> Vec<SearchEntry> {
    collection.iter().filter_map(NameRecord::search_entry).collect()
}

pub fn save_search_index(path: &Path, collection: &NameCollection) -> Result<(), SnapshotError> {
    write_json_pretty_atomic(path, &search_index(collection))
}

fn write_json_pretty_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SnapshotError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let content = serde_json::to_vec_pretty(value).map_err(|e| SnapshotError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("snapshot.json");
    let tmp_path = path.with_file_name(format!("{}.tmp.{}", file_name, std::process::id()));
    {
        let mut file = std::fs::File::create(&tmp_path).map_err(|e| SnapshotError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        file.write_all(&content)
            .and_then(|_| file.write_all(b"\n"))
            .map_err(|e| SnapshotError::Io {
                path: tmp_path.clone(),
                source: e,
            })?;
        let _ = file.sync_all();
    }
    std::fs::rename(&tmp_path, path).map_err(|e| SnapshotError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_then_load_preserves_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("girls.json");
        let mut ada = NameRecord::new("Ada", Gender::Girl);
        ada.unique_slug = Some("ada".into());
        save_snapshot(&path, &[ada.clone()]).unwrap();

        let loaded = load_partition(&path, Gender::Girl).unwrap();
        assert_eq!(loaded.records, vec![ada]);
        assert!(loaded.unreadable.is_empty());
        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn wrong_gender_is_rejected() {
        let records = vec![
            NameRecord::new("Ada", Gender::Girl),
            NameRecord::new("Bo", Gender::Boy),
        ];
        let err = check_partition(Path::new("girls.json"), &records, Gender::Girl).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::MixedGender {
                index: 1,
                found: Gender::Boy,
                ..
            }
        ));
        assert_eq!(nt_common::Error::from(&err).code(), 21);
    }

    #[test]
    fn non_array_is_a_json_error_with_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("boys.json");
        std::fs::write(&path, r#"{"name": "Bo"}"#).unwrap();
        let err = load_snapshot(&path).unwrap_err();
        assert!(matches!(err, SnapshotError::Json { .. }));
        assert_eq!(err.path(), path.as_path());
        assert!(err.to_string().contains("boys.json"));
    }

    #[test]
    fn null_fields_do_not_sink_the_partition() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("boys.json");
        std::fs::write(
            &path,
            r#"[
                {"name": "Aaron", "gender": "Boy", "rank": 61},
                {"name": "Abe", "gender": "Boy", "rankFrom1996": null, "relatedNames": null}
            ]"#,
        )
        .unwrap();
        let snapshot = load_partition(&path, Gender::Boy).unwrap();
        assert_eq!(snapshot.records.len(), 2);
        assert_eq!(snapshot.records[0].rank, Some(61));
        assert!(snapshot.records[1].rank_from_1996.is_empty());
        assert!(snapshot.records[1].related_names.is_empty());
        assert!(snapshot.unreadable.is_empty());
    }

    #[test]
    fn unreadable_entry_is_kept_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("girls.json");
        std::fs::write(
            &path,
            r#"[
                {"name": "Ada", "gender": "Girl"},
                {"name": "Bea", "gender": "Girl", "relatedNames": "Beatrice"},
                "stray",
                {"name": "Cleo", "gender": "Girl"}
            ]"#,
        )
        .unwrap();
        let snapshot = load_snapshot(&path).unwrap();
        assert_eq!(snapshot.len(), 4);
        let names: Vec<&str> = snapshot.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Ada", "Cleo"]);
        let positions: Vec<usize> = snapshot.unreadable.iter().map(|e| e.index).collect();
        assert_eq!(positions, [1, 2]);
        assert_eq!(snapshot.unreadable[0].name, "Bea");
        assert_eq!(snapshot.unreadable[1].name, "");

        let mut collection = NameCollection::default();
        collection.insert_partition(Gender::Girl, snapshot.records, snapshot.unreadable);
        save_partition(&path, &collection, Gender::Girl).unwrap();

        let written: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        let entries = written.as_array().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0]["name"], "Ada");
        assert_eq!(entries[1]["relatedNames"], "Beatrice");
        assert_eq!(entries[2], "stray");
        assert_eq!(entries[3]["name"], "Cleo");
    }

    #[test]
    fn unreadable_entries_past_the_end_are_appended() {
        let raw = Value::from(7);
        let tail = UnreadableEntry {
            index: 5,
            name: String::new(),
            reason: "not an object".into(),
            raw: raw.clone(),
        };
        let records = [NameRecord::new("Ada", Gender::Girl)];
        let merged = merge_entries(&records, std::slice::from_ref(&tail));
        assert_eq!(merged.len(), 2);
        assert!(matches!(merged[1], Entry::Raw(v) if *v == raw));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_snapshot(Path::new("/nonexistent/boys.json")).unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
    }
}
