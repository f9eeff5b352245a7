//! Label tables produced by the offline clustering step.
//!
//! Three CSV shapes are read:
//!
//! - a direct table with `name`, optional `gender`, and a label column
//!   (five-year archetypes, historic archetype overrides)
//! - a feature table with `name`, `gender`, `cluster_kmeans`
//! - an archetype table with `cluster`, `archetype`
//!
//! Feature and archetype tables are combined into a [`ClusterJoin`] with a
//! popular and an unpopular bucket.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use nt_common::labels::RECENT_CLUSTER_FALLBACK;
use nt_common::{Error, Gender, Result};
use tracing::debug;

/// Lookup key of a table row. `gender` is `None` for name-only tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinKey {
    pub name: String,
    pub gender: Option<Gender>,
}

impl JoinKey {
    pub fn new(name: impl Into<String>, gender: Option<Gender>) -> Self {
        Self {
            name: name.into(),
            gender,
        }
    }
}

/// A parsed CSV file: trimmed header names and raw rows.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    headers: Vec<String>,
    /// `(line number, fields)`; line numbers are 1-based and count the header.
    rows: Vec<(usize, Vec<String>)>,
}

impl CsvTable {
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// Read a headed CSV. Blank lines are skipped and every field is trimmed.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = rdr
            .headers()
            .map_err(malformed)?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(malformed)?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            rows.push((line, record.iter().map(str::to_string).collect()));
        }
        Ok(Self { headers, rows })
    }

    /// Position of a required column.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.optional_column(name).ok_or_else(|| Error::MissingColumn {
            column: name.to_string(),
        })
    }

    pub fn optional_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Rows as `(line, fields)`. Short rows read missing fields as empty.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.rows.iter().map(|(line, fields)| (*line, fields.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn malformed(err: csv::Error) -> Error {
    let line = err.position().map_or(0, |p| p.line() as usize);
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => Error::Io(source),
        _ => Error::MalformedRow { line, reason },
    }
}

fn field(fields: &[String], index: usize) -> &str {
    fields.get(index).map(|f| f.trim()).unwrap_or("")
}

fn read_table(path: &Path) -> Result<CsvTable> {
    CsvTable::from_reader(File::open(path)?)
}

/// Direct `name [| gender] -> label` mapping. Later rows win.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    entries: HashMap<JoinKey, String>,
}

impl LabelTable {
    /// Build from a table with `name`, an optional `gender` column and
    /// `label_column`. Rows with an empty name or label are skipped.
    pub fn from_csv(table: &CsvTable, label_column: &str) -> Result<Self> {
        let name_col = table.column("name")?;
        let label_col = table.column(label_column)?;
        let gender_col = table.optional_column("gender");

        let mut entries = HashMap::new();
        for (_, fields) in table.rows() {
            let name = field(fields, name_col);
            let label = field(fields, label_col);
            if name.is_empty() || label.is_empty() {
                continue;
            }
            let gender = gender_col.and_then(|c| Gender::parse(field(fields, c)));
            entries.insert(JoinKey::new(name, gender), label.to_string());
        }
        Ok(Self { entries })
    }

    pub fn load(path: &Path, label_column: &str) -> Result<Self> {
        let table = Self::from_csv(&read_table(path)?, label_column)?;
        debug!(path = %path.display(), entries = table.len(), "loaded label table");
        Ok(table)
    }

    pub fn insert(&mut self, key: JoinKey, label: impl Into<String>) {
        self.entries.insert(key, label.into());
    }

    /// Exact `name|gender` match first, then a name-only row.
    pub fn lookup(&self, name: &str, gender: Option<Gender>) -> Option<&str> {
        let exact = gender.and_then(|g| self.entries.get(&JoinKey::new(name, Some(g))));
        exact
            .or_else(|| self.entries.get(&JoinKey::new(name, None)))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve names to cluster archetypes: `name|gender -> cluster -> archetype`.
///
/// Names whose cluster has no archetype row are left out, so lookup falls
/// through to the next bucket.
pub fn cluster_labels(features: &CsvTable, archetypes: &CsvTable) -> Result<LabelTable> {
    let cluster_col = archetypes.column("cluster")?;
    let archetype_col = archetypes.column("archetype")?;
    let by_cluster: HashMap<&str, &str> = archetypes
        .rows()
        .map(|(_, f)| (field(f, cluster_col), field(f, archetype_col)))
        .filter(|(c, a)| !c.is_empty() && !a.is_empty())
        .collect();

    let name_col = features.column("name")?;
    let feature_cluster_col = features.column("cluster_kmeans")?;
    let gender_col = features.optional_column("gender");

    let mut table = LabelTable::default();
    for (_, fields) in features.rows() {
        let name = field(fields, name_col);
        let Some(archetype) = by_cluster.get(field(fields, feature_cluster_col)) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let gender = gender_col.and_then(|c| Gender::parse(field(fields, c)));
        table.insert(JoinKey::new(name, gender), *archetype);
    }
    Ok(table)
}

/// Popular bucket first, then unpopular, then the fixed fallback.
#[derive(Debug, Clone, Default)]
pub struct ClusterJoin {
    pub popular: LabelTable,
    pub unpopular: LabelTable,
}

impl ClusterJoin {
    pub fn load(
        popular_features: &Path,
        popular_archetypes: &Path,
        unpopular_features: &Path,
        unpopular_archetypes: &Path,
    ) -> Result<Self> {
        let popular = cluster_labels(
            &read_table(popular_features)?,
            &read_table(popular_archetypes)?,
        )?;
        let unpopular = cluster_labels(
            &read_table(unpopular_features)?,
            &read_table(unpopular_archetypes)?,
        )?;
        debug!(
            popular = popular.len(),
            unpopular = unpopular.len(),
            "loaded cluster archetypes"
        );
        Ok(Self { popular, unpopular })
    }

    pub fn lookup(&self, name: &str, gender: Option<Gender>) -> Option<&str> {
        self.popular
            .lookup(name, gender)
            .or_else(|| self.unpopular.lookup(name, gender))
    }

    /// The archetype, or `"Uncategorized recent pattern"` on a miss.
    pub fn label_for(&self, name: &str, gender: Option<Gender>) -> &str {
        self.lookup(name, gender).unwrap_or(RECENT_CLUSTER_FALLBACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(text: &str) -> CsvTable {
        CsvTable::parse(text).unwrap()
    }

    #[test]
    fn quoted_fields_keep_commas_and_quotes() {
        let parsed = table("name,archetype,note\nAda,\"Rising, then flat\",\"say \"\"hi\"\"\"\n");
        let (line, fields) = parsed.rows().next().unwrap();
        assert_eq!(line, 2);
        assert_eq!(fields, ["Ada", "Rising, then flat", "say \"hi\""]);
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let err = CsvTable::from_reader(&b"name,archetype\nAda,\xff\xfe\n"[..]).unwrap_err();
        assert!(matches!(err, Error::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn missing_label_column_is_reported() {
        let err = LabelTable::from_csv(&table("name,cluster\nAda,1\n"), "archetype").unwrap_err();
        assert!(matches!(err, Error::MissingColumn { ref column } if column == "archetype"));
    }

    #[test]
    fn name_only_table_matches_any_gender() {
        let labels =
            LabelTable::from_csv(&table("name,archetype\r\nAda,Rising Star\r\n\r\n"), "archetype")
                .unwrap();
        assert_eq!(labels.lookup("Ada", Some(Gender::Girl)), Some("Rising Star"));
        assert_eq!(labels.lookup("Ada", None), Some("Rising Star"));
        assert_eq!(labels.lookup("ada", None), None);
    }

    #[test]
    fn gendered_table_prefers_exact_match() {
        let labels = LabelTable::from_csv(
            &table("name,gender,archetype\nSam,Boy,Classic\nSam,Girl,Newcomer\n"),
            "archetype",
        )
        .unwrap();
        assert_eq!(labels.lookup("Sam", Some(Gender::Girl)), Some("Newcomer"));
        assert_eq!(labels.lookup("Sam", Some(Gender::Boy)), Some("Classic"));
        assert_eq!(labels.lookup("Sam", None), None);
    }

    #[test]
    fn cluster_join_falls_through_buckets() {
        let popular = cluster_labels(
            &table("name,gender,cluster_kmeans\nAda,Girl,0\nBea,Girl,9\n"),
            &table("cluster,archetype\n0,Steady Favourite\n"),
        )
        .unwrap();
        let unpopular = cluster_labels(
            &table("name,gender,cluster_kmeans\nBea,Girl,2\n"),
            &table("cluster,archetype\n2,Quiet Riser\n"),
        )
        .unwrap();
        let join = ClusterJoin { popular, unpopular };

        assert_eq!(join.label_for("Ada", Some(Gender::Girl)), "Steady Favourite");
        // Bea's popular cluster has no archetype row.
        assert_eq!(join.label_for("Bea", Some(Gender::Girl)), "Quiet Riser");
        assert_eq!(join.label_for("Cy", Some(Gender::Boy)), RECENT_CLUSTER_FALLBACK);
    }
}
