// Ranked source list loading (CSV / JSON).
//
// Records are loose: every field is optional and ids or ranks may
// arrive as numbers or strings. Normalization into `Entity` values happens in
// `draft::entity`, not here.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unsupported source format for {path} (expected .csv or .json)")]
    UnsupportedFormat { path: PathBuf },
}

// ---------------------------------------------------------------------------
// SourceRecord
// ---------------------------------------------------------------------------

/// One raw row of the ranked list, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    #[serde(
        default,
        alias = "ID",
        alias = "Id",
        alias = "player_id",
        deserialize_with = "lenient_id"
    )]
    pub id: Option<String>,
    #[serde(
        default,
        alias = "Rank",
        alias = "RANK",
        alias = "rk",
        deserialize_with = "lenient_rank"
    )]
    pub rank: Option<u32>,
    #[serde(default, alias = "Name", alias = "player", alias = "Player")]
    pub name: Option<String>,
    #[serde(
        default,
        alias = "Category",
        alias = "position",
        alias = "Position",
        alias = "pos",
        alias = "POS"
    )]
    pub category: Option<String>,
    #[serde(
        default,
        alias = "Affiliation",
        alias = "team",
        alias = "Team"
    )]
    pub affiliation: Option<String>,
}

impl SourceRecord {
    /// Convenience constructor used by tests and in-memory sources.
    pub fn ranked(id: &str, rank: u32, name: &str) -> Self {
        SourceRecord {
            id: Some(id.to_string()),
            rank: Some(rank),
            name: Some(name.to_string()),
            category: None,
            affiliation: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient field deserializers
// ---------------------------------------------------------------------------

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or integer identity")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.is_finite() && v.fract() == 0.0 {
            Ok(Some(format!("{}", v as i64)))
        } else {
            Ok(Some(v.to_string()))
        }
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(IdVisitor)
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    d.deserialize_any(IdVisitor)
}

struct RankVisitor;

impl<'de> Visitor<'de> for RankVisitor {
    type Value = Option<u32>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative rank")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(u32::try_from(v).ok())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(u32::try_from(v).ok())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.is_finite() && v >= 0.0 && v <= u32::MAX as f64 {
            Ok(Some(v.round() as u32))
        } else {
            Ok(None)
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if let Ok(n) = trimmed.parse::<u32>() {
            return Ok(Some(n));
        }
        match trimmed.parse::<f64>() {
            Ok(f) => self.visit_f64(f),
            Err(_) => Ok(None),
        }
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(RankVisitor)
    }
}

fn lenient_rank<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    d.deserialize_any(RankVisitor)
}

// ---------------------------------------------------------------------------
// Reader-based parsers (enable testing without temp files)
// ---------------------------------------------------------------------------

/// Parse CSV rows. Malformed rows are skipped with a warning rather than
/// failing the whole load.
pub fn records_from_csv<R: Read>(rdr: R) -> Result<Vec<SourceRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<SourceRecord>().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => warn!("skipping malformed source row {}: {}", row + 1, e),
        }
    }
    Ok(records)
}

/// Parse a JSON array of records, or an object with a `players` / `entities`
/// array (the shapes the ranked-list exports come in).
pub fn records_from_json(text: &str) -> Result<Vec<SourceRecord>, serde_json::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum JsonShape {
        List(Vec<SourceRecord>),
        Wrapped {
            #[serde(alias = "players", alias = "entities")]
            items: Vec<SourceRecord>,
        },
    }

    let shape: JsonShape = serde_json::from_str(text)?;
    Ok(match shape {
        JsonShape::List(items) | JsonShape::Wrapped { items } => items,
    })
}

// ---------------------------------------------------------------------------
// EntitySource
// ---------------------------------------------------------------------------

/// Supplies the ranked list once, before the draft begins.
#[async_trait]
pub trait EntitySource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<SourceRecord>, SourceError>;
}

/// Loads records from a `.csv` or `.json` file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EntitySource for FileSource {
    async fn fetch(&self) -> Result<Vec<SourceRecord>, SourceError> {
        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Io {
                path: self.path.clone(),
                source: e,
            })?;

        let records = match extension.as_deref() {
            Some("csv") => records_from_csv(text.as_bytes()).map_err(|e| SourceError::Csv {
                path: self.path.clone(),
                source: e,
            })?,
            Some("json") => records_from_json(&text).map_err(|e| SourceError::Json {
                path: self.path.clone(),
                source: e,
            })?,
            _ => {
                return Err(SourceError::UnsupportedFormat {
                    path: self.path.clone(),
                })
            }
        };

        info!(
            "Loaded {} source records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

/// In-memory source, mostly for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct StaticSource(pub Vec<SourceRecord>);

#[async_trait]
impl EntitySource for StaticSource {
    async fn fetch(&self) -> Result<Vec<SourceRecord>, SourceError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_with_all_columns() {
        let data = "id,rank,name,position,team\n\
                    p1,1,Alpha,RB,NYJ\n\
                    p2,2,Bravo,WR,KC\n";
        let records = records_from_csv(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_deref(), Some("p1"));
        assert_eq!(records[0].rank, Some(1));
        assert_eq!(records[0].name.as_deref(), Some("Alpha"));
        assert_eq!(records[0].category.as_deref(), Some("RB"));
        assert_eq!(records[1].affiliation.as_deref(), Some("KC"));
    }

    #[test]
    fn csv_missing_fields_become_none() {
        let data = "id,rank,name\n,,Charlie\n7,,\n";
        let records = records_from_csv(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, None);
        assert_eq!(records[0].rank, None);
        assert_eq!(records[0].name.as_deref(), Some("Charlie"));
        assert_eq!(records[1].id.as_deref(), Some("7"));
    }

    #[test]
    fn csv_header_aliases() {
        let data = "Rank,Player,POS,Team\n3,Delta,QB,BUF\n";
        let records = records_from_csv(data.as_bytes()).unwrap();
        assert_eq!(records[0].rank, Some(3));
        assert_eq!(records[0].name.as_deref(), Some("Delta"));
        assert_eq!(records[0].category.as_deref(), Some("QB"));
        assert_eq!(records[0].affiliation.as_deref(), Some("BUF"));
    }

    #[test]
    fn json_array_with_numeric_ids_and_string_ranks() {
        let text = r#"[
            {"id": 101, "rank": "2", "name": "Echo"},
            {"id": "x-9", "rank": 1.0, "name": "Foxtrot"},
            {"name": "Golf", "rank": null}
        ]"#;
        let records = records_from_json(text).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id.as_deref(), Some("101"));
        assert_eq!(records[0].rank, Some(2));
        assert_eq!(records[1].id.as_deref(), Some("x-9"));
        assert_eq!(records[1].rank, Some(1));
        assert_eq!(records[2].id, None);
        assert_eq!(records[2].rank, None);
    }

    #[test]
    fn json_wrapped_players_object() {
        let text = r#"{"players": [{"id": "a", "name": "Hotel"}]}"#;
        let records = records_from_json(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("Hotel"));
    }

    #[test]
    fn json_negative_rank_is_dropped() {
        let records = records_from_json(r#"[{"id": "a", "rank": -4}]"#).unwrap();
        assert_eq!(records[0].rank, None);
    }

    #[tokio::test]
    async fn file_source_rejects_unknown_extension() {
        let tmp = std::env::temp_dir().join("snake_draft_source_unknown.txt");
        std::fs::write(&tmp, "id,rank\n").unwrap();
        let err = FileSource::new(&tmp).fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedFormat { .. }));
        let _ = std::fs::remove_file(&tmp);
    }

    #[tokio::test]
    async fn file_source_reads_csv() {
        let tmp = std::env::temp_dir().join("snake_draft_source_ok.csv");
        std::fs::write(&tmp, "id,rank,name\na,1,India\nb,2,Juliet\n").unwrap();
        let records = FileSource::new(&tmp).fetch().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name.as_deref(), Some("Juliet"));
        let _ = std::fs::remove_file(&tmp);
    }

    #[test]
    fn bundled_rankings_cover_default_draft() {
        let text = include_str!("../../../data/rankings.csv");
        let records = records_from_csv(text.as_bytes()).unwrap();
        assert!(records.len() >= 100);
        assert!(records.iter().all(|r| r.id.is_some() && r.rank.is_some()));
        assert_eq!(records[0].category.as_deref(), Some("OF"));
    }

    #[tokio::test]
    async fn file_source_missing_file_is_io_error() {
        let err = FileSource::new("/nonexistent/snake_draft/rankings.csv")
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[tokio::test]
    async fn static_source_returns_records() {
        let source = StaticSource(vec![SourceRecord::ranked("a", 1, "Kilo")]);
        let records = source.fetch().await.unwrap();
        assert_eq!(records, vec![SourceRecord::ranked("a", 1, "Kilo")]);
    }
}
