// Drafted units and normalization from raw source records.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::source::SourceRecord;

/// Display name used when a record carries neither a name nor an id.
pub const UNKNOWN_NAME: &str = "Unknown";
/// Placeholder for a missing category or affiliation.
pub const UNKNOWN_FIELD: &str = "--";

/// Stable identity of an entity. Numeric ids from the source are stringified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        EntityId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId(s)
    }
}

/// A draftable unit. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Lower is better.
    pub rank: u32,
    pub name: String,
    /// Position or other grouping, display only.
    pub category: String,
    /// Team or other affiliation, display only.
    pub affiliation: String,
}

impl Entity {
    /// Case-insensitive match against name, category and affiliation.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self.category.to_lowercase().contains(&query)
            || self.affiliation.to_lowercase().contains(&query)
    }
}

fn clean(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Normalize raw records into entities, in ingestion order.
///
/// - Missing id: synthesized as `entity-<n>` (1-based ingestion position).
/// - Missing rank: the 1-based ingestion position.
/// - Missing name: the record's id when present, otherwise [`UNKNOWN_NAME`].
/// - Missing category / affiliation: [`UNKNOWN_FIELD`].
///
/// Duplicate ids are logged but kept; rejecting them is the loader's job.
pub fn normalize(records: Vec<SourceRecord>) -> Vec<Entity> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());

    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            let position = idx + 1;
            let given_id = clean(&record.id);
            let id = given_id
                .clone()
                .unwrap_or_else(|| format!("entity-{position}"));
            if !seen.insert(id.clone()) {
                warn!("duplicate entity id '{}' at source position {}", id, position);
            }
            let name = clean(&record.name)
                .or(given_id)
                .unwrap_or_else(|| UNKNOWN_NAME.to_string());

            Entity {
                id: EntityId(id),
                rank: record.rank.unwrap_or(position as u32),
                name,
                category: clean(&record.category).unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
                affiliation: clean(&record.affiliation)
                    .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            }
        })
        .collect()
}
