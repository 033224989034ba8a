// The undrafted pool, kept sorted best-rank first.

use serde::{Deserialize, Serialize};

use super::entity::{normalize, Entity, EntityId};
use super::DraftError;
use crate::source::SourceRecord;

/// Entities not yet assigned to any party, ascending by rank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pool {
    entities: Vec<Entity>,
}

impl Pool {
    /// Normalize raw records and sort them by rank.
    ///
    /// The sort is stable, so entities with equal ranks keep their
    /// ingestion order. Removal never reorders, so the first entity is
    /// always the best available.
    pub fn initialize(records: Vec<SourceRecord>) -> Self {
        let mut entities = normalize(records);
        entities.sort_by_key(|e| e.rank);
        Pool { entities }
    }

    /// Remove and return the entity with the given id.
    pub fn take_by_id(&mut self, id: &EntityId) -> Result<Entity, DraftError> {
        let idx = self
            .entities
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| DraftError::NotFound(id.clone()))?;
        Ok(self.entities.remove(idx))
    }

    /// The lowest-rank remaining entity, if any.
    pub fn peek_best(&self) -> Option<&Entity> {
        self.entities.first()
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Entities matching a free-text query, in rank order.
    pub fn search<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(move |e| e.matches(query))
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }
}
