// Parties and their append-only rosters.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};

/// A party's drafted entities, in pick order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    entries: Vec<Entity>,
}

impl Roster {
    pub fn new() -> Self {
        Roster::default()
    }

    /// Only the engine appends; there is no removal.
    pub(crate) fn push(&mut self, entity: Entity) {
        self.entries.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entries.iter()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entries.iter().any(|e| &e.id == id)
    }

    pub fn last(&self) -> Option<&Entity> {
        self.entries.last()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entries
    }
}

/// One participant in the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub index: usize,
    pub name: String,
    pub is_human: bool,
    pub roster: Roster,
}

impl Party {
    pub fn new(index: usize, name: impl Into<String>, is_human: bool) -> Self {
        Party {
            index,
            name: name.into(),
            is_human,
            roster: Roster::new(),
        }
    }
}

/// Build the party list for a draft.
///
/// Uses `names` when it has exactly one entry per party; otherwise parties are
/// named "Team 1".."Team N", with the human party called "You".
pub fn build_parties(parties: usize, human_party: usize, names: &[String]) -> Vec<Party> {
    (0..parties)
        .map(|idx| {
            let is_human = idx == human_party;
            let name = if names.len() == parties {
                names[idx].clone()
            } else if is_human {
                "You".to_string()
            } else {
                format!("Team {}", idx + 1)
            };
            Party::new(idx, name, is_human)
        })
        .collect()
}
