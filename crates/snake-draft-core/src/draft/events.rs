// Pick records and the events the engine hands to its collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// How a pick was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickSource {
    /// Chosen explicitly through `request_pick`, whichever party asked.
    Human,
    /// Chosen by the selector when a scheduled ticket ran.
    Automated,
}

/// A single completed pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickRecord {
    /// Overall pick number (1-indexed).
    pub pick_number: usize,
    pub round: u32,
    /// Index of the party that made the pick.
    pub party: usize,
    pub party_name: String,
    pub entity: Entity,
    pub source: PickSource,
    pub recorded_at: DateTime<Utc>,
}

/// Notifications emitted while the draft runs.
///
/// The engine returns these from each call instead of invoking callbacks;
/// the caller forwards them to whatever renders the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DraftEvent {
    PickRecorded(PickRecord),
    TurnChanged {
        party: usize,
        round: u32,
        is_human: bool,
    },
    DraftComplete {
        picks_made: usize,
        /// True when the pool ran dry before every party filled its rounds.
        ended_early: bool,
    },
}
