// Draft domain: entities, pool, rosters, turn order, and the pick engine.

pub mod engine;
pub mod entity;
pub mod events;
pub mod pool;
pub mod roster;
pub mod selector;
pub mod turn;

use thiserror::Error;

use entity::EntityId;

/// Why a pick request was refused.
///
/// Every variant is raised before any state is touched, so a rejected request
/// never leaves the pool, rosters, or turn order half-updated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("the draft is already complete")]
    DraftComplete,

    #[error("party {requested} is not on the clock (party {on_clock} is)")]
    NotOnClock { requested: usize, on_clock: usize },

    #[error("entity '{0}' is not in the pool")]
    NotFound(EntityId),

    #[error("no entities left to pick")]
    PoolExhausted,
}
