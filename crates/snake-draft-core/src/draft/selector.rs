// Automated pick policy.

use super::entity::EntityId;
use super::pool::Pool;
use super::DraftError;

/// Chooses an entity for an automated party.
pub trait PickSelector {
    fn choose(&self, pool: &Pool) -> Result<EntityId, DraftError>;
}

/// Always takes the best-ranked entity still in the pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestAvailable;

impl PickSelector for BestAvailable {
    fn choose(&self, pool: &Pool) -> Result<EntityId, DraftError> {
        pool.peek_best()
            .map(|e| e.id.clone())
            .ok_or(DraftError::PoolExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceRecord;

    #[test]
    fn picks_lowest_rank() {
        let pool = Pool::initialize(vec![
            SourceRecord::ranked("b", 2, "B"),
            SourceRecord::ranked("a", 1, "A"),
        ]);
        assert_eq!(BestAvailable.choose(&pool).unwrap(), EntityId::new("a"));
    }

    #[test]
    fn duplicate_ranks_prefer_earlier_record() {
        let pool = Pool::initialize(vec![
            SourceRecord::ranked("first", 3, "First"),
            SourceRecord::ranked("second", 3, "Second"),
        ]);
        assert_eq!(BestAvailable.choose(&pool).unwrap(), EntityId::new("first"));
    }

    #[test]
    fn missing_ranks_compete_by_ingestion_position() {
        let unranked = SourceRecord {
            id: Some("early".into()),
            ..SourceRecord::default()
        };
        // "early" sits at position 1, so its default rank 1 beats rank 5.
        let pool = Pool::initialize(vec![unranked, SourceRecord::ranked("ranked", 5, "R")]);
        assert_eq!(BestAvailable.choose(&pool).unwrap(), EntityId::new("early"));
    }

    #[test]
    fn empty_pool_is_exhausted() {
        let pool = Pool::initialize(vec![]);
        assert_eq!(BestAvailable.choose(&pool), Err(DraftError::PoolExhausted));
    }
}
