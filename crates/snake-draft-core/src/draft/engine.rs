// Pick allocation: validates requests, moves entities from the pool to the
// party on the clock, advances the turn order and hands automated turns to the
// scheduler.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::entity::{Entity, EntityId};
use super::events::{DraftEvent, PickRecord, PickSource};
use super::pool::Pool;
use super::roster::{build_parties, Party};
use super::selector::{BestAvailable, PickSelector};
use super::turn::{DraftState, TurnSequencer};
use super::DraftError;
use crate::config::{ConfigError, DraftSettings};
use crate::scheduler::{AutoPickTicket, PickScheduler, QueuedScheduler};
use crate::source::SourceRecord;

/// How many upcoming parties a snapshot lists.
const ON_DECK_LEN: usize = 5;

/// Why a draft stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
    /// Every party made all of its picks.
    AllPicksMade,
    /// The pool ran out before the pick cap was reached.
    PoolExhausted,
}

/// Who acts next after a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextTurn {
    /// Waiting on the human party.
    Human { party: usize, round: u32 },
    /// An automated pick has been scheduled.
    Automated { party: usize, round: u32 },
    Complete,
}

/// Result of a successful pick request.
#[derive(Debug, Clone)]
pub struct PickOutcome {
    /// `None` only when an automated turn found nothing to pick and the
    /// draft ended instead.
    pub pick: Option<PickRecord>,
    /// Events in emission order: the pick first, then either a turn change or
    /// draft completion.
    pub events: Vec<DraftEvent>,
    pub next: NextTurn,
}

/// An automated pick failed part way through [`DraftEngine::run_pending`].
///
/// Picks made before the failure are already applied; their outcomes are
/// kept here so their events are not lost.
#[derive(Debug, Clone, Error)]
#[error("automated pick failed after {} picks: {error}", .completed.len())]
pub struct PendingRunError {
    pub completed: Vec<PickOutcome>,
    #[source]
    pub error: DraftError,
}

/// Serializable view of the whole draft for renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub state: DraftState,
    pub total_picks: usize,
    pub human_party: usize,
    pub available: Vec<Entity>,
    pub parties: Vec<Party>,
    pub picks: Vec<PickRecord>,
    /// Parties picking after the one on the clock.
    pub on_deck: Vec<usize>,
    pub completion: Option<Completion>,
}

impl DraftSnapshot {
    pub fn is_complete(&self) -> bool {
        self.completion.is_some()
    }

    pub fn is_human_turn(&self) -> bool {
        !self.is_complete() && self.state.party_index == self.human_party
    }
}

/// Owns all state for one draft. Independent engines never share anything.
pub struct DraftEngine<S: PickScheduler = QueuedScheduler> {
    pool: Pool,
    parties: Vec<Party>,
    sequencer: TurnSequencer,
    human_party: usize,
    picks: Vec<PickRecord>,
    completion: Option<Completion>,
    initial_size: usize,
    selector: Box<dyn PickSelector + Send + Sync>,
    scheduler: S,
}

impl<S: PickScheduler> DraftEngine<S> {
    /// Build a draft from validated settings and the raw ranked list.
    ///
    /// Call [`start`](Self::start) afterwards to put the first party on the
    /// clock.
    pub fn new(
        settings: &DraftSettings,
        records: Vec<SourceRecord>,
        scheduler: S,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;

        let pool = Pool::initialize(records);
        let needed = settings.parties * settings.rounds as usize;
        if pool.len() < needed {
            warn!(
                "Pool has {} entities but the draft calls for {} picks; it will end early",
                pool.len(),
                needed
            );
        }

        Ok(DraftEngine {
            initial_size: pool.len(),
            pool,
            parties: build_parties(settings.parties, settings.human_party, &settings.party_names),
            sequencer: TurnSequencer::new(settings.parties, settings.rounds),
            human_party: settings.human_party,
            picks: Vec::new(),
            completion: None,
            selector: Box::new(BestAvailable),
            scheduler,
        })
    }

    /// Swap the automated pick policy.
    pub fn with_selector(mut self, selector: impl PickSelector + Send + Sync + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    /// Open the draft: announce who is on the clock and schedule an automated
    /// pick if that party is not the human.
    pub fn start(&mut self) -> Vec<DraftEvent> {
        if self.is_complete() {
            return Vec::new();
        }
        info!(
            "Draft starting: {} parties, {} rounds, {} entities",
            self.parties.len(),
            self.sequencer.rounds(),
            self.pool.len()
        );
        if self.pool.is_empty() {
            return vec![self.finish(Completion::PoolExhausted)];
        }
        vec![self.announce_turn()]
    }

    /// Draft `entity_id` for `party`.
    ///
    /// Fails without touching any state if the draft is over, `party` is not
    /// on the clock, or the entity is no longer in the pool.
    pub fn request_pick(
        &mut self,
        entity_id: &EntityId,
        party: usize,
    ) -> Result<PickOutcome, DraftError> {
        self.ensure_open()?;

        let on_clock = self.sequencer.current_party();
        if party != on_clock {
            return Err(DraftError::NotOnClock {
                requested: party,
                on_clock,
            });
        }

        self.pick_as(entity_id, party, PickSource::Human)
    }

    fn pick_as(
        &mut self,
        entity_id: &EntityId,
        party: usize,
        source: PickSource,
    ) -> Result<PickOutcome, DraftError> {
        let entity = self.pool.take_by_id(entity_id)?;
        Ok(self.commit(entity, party, source))
    }

    /// Execute a ticket previously handed to the scheduler.
    ///
    /// The ticket is checked against the current turn again: if the draft
    /// finished or moved on since it was issued, it is rejected. If the
    /// selector finds nothing, the draft ends early and the outcome carries
    /// the completion event but no pick.
    pub fn run_automated(&mut self, ticket: AutoPickTicket) -> Result<PickOutcome, DraftError> {
        self.ensure_open()?;

        let on_clock = self.sequencer.current_party();
        if ticket.party != on_clock || ticket.pick_number != self.sequencer.picks_made() {
            debug!(
                "Discarding stale automated pick ticket {:?} (party {} on the clock, {} picks made)",
                ticket,
                on_clock,
                self.sequencer.picks_made()
            );
            return Err(DraftError::NotOnClock {
                requested: ticket.party,
                on_clock,
            });
        }

        let entity_id = match self.selector.choose(&self.pool) {
            Ok(id) => id,
            Err(DraftError::PoolExhausted) => {
                return Ok(PickOutcome {
                    pick: None,
                    events: vec![self.finish(Completion::PoolExhausted)],
                    next: NextTurn::Complete,
                });
            }
            Err(e) => return Err(e),
        };
        self.pick_as(&entity_id, ticket.party, PickSource::Automated)
    }

    fn ensure_open(&self) -> Result<(), DraftError> {
        if self.is_complete() {
            Err(DraftError::DraftComplete)
        } else {
            Ok(())
        }
    }

    /// Apply a validated pick. Infallible: all checks happen before the
    /// entity leaves the pool.
    fn commit(&mut self, entity: Entity, party: usize, source: PickSource) -> PickOutcome {
        let record = PickRecord {
            pick_number: self.sequencer.picks_made() + 1,
            round: self.sequencer.round(),
            party,
            party_name: self.parties[party].name.clone(),
            entity: entity.clone(),
            source,
            recorded_at: Utc::now(),
        };
        self.parties[party].roster.push(entity);

        info!(
            "Pick #{} (round {}): {} -> {} [{:?}]",
            record.pick_number, record.round, record.entity.name, record.party_name, source
        );

        self.picks.push(record.clone());
        let mut events = vec![DraftEvent::PickRecorded(record.clone())];

        self.sequencer.record_pick();
        if self.sequencer.is_complete() {
            events.push(self.finish(Completion::AllPicksMade));
            return PickOutcome {
                pick: Some(record),
                events,
                next: NextTurn::Complete,
            };
        }

        self.sequencer.advance();

        if self.pool.is_empty() {
            events.push(self.finish(Completion::PoolExhausted));
            return PickOutcome {
                pick: Some(record),
                events,
                next: NextTurn::Complete,
            };
        }

        events.push(self.announce_turn());
        PickOutcome {
            pick: Some(record),
            events,
            next: self.next_turn(),
        }
    }

    /// Emit the turn change for the party now on the clock, scheduling an
    /// automated pick when it is not the human.
    fn announce_turn(&mut self) -> DraftEvent {
        let party = self.sequencer.current_party();
        let round = self.sequencer.round();
        let is_human = party == self.human_party;

        if !is_human {
            self.scheduler.schedule(AutoPickTicket {
                party,
                pick_number: self.sequencer.picks_made(),
            });
        }

        DraftEvent::TurnChanged {
            party,
            round,
            is_human,
        }
    }

    fn finish(&mut self, completion: Completion) -> DraftEvent {
        self.completion = Some(completion);
        self.scheduler.cancel();

        let picks_made = self.sequencer.picks_made();
        match completion {
            Completion::AllPicksMade => info!("Draft complete after {} picks", picks_made),
            Completion::PoolExhausted => warn!(
                "Draft ended early: pool exhausted after {} of {} picks",
                picks_made,
                self.sequencer.total_picks()
            ),
        }

        DraftEvent::DraftComplete {
            picks_made,
            ended_early: completion == Completion::PoolExhausted,
        }
    }

    fn next_turn(&self) -> NextTurn {
        if self.is_complete() {
            return NextTurn::Complete;
        }
        let party = self.sequencer.current_party();
        let round = self.sequencer.round();
        if party == self.human_party {
            NextTurn::Human { party, round }
        } else {
            NextTurn::Automated { party, round }
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn is_complete(&self) -> bool {
        self.completion.is_some() || self.sequencer.is_complete()
    }

    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    pub fn current_party(&self) -> usize {
        self.sequencer.current_party()
    }

    pub fn is_human_turn(&self) -> bool {
        !self.is_complete() && self.sequencer.current_party() == self.human_party
    }

    pub fn human_party(&self) -> usize {
        self.human_party
    }

    pub fn state(&self) -> DraftState {
        self.sequencer.state()
    }

    pub fn total_picks(&self) -> usize {
        self.sequencer.total_picks()
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn parties(&self) -> &[Party] {
        &self.parties
    }

    pub fn party(&self, index: usize) -> Option<&Party> {
        self.parties.get(index)
    }

    /// Every pick so far, in order.
    pub fn picks(&self) -> &[PickRecord] {
        &self.picks
    }

    /// Size of the pool when the draft was built.
    pub fn initial_size(&self) -> usize {
        self.initial_size
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn snapshot(&self) -> DraftSnapshot {
        let on_deck = if self.is_complete() {
            Vec::new()
        } else {
            // Parties past the last entity never pick.
            let remaining = self.pool.len().saturating_sub(1);
            self.sequencer.upcoming(ON_DECK_LEN.min(remaining))
        };

        DraftSnapshot {
            state: self.sequencer.state(),
            total_picks: self.sequencer.total_picks(),
            human_party: self.human_party,
            available: self.pool.as_slice().to_vec(),
            parties: self.parties.clone(),
            picks: self.picks.clone(),
            on_deck,
            completion: self.completion,
        }
    }
}

impl DraftEngine<QueuedScheduler> {
    /// Run queued automated picks until the human is on the clock or the
    /// draft ends. Lets tests and batch simulations skip the visible delay.
    ///
    /// Stops at the first failing ticket; the error keeps the outcomes of the
    /// picks already made.
    pub fn run_pending(&mut self) -> Result<Vec<PickOutcome>, PendingRunError> {
        let mut outcomes = Vec::new();
        while let Some(ticket) = self.scheduler.take() {
            match self.run_automated(ticket) {
                Ok(outcome) => outcomes.push(outcome),
                Err(error) => {
                    return Err(PendingRunError {
                        completed: outcomes,
                        error,
                    })
                }
            }
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<SourceRecord> {
        (1..=n)
            .map(|i| SourceRecord::ranked(&format!("e{i}"), i as u32, &format!("Entity {i}")))
            .collect()
    }

    fn engine(parties: usize, rounds: u32, human: usize, pool: usize) -> DraftEngine {
        DraftEngine::new(
            &DraftSettings::new(parties, rounds, human),
            records(pool),
            QueuedScheduler::new(),
        )
        .unwrap()
    }

    fn id(s: &str) -> EntityId {
        EntityId::new(s)
    }

    fn picked(outcome: &PickOutcome) -> &PickRecord {
        outcome.pick.as_ref().expect("outcome carries a pick")
    }

    #[test]
    fn new_rejects_invalid_settings() {
        let result = DraftEngine::new(
            &DraftSettings::new(2, 2, 5),
            records(4),
            QueuedScheduler::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn start_with_human_first_schedules_nothing() {
        let mut eng = engine(3, 2, 0, 6);
        let events = eng.start();
        assert_eq!(
            events,
            vec![DraftEvent::TurnChanged {
                party: 0,
                round: 1,
                is_human: true
            }]
        );
        assert!(eng.scheduler().pending().is_none());
        assert!(eng.is_human_turn());
    }

    #[test]
    fn start_with_automated_first_schedules_pick() {
        let mut eng = engine(3, 2, 2, 6);
        eng.start();
        assert_eq!(
            eng.scheduler().pending(),
            Some(AutoPickTicket {
                party: 0,
                pick_number: 0
            })
        );
    }

    #[test]
    fn start_with_empty_pool_completes_early() {
        let mut eng = engine(2, 2, 0, 0);
        let events = eng.start();
        assert_eq!(
            events,
            vec![DraftEvent::DraftComplete {
                picks_made: 0,
                ended_early: true
            }]
        );
        assert_eq!(eng.completion(), Some(Completion::PoolExhausted));
    }

    #[test]
    fn human_pick_moves_entity_and_schedules_next() {
        let mut eng = engine(3, 2, 0, 6);
        eng.start();
        let outcome = eng.request_pick(&id("e2"), 0).unwrap();

        assert_eq!(picked(&outcome).pick_number, 1);
        assert_eq!(picked(&outcome).source, PickSource::Human);
        assert_eq!(outcome.next, NextTurn::Automated { party: 1, round: 1 });
        assert!(eng.party(0).unwrap().roster.contains(&id("e2")));
        assert!(!eng.pool().contains(&id("e2")));
        assert_eq!(
            eng.scheduler().pending(),
            Some(AutoPickTicket {
                party: 1,
                pick_number: 1
            })
        );
        assert!(matches!(outcome.events[0], DraftEvent::PickRecorded(_)));
        assert_eq!(
            outcome.events[1],
            DraftEvent::TurnChanged {
                party: 1,
                round: 1,
                is_human: false
            }
        );
    }

    #[test]
    fn run_pending_stops_at_human_turn() {
        let mut eng = engine(3, 2, 0, 6);
        eng.start();
        eng.request_pick(&id("e3"), 0).unwrap();
        let outcomes = eng.run_pending().unwrap();

        // Parties 1, 2, 2, 1 pick automatically before party 0 closes round 2.
        let pickers: Vec<usize> = outcomes.iter().map(|o| picked(o).party).collect();
        assert_eq!(pickers, vec![1, 2, 2, 1]);
        let taken: Vec<&str> = outcomes.iter().map(|o| picked(o).entity.id.as_str()).collect();
        assert_eq!(taken, vec!["e1", "e2", "e4", "e5"]);
        assert!(eng.is_human_turn());
        assert_eq!(eng.state().round, 2);
    }

    #[test]
    fn stale_ticket_is_rejected() {
        let mut eng = engine(2, 2, 0, 4);
        eng.start();
        eng.request_pick(&id("e1"), 0).unwrap();
        let ticket = eng.scheduler_mut().take().unwrap();

        // Party 1 picks explicitly before its scheduled pick fires.
        eng.request_pick(&id("e4"), 1).unwrap();
        let err = eng.run_automated(ticket).unwrap_err();
        assert!(matches!(err, DraftError::NotOnClock { .. }));
        assert_eq!(eng.state().picks_made, 2);
    }

    #[test]
    fn ticket_after_completion_is_draft_complete() {
        let mut eng = engine(1, 1, 0, 3);
        eng.start();
        eng.request_pick(&id("e1"), 0).unwrap();
        let err = eng
            .run_automated(AutoPickTicket {
                party: 0,
                pick_number: 1,
            })
            .unwrap_err();
        assert_eq!(err, DraftError::DraftComplete);
    }

    #[test]
    fn completion_cancels_pending_ticket() {
        let mut eng = engine(2, 1, 0, 4);
        eng.start();
        eng.request_pick(&id("e1"), 0).unwrap();
        assert!(eng.scheduler().pending().is_some());
        let outcomes = eng.run_pending().unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].next, NextTurn::Complete);
        assert!(eng.scheduler().pending().is_none());
        assert_eq!(eng.completion(), Some(Completion::AllPicksMade));
    }

    #[test]
    fn final_pick_does_not_advance_clock() {
        let mut eng = engine(2, 1, 0, 4);
        eng.start();
        eng.request_pick(&id("e1"), 0).unwrap();
        let outcome = eng.request_pick(&id("e2"), 1).unwrap();
        assert_eq!(
            outcome.events.last(),
            Some(&DraftEvent::DraftComplete {
                picks_made: 2,
                ended_early: false
            })
        );
        assert_eq!(eng.current_party(), 1);
        assert_eq!(eng.state().round, 1);
    }

    #[test]
    fn failing_selector_propagates_without_mutation() {
        struct Refuses;
        impl PickSelector for Refuses {
            fn choose(&self, _pool: &Pool) -> Result<EntityId, DraftError> {
                Ok(EntityId::new("not-in-pool"))
            }
        }

        let mut eng = engine(2, 1, 1, 2).with_selector(Refuses);
        eng.start();
        let ticket = eng.scheduler_mut().take().unwrap();
        let err = eng.run_automated(ticket).unwrap_err();
        assert_eq!(err, DraftError::NotFound(EntityId::new("not-in-pool")));
        assert_eq!(eng.pool().len(), 2);
        assert_eq!(eng.state().picks_made, 0);
    }

    #[test]
    fn exhausted_selector_ends_draft() {
        struct Empty;
        impl PickSelector for Empty {
            fn choose(&self, _pool: &Pool) -> Result<EntityId, DraftError> {
                Err(DraftError::PoolExhausted)
            }
        }

        let mut eng = engine(2, 1, 1, 2).with_selector(Empty);
        eng.start();
        let ticket = eng.scheduler_mut().take().unwrap();
        let outcome = eng.run_automated(ticket).unwrap();
        assert!(outcome.pick.is_none());
        assert_eq!(outcome.next, NextTurn::Complete);
        assert_eq!(
            outcome.events,
            vec![DraftEvent::DraftComplete {
                picks_made: 0,
                ended_early: true
            }]
        );
        assert_eq!(eng.completion(), Some(Completion::PoolExhausted));
        assert!(eng.is_complete());
        assert_eq!(eng.pool().len(), 2);
    }

    #[test]
    fn explicit_pick_for_automated_party_is_human_sourced() {
        let mut eng = engine(2, 2, 0, 4);
        eng.start();
        eng.request_pick(&id("e2"), 0).unwrap();

        // Party 1 is automated but chooses explicitly before its ticket runs.
        let outcome = eng.request_pick(&id("e4"), 1).unwrap();
        assert_eq!(picked(&outcome).party, 1);
        assert_eq!(picked(&outcome).source, PickSource::Human);

        // Its next turn goes through the scheduler.
        let outcomes = eng.run_pending().unwrap();
        assert_eq!(picked(&outcomes[0]).party, 1);
        assert_eq!(picked(&outcomes[0]).source, PickSource::Automated);
    }

    #[test]
    fn run_pending_keeps_outcomes_before_failure() {
        struct SecondPickFails;
        impl PickSelector for SecondPickFails {
            fn choose(&self, pool: &Pool) -> Result<EntityId, DraftError> {
                if pool.len() == 4 {
                    Ok(EntityId::new("e1"))
                } else {
                    Ok(EntityId::new("missing"))
                }
            }
        }

        // Party 0 is human, so party 1 picks twice in a row at the turn.
        let mut eng = engine(2, 2, 0, 5).with_selector(SecondPickFails);
        eng.start();
        eng.request_pick(&id("e5"), 0).unwrap();

        let err = eng.run_pending().unwrap_err();
        assert_eq!(err.error, DraftError::NotFound(id("missing")));
        assert_eq!(err.completed.len(), 1);
        assert_eq!(picked(&err.completed[0]).entity.id, id("e1"));
        assert!(matches!(err.completed[0].events[0], DraftEvent::PickRecorded(_)));
        assert_eq!(eng.state().picks_made, 2);
    }

    #[test]
    fn on_deck_stops_at_remaining_entities() {
        // Five picks called for, three entities.
        let mut eng = engine(5, 1, 0, 3);
        eng.start();
        assert_eq!(eng.snapshot().on_deck, vec![1, 2]);

        eng.request_pick(&id("e1"), 0).unwrap();
        assert_eq!(eng.snapshot().on_deck, vec![2]);

        eng.run_pending().unwrap();
        assert!(eng.snapshot().on_deck.is_empty());
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut eng = engine(3, 2, 0, 6);
        eng.start();
        eng.request_pick(&id("e1"), 0).unwrap();
        let snap = eng.snapshot();
        assert_eq!(snap.available.len(), 5);
        assert_eq!(snap.picks.len(), 1);
        assert_eq!(snap.state.party_index, 1);
        assert_eq!(snap.on_deck, vec![2, 2, 1, 0]);
        assert!(!snap.is_human_turn());
        assert!(!snap.is_complete());
    }
}
