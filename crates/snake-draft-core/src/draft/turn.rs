// Snake-order turn sequencing.
//
// Round 1 runs parties 0..N-1, round 2 runs N-1..0, and so on. The sequencer
// only moves when told a pick happened; the pick cap is checked by the engine
// before it asks for the next turn, so the sequencer never starts a phantom
// round after the final pick.

use serde::{Deserialize, Serialize};

/// Direction of travel through the party list within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

/// Where the draft stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftState {
    /// 1-based round number.
    pub round: u32,
    /// Party on the clock.
    pub party_index: usize,
    pub direction: Direction,
    pub picks_made: usize,
}

impl DraftState {
    fn initial() -> Self {
        DraftState {
            round: 1,
            party_index: 0,
            direction: Direction::Forward,
            picks_made: 0,
        }
    }
}

/// Turn-order state machine for a snake draft of `parties` x `rounds` picks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSequencer {
    parties: usize,
    rounds: u32,
    state: DraftState,
}

impl TurnSequencer {
    pub fn new(parties: usize, rounds: u32) -> Self {
        TurnSequencer {
            parties,
            rounds,
            state: DraftState::initial(),
        }
    }

    pub fn current_party(&self) -> usize {
        self.state.party_index
    }

    pub fn round(&self) -> u32 {
        self.state.round
    }

    pub fn picks_made(&self) -> usize {
        self.state.picks_made
    }

    pub fn parties(&self) -> usize {
        self.parties
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// The hard cap on picks: `parties * rounds`.
    pub fn total_picks(&self) -> usize {
        self.parties * self.rounds as usize
    }

    pub fn is_complete(&self) -> bool {
        self.state.picks_made >= self.total_picks()
    }

    pub fn state(&self) -> DraftState {
        self.state
    }

    /// Count one successful pick.
    pub fn record_pick(&mut self) {
        self.state.picks_made += 1;
    }

    /// Move the clock to the next party, bouncing at either end of the list.
    ///
    /// Callers must not advance once `is_complete()` holds.
    pub fn advance(&mut self) {
        debug_assert!(self.parties > 0, "advance on a draft with no parties");
        let last = self.parties.saturating_sub(1) as isize;
        let next = self.state.party_index as isize + self.state.direction.step();

        if next > last {
            self.state.party_index = last as usize;
            self.state.direction = Direction::Reverse;
            self.state.round += 1;
        } else if next < 0 {
            self.state.party_index = 0;
            self.state.direction = Direction::Forward;
            self.state.round += 1;
        } else {
            self.state.party_index = next as usize;
        }
    }

    /// The next `n` parties to pick after the current one, capped at the
    /// picks actually remaining. Does not touch `self`.
    pub fn upcoming(&self, n: usize) -> Vec<usize> {
        let remaining = self
            .total_picks()
            .saturating_sub(self.state.picks_made + 1);
        let mut ahead = self.clone();
        (0..n.min(remaining))
            .map(|_| {
                ahead.advance();
                ahead.current_party()
            })
            .collect()
    }
}

/// Round (1-based) and party for the zero-based overall pick index.
pub fn snake_position(pick_index: usize, parties: usize) -> (u32, usize) {
    let round = pick_index / parties;
    let offset = pick_index % parties;
    let party = if round % 2 == 0 {
        offset
    } else {
        parties - 1 - offset
    };
    (round as u32 + 1, party)
}
