// Messages exchanged between the app orchestrator and the TUI.

use snake_draft_core::draft::engine::DraftSnapshot;
use snake_draft_core::draft::entity::EntityId;
use snake_draft_core::draft::events::{DraftEvent, PickRecord};

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Draft this entity for the human party.
    Pick(EntityId),
    Quit,
}

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Full draft state; sent after every change.
    Snapshot(Box<DraftSnapshot>),
    PickRecorded(PickRecord),
    TurnChanged {
        party: usize,
        round: u32,
        is_human: bool,
    },
    DraftComplete {
        picks_made: usize,
        ended_early: bool,
    },
    /// One-line message for the user, e.g. a rejected pick.
    Notice(String),
}

impl From<DraftEvent> for UiUpdate {
    fn from(event: DraftEvent) -> Self {
        match event {
            DraftEvent::PickRecorded(record) => UiUpdate::PickRecorded(record),
            DraftEvent::TurnChanged {
                party,
                round,
                is_human,
            } => UiUpdate::TurnChanged {
                party,
                round,
                is_human,
            },
            DraftEvent::DraftComplete {
                picks_made,
                ended_early,
            } => UiUpdate::DraftComplete {
                picks_made,
                ended_early,
            },
        }
    }
}
