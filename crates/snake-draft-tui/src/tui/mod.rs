// TUI draft board: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the engine's snapshot. The app
// orchestrator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use snake_draft_core::draft::engine::{Completion, DraftSnapshot};
use snake_draft_core::draft::entity::Entity;
use snake_draft_core::draft::events::PickRecord;
use snake_draft_core::draft::roster::Party;

use crate::protocol::{UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the draft for rendering.
#[derive(Debug, Default)]
pub struct ViewState {
    /// Undrafted entities, best rank first.
    pub available: Vec<Entity>,
    pub parties: Vec<Party>,
    /// Every pick so far, oldest first.
    pub picks: Vec<PickRecord>,
    /// Parties picking after the one on the clock.
    pub on_deck: Vec<usize>,
    pub round: u32,
    pub on_clock: usize,
    pub human_party: usize,
    pub is_human_turn: bool,
    pub picks_made: usize,
    pub total_picks: usize,
    pub completion: Option<Completion>,
    /// Latest pick, shown in the status bar.
    pub last_pick: Option<String>,
    /// Latest message from the app (e.g. a rejected pick).
    pub notice: Option<String>,
    /// Highlighted row in the filtered available list.
    pub cursor: usize,
    pub filter_text: String,
    pub filter_mode: bool,
    pub confirm_quit: bool,
}

impl ViewState {
    /// Replace the mirrored draft state with a fresh snapshot.
    ///
    /// Local UI state (cursor, filter, notice) survives; the cursor is
    /// clamped to the new list length.
    pub fn apply_snapshot(&mut self, snapshot: DraftSnapshot) {
        self.is_human_turn = snapshot.is_human_turn();
        self.round = snapshot.state.round;
        self.on_clock = snapshot.state.party_index;
        self.picks_made = snapshot.state.picks_made;
        self.total_picks = snapshot.total_picks;
        self.human_party = snapshot.human_party;
        self.completion = snapshot.completion;
        self.available = snapshot.available;
        self.parties = snapshot.parties;
        self.picks = snapshot.picks;
        self.on_deck = snapshot.on_deck;
        self.clamp_cursor();
    }

    /// Available entities that pass the current filter.
    pub fn visible_available(&self) -> Vec<&Entity> {
        self.available
            .iter()
            .filter(|e| e.matches(&self.filter_text))
            .collect()
    }

    /// The entity under the cursor, if any.
    pub fn selected(&self) -> Option<&Entity> {
        self.visible_available().get(self.cursor).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.completion.is_some()
    }

    pub fn party_name(&self, index: usize) -> &str {
        self.parties
            .get(index)
            .map(|p| p.name.as_str())
            .unwrap_or("?")
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.visible_available().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::PickRecorded(record) => {
            state.last_pick = Some(format!(
                "#{} {} took {}",
                record.pick_number, record.party_name, record.entity.name
            ));
            // A successful pick supersedes any earlier rejection.
            state.notice = None;
        }
        UiUpdate::TurnChanged {
            party,
            round,
            is_human,
        } => {
            state.on_clock = party;
            state.round = round;
            state.is_human_turn = is_human;
        }
        UiUpdate::DraftComplete {
            picks_made,
            ended_early,
        } => {
            state.picks_made = picks_made;
            state.is_human_turn = false;
            state.completion = Some(if ended_early {
                Completion::PoolExhausted
            } else {
                Completion::AllPicksMade
            });
        }
        UiUpdate::Notice(text) => {
            state.notice = Some(text);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete draft board.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::available::render(frame, layout.available, state);
    widgets::teams::render(frame, layout.teams, state);
    widgets::draft_log::render(frame, layout.draft_log, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// Initializes the terminal, restores it on panic, and runs an async select
/// loop over UI updates, keyboard input and render ticks until the user quits
/// or the app closes the update channel.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App is shutting down.
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(e.into()),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(e.into());
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use snake_draft_core::config::DraftSettings;
    use snake_draft_core::draft::engine::DraftEngine;
    use snake_draft_core::draft::entity::EntityId;
    use snake_draft_core::scheduler::QueuedScheduler;
    use snake_draft_core::source::SourceRecord;

    pub(crate) fn sample_snapshot() -> DraftSnapshot {
        let records = vec![
            SourceRecord::ranked("A", 1, "Alpha"),
            SourceRecord::ranked("B", 2, "Bravo"),
            SourceRecord::ranked("C", 3, "Charlie"),
            SourceRecord::ranked("D", 4, "Delta"),
        ];
        let mut engine = DraftEngine::new(
            &DraftSettings::new(2, 2, 0),
            records,
            QueuedScheduler::new(),
        )
        .unwrap();
        engine.start();
        engine.request_pick(&EntityId::new("B"), 0).unwrap();
        engine.snapshot()
    }

    #[test]
    fn view_state_default_is_empty() {
        let state = ViewState::default();
        assert!(state.available.is_empty());
        assert!(state.picks.is_empty());
        assert_eq!(state.cursor, 0);
        assert!(!state.filter_mode);
        assert!(!state.confirm_quit);
        assert!(!state.is_complete());
        assert!(state.selected().is_none());
    }

    #[test]
    fn apply_snapshot_mirrors_draft() {
        let mut state = ViewState::default();
        state.apply_snapshot(sample_snapshot());
        assert_eq!(state.available.len(), 3);
        assert_eq!(state.picks.len(), 1);
        assert_eq!(state.on_clock, 1);
        assert_eq!(state.round, 1);
        assert_eq!(state.total_picks, 4);
        assert!(!state.is_human_turn);
        assert_eq!(state.party_name(0), "You");
    }

    #[test]
    fn apply_snapshot_clamps_cursor() {
        let mut state = ViewState::default();
        state.cursor = 10;
        state.apply_snapshot(sample_snapshot());
        assert_eq!(state.cursor, 2);
    }

    #[test]
    fn filter_narrows_visible_list() {
        let mut state = ViewState::default();
        state.apply_snapshot(sample_snapshot());
        state.filter_text = "char".into();
        let visible: Vec<&str> = state.visible_available().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(visible, vec!["C"]);
        assert_eq!(state.selected().unwrap().name, "Charlie");
    }

    #[test]
    fn pick_recorded_sets_ticker_and_clears_notice() {
        let mut state = ViewState::default();
        state.notice = Some("old".into());
        let record = sample_snapshot().picks[0].clone();
        apply_ui_update(&mut state, UiUpdate::PickRecorded(record));
        assert_eq!(state.last_pick.as_deref(), Some("#1 You took Bravo"));
        assert!(state.notice.is_none());
    }

    #[test]
    fn turn_changed_moves_clock() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::TurnChanged {
                party: 4,
                round: 3,
                is_human: true,
            },
        );
        assert_eq!(state.on_clock, 4);
        assert_eq!(state.round, 3);
        assert!(state.is_human_turn);
    }

    #[test]
    fn draft_complete_records_reason() {
        let mut state = ViewState::default();
        state.is_human_turn = true;
        apply_ui_update(
            &mut state,
            UiUpdate::DraftComplete {
                picks_made: 9,
                ended_early: true,
            },
        );
        assert_eq!(state.completion, Some(Completion::PoolExhausted));
        assert_eq!(state.picks_made, 9);
        assert!(!state.is_human_turn);
    }

    #[test]
    fn notice_is_stored() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Notice("nope".into()));
        assert_eq!(state.notice.as_deref(), Some("nope"));
    }

    #[test]
    fn render_frame_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(120, 40);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();

        state.apply_snapshot(sample_snapshot());
        state.confirm_quit = true;
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
    }
}
