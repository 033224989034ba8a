// Application orchestrator: owns the draft engine and routes messages.
//
// The app loop receives user commands from the TUI and automated-pick tickets
// from the scheduler, applies them to the engine, and pushes the resulting
// events followed by a fresh snapshot back to the TUI.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use snake_draft_core::config::{Config, ConfigError};
use snake_draft_core::draft::engine::{DraftEngine, PickOutcome};
use snake_draft_core::draft::entity::EntityId;
use snake_draft_core::draft::DraftError;
use snake_draft_core::scheduler::{AutoPickTicket, TokioScheduler};
use snake_draft_core::source::SourceRecord;

use crate::protocol::{UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Everything the app loop owns.
pub struct AppState {
    pub config: Config,
    pub engine: DraftEngine<TokioScheduler>,
}

impl AppState {
    /// Build the engine from config and the loaded ranked list. Automated
    /// picks are delivered on `auto_tx` after `config.auto_pick_delay`.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(
        config: Config,
        records: Vec<SourceRecord>,
        auto_tx: mpsc::Sender<AutoPickTicket>,
    ) -> Result<Self, ConfigError> {
        let scheduler = TokioScheduler::new(auto_tx, config.auto_pick_delay);
        let engine = DraftEngine::new(&config.draft, records, scheduler)?;
        Ok(AppState { config, engine })
    }

    /// Put the first party on the clock.
    pub fn start(&mut self) -> Vec<UiUpdate> {
        let mut updates: Vec<UiUpdate> = self
            .engine
            .start()
            .into_iter()
            .map(UiUpdate::from)
            .collect();
        updates.push(self.snapshot_update());
        updates
    }

    /// Handle a pick made from the TUI on behalf of the human party.
    pub fn pick(&mut self, entity_id: &EntityId) -> Vec<UiUpdate> {
        let party = self.engine.human_party();
        match self.engine.request_pick(entity_id, party) {
            Ok(outcome) => self.outcome_updates(outcome),
            Err(e) => {
                warn!("Pick of '{}' rejected: {}", entity_id, e);
                vec![UiUpdate::Notice(e.to_string())]
            }
        }
    }

    /// Handle a ticket delivered by the scheduler.
    pub fn auto_pick(&mut self, ticket: AutoPickTicket) -> Vec<UiUpdate> {
        match self.engine.run_automated(ticket) {
            Ok(outcome) => self.outcome_updates(outcome),
            Err(DraftError::NotOnClock { .. }) | Err(DraftError::DraftComplete) => {
                debug!("Ignoring stale automated pick {:?}", ticket);
                Vec::new()
            }
            Err(e) => {
                warn!("Automated pick for party {} failed: {}", ticket.party, e);
                vec![UiUpdate::Notice(e.to_string()), self.snapshot_update()]
            }
        }
    }

    fn outcome_updates(&self, outcome: PickOutcome) -> Vec<UiUpdate> {
        let mut updates: Vec<UiUpdate> = outcome.events.into_iter().map(UiUpdate::from).collect();
        updates.push(self.snapshot_update());
        updates
    }

    fn snapshot_update(&self) -> UiUpdate {
        UiUpdate::Snapshot(Box::new(self.engine.snapshot()))
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Starts the draft, then listens on two channels using `tokio::select!`:
/// 1. User commands from the TUI
/// 2. Automated-pick tickets from the scheduler
///
/// The loop keeps running after the draft completes so the final board stays
/// on screen; it exits on `Quit` or when either end of the UI goes away.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut auto_rx: mpsc::Receiver<AutoPickTicket>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    if !send_all(&ui_tx, state.start()).await {
        info!("UI channel closed before the draft started");
        return Ok(());
    }

    // The scheduler holds a sender, so this only closes if the engine is
    // dropped; stop polling it then so select! never spins.
    let mut auto_open = true;

    loop {
        let updates = tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Pick(entity_id)) => state.pick(&entity_id),
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            ticket = auto_rx.recv(), if auto_open => {
                match ticket {
                    Some(ticket) => state.auto_pick(ticket),
                    None => {
                        auto_open = false;
                        Vec::new()
                    }
                }
            }
        };

        if !send_all(&ui_tx, updates).await {
            info!("UI channel closed, shutting down");
            break;
        }
    }

    Ok(())
}

/// Forward updates in order. Returns false once the TUI has hung up.
async fn send_all(ui_tx: &mpsc::Sender<UiUpdate>, updates: Vec<UiUpdate>) -> bool {
    for update in updates {
        if ui_tx.send(update).await.is_err() {
            return false;
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
