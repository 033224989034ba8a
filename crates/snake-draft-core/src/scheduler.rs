// Deferred execution of automated picks.
//
// The engine never runs an automated pick inline. It hands a ticket to a
// scheduler and returns; whoever owns the engine later feeds the ticket back
// through `DraftEngine::run_automated`. Tickets are re-validated at that point,
// so a ticket that outlived its turn is simply rejected.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// A request to make one automated pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoPickTicket {
    /// The party expected to be on the clock.
    pub party: usize,
    /// Picks already made when the ticket was issued.
    pub pick_number: usize,
}

/// Receives automated-pick tickets from the engine.
pub trait PickScheduler {
    /// Queue a ticket, replacing any ticket still pending.
    fn schedule(&mut self, ticket: AutoPickTicket);

    /// Drop the pending ticket, if any.
    fn cancel(&mut self);
}

// ---------------------------------------------------------------------------
// QueuedScheduler
// ---------------------------------------------------------------------------

/// Holds at most one pending ticket for the caller to drain. No timers.
#[derive(Debug, Default)]
pub struct QueuedScheduler {
    pending: Option<AutoPickTicket>,
}

impl QueuedScheduler {
    pub fn new() -> Self {
        QueuedScheduler::default()
    }

    pub fn pending(&self) -> Option<AutoPickTicket> {
        self.pending
    }

    pub fn take(&mut self) -> Option<AutoPickTicket> {
        self.pending.take()
    }
}

impl PickScheduler for QueuedScheduler {
    fn schedule(&mut self, ticket: AutoPickTicket) {
        self.pending = Some(ticket);
    }

    fn cancel(&mut self) {
        self.pending = None;
    }
}

// ---------------------------------------------------------------------------
// TokioScheduler
// ---------------------------------------------------------------------------

/// Delivers each ticket over an mpsc channel after a fixed visible delay.
///
/// Must be used from inside a tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    tx: mpsc::Sender<AutoPickTicket>,
    delay: Duration,
    task: Option<JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(tx: mpsc::Sender<AutoPickTicket>, delay: Duration) -> Self {
        TokioScheduler {
            tx,
            delay,
            task: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a delivery task is still in flight.
    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl PickScheduler for TokioScheduler {
    fn schedule(&mut self, ticket: AutoPickTicket) {
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.delay;
        debug!(
            "Scheduling automated pick for party {} in {:?}",
            ticket.party, delay
        );
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver is gone once the app loop exits; nothing to do then.
            let _ = tx.send(ticket).await;
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
