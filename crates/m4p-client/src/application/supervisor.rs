//! Supervisor: keeps a session running until shutdown.
//!
//! ```text
//!   Idle ──► Connecting ──► Active ──┐
//!    ▲            │                  │
//!    └────────────┴──── retry delay ◄┘
//!
//!   any state ──(token fires)──► Cancelled
//! ```
//!
//! The delay between attempts is fixed.  There is no backoff and no attempt
//! limit: the supervisor only stops when the cancellation token fires, which
//! it observes both while a session is running and while it is waiting.

use std::fmt;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::application::session::{DeviceEndpoint, SessionLoop, SessionOutcome};

/// Default pause between session attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Lifecycle state published by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// Waiting before the next attempt (also the initial state).
    Idle,
    /// Dialling the device.
    Connecting,
    /// A session is receiving events.
    Active,
    /// Shut down; terminal.
    Cancelled,
}

impl fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SupervisorState::Idle => "idle",
            SupervisorState::Connecting => "connecting",
            SupervisorState::Active => "active",
            SupervisorState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Runs sessions back to back.
pub struct Supervisor {
    session: SessionLoop,
    endpoint: DeviceEndpoint,
    retry_delay: Duration,
    state: watch::Sender<SupervisorState>,
}

impl Supervisor {
    pub fn new(session: SessionLoop, endpoint: DeviceEndpoint, retry_delay: Duration) -> Self {
        let (state, _) = watch::channel(SupervisorState::Idle);
        Self {
            session,
            endpoint,
            retry_delay,
            state,
        }
    }

    /// Observes state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SupervisorState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SupervisorState {
        *self.state.borrow()
    }

    /// Runs until `cancel` fires and returns the number of sessions attempted.
    pub async fn run(&self, cancel: CancellationToken) -> u64 {
        let mut attempts = 0u64;

        while !cancel.is_cancelled() {
            self.publish(SupervisorState::Connecting);
            attempts += 1;

            let outcome = self
                .session
                .run_observed(&self.endpoint, &cancel, || {
                    self.publish(SupervisorState::Active)
                })
                .await;

            match outcome {
                SessionOutcome::Cancelled => break,
                SessionOutcome::ConnectFailed(e) => {
                    warn!("could not connect to {}: {e}", self.endpoint)
                }
                SessionOutcome::Ended(e) => info!("session with {} ended: {e}", self.endpoint),
            }

            self.publish(SupervisorState::Idle);
            info!("retrying in {:?}", self.retry_delay);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = time::sleep(self.retry_delay) => {}
            }
        }

        self.publish(SupervisorState::Cancelled);
        attempts
    }

    fn publish(&self, next: SupervisorState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            info!("supervisor {previous} -> {next}");
        }
    }
}
