//! SessionLoop: one connection lifetime.
//!
//! Dials the device once, then receives events one at a time, maps each
//! through the [`ActionMapper`] and hands the resulting actions to the
//! injector in order.  The session never retries; the supervisor decides
//! what happens after it returns.
//!
//! # Connection release
//!
//! The connection is wrapped in a [`ConnectionGuard`] as soon as the dial
//! succeeds.  The guard closes it on drop, so every exit path (end of stream,
//! timeout, cancellation, or the session future itself being dropped)
//! releases the connection exactly once.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use m4p_core::protocol::datagram::DatagramError;
use m4p_core::{ActionMapper, InboundEvent};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::application::inject_actions::InjectActionsUseCase;

// ── Errors ────────────────────────────────────────────────────────────────────

/// The device could not be reached.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to resolve {endpoint}: {source}")]
    Resolve {
        endpoint: DeviceEndpoint,
        #[source]
        source: std::io::Error,
    },
    #[error("{endpoint} did not resolve to any address")]
    NoAddress { endpoint: DeviceEndpoint },
    #[error("socket error talking to {endpoint}: {source}")]
    Socket {
        endpoint: DeviceEndpoint,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode subscription: {0}")]
    Subscribe(#[from] DatagramError),
}

/// Why a receive did not yield an event.
#[derive(Debug, Error)]
pub enum ReceiveError {
    /// The connection is gone; the session ends.
    #[error("connection closed: {reason}")]
    Closed { reason: String },
    /// Nothing arrived in time; the session ends.
    #[error("no datagram received within {after:?}")]
    Timeout { after: Duration },
    /// One frame could not be parsed; the session skips it.
    #[error("undecodable frame: {0}")]
    Decode(#[from] DatagramError),
    /// The shared token fired.
    #[error("receive cancelled")]
    Cancelled,
}

// ── Transport seam ────────────────────────────────────────────────────────────

/// Where the device listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEndpoint {
    pub host: String,
    pub port: u16,
}

impl DeviceEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for DeviceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Opens connections to a device.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Establishes one connection.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the device cannot be reached.
    async fn dial(&self, endpoint: &DeviceEndpoint) -> Result<Box<dyn Connection>, ConnectionError>;
}

/// An open connection yielding inbound events.
#[async_trait]
pub trait Connection: Send {
    /// Waits for the next event.
    ///
    /// Must return [`ReceiveError::Cancelled`] promptly once `cancel` fires.
    async fn receive(&mut self, cancel: &CancellationToken) -> Result<InboundEvent, ReceiveError>;

    /// Releases the connection.  Idempotent.
    fn close(&mut self);
}

/// Owns a connection and closes it when dropped.
pub struct ConnectionGuard {
    connection: Box<dyn Connection>,
}

impl ConnectionGuard {
    pub fn new(connection: Box<dyn Connection>) -> Self {
        Self { connection }
    }

    pub async fn receive(&mut self, cancel: &CancellationToken) -> Result<InboundEvent, ReceiveError> {
        self.connection.receive(cancel).await
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.connection.close();
    }
}

// ── Session loop ──────────────────────────────────────────────────────────────

/// How a session ended.
#[derive(Debug)]
pub enum SessionOutcome {
    /// The dial failed; nothing was received.
    ConnectFailed(ConnectionError),
    /// The connection was closed or timed out after it was established.
    Ended(ReceiveError),
    /// The cancellation token fired.
    Cancelled,
}

impl SessionOutcome {
    /// `true` unless the session was cancelled.
    pub fn should_retry(&self) -> bool {
        !matches!(self, SessionOutcome::Cancelled)
    }
}

/// Drives one connection from dial to release.
pub struct SessionLoop {
    transport: Arc<dyn Transport>,
    mapper: ActionMapper,
    inject: InjectActionsUseCase,
}

impl SessionLoop {
    pub fn new(
        transport: Arc<dyn Transport>,
        mapper: ActionMapper,
        inject: InjectActionsUseCase,
    ) -> Self {
        Self {
            transport,
            mapper,
            inject,
        }
    }

    /// Runs one session against `endpoint`.
    pub async fn run(&self, endpoint: &DeviceEndpoint, cancel: &CancellationToken) -> SessionOutcome {
        self.run_observed(endpoint, cancel, || {}).await
    }

    /// Like [`run`](Self::run), calling `on_connected` once the dial succeeds.
    pub async fn run_observed<F>(
        &self,
        endpoint: &DeviceEndpoint,
        cancel: &CancellationToken,
        on_connected: F,
    ) -> SessionOutcome
    where
        F: FnOnce() + Send,
    {
        let connection = tokio::select! {
            biased;
            _ = cancel.cancelled() => return SessionOutcome::Cancelled,
            dialed = self.transport.dial(endpoint) => match dialed {
                Ok(connection) => connection,
                Err(e) => return SessionOutcome::ConnectFailed(e),
            },
        };

        let mut guard = ConnectionGuard::new(connection);
        info!("session established with {endpoint}");
        on_connected();

        loop {
            let received = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(ReceiveError::Cancelled),
                r = guard.receive(cancel) => r,
            };

            match received {
                Ok(event) => self.dispatch(&event),
                Err(ReceiveError::Decode(e)) => warn!("skipping frame: {e}"),
                Err(ReceiveError::Cancelled) => {
                    debug!("session with {endpoint} cancelled");
                    return SessionOutcome::Cancelled;
                }
                Err(e) => return SessionOutcome::Ended(e),
            }
        }
    }

    /// Maps one event and injects its actions in order.
    fn dispatch(&self, event: &InboundEvent) {
        let translation = self.mapper.translate(event);

        if let Some(incomplete) = &translation.incomplete {
            debug!("{incomplete}");
        }
        if translation.actions.is_empty() {
            trace!("no action for {}", event.kind_name());
        }

        for action in &translation.actions {
            if let Err(e) = self.inject.handle(action) {
                warn!("injection failed for {action:?}: {e}");
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
