//! Optional UDP listener that puts the machine to sleep on request.
//!
//! The TV app can send the literal datagram `sleep` when the TV turns off.
//! Anything else is logged and ignored.  The listener is independent of the
//! input session and stops when the shared cancellation token fires.

use std::net::SocketAddr;
use std::process::Command;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Datagram content that triggers a suspend.
pub const SLEEP_COMMAND: &[u8] = b"sleep";

/// Error type for the sleep listener.
#[derive(Debug, Error)]
pub enum SleepListenerError {
    #[error("failed to bind sleep listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to run suspend command: {0}")]
    Suspend(#[source] std::io::Error),
    #[error("suspend command exited with {0}")]
    SuspendStatus(std::process::ExitStatus),
}

/// Puts the machine to sleep.
pub trait Suspender: Send + Sync {
    fn suspend(&self) -> Result<(), SleepListenerError>;
}

/// Runs the platform's suspend command.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSuspender;

impl SystemSuspender {
    fn command() -> Command {
        #[cfg(target_os = "windows")]
        {
            let mut cmd = Command::new("rundll32.exe");
            cmd.args(["powrprof.dll,SetSuspendState", "0,1,0"]);
            cmd
        }

        #[cfg(target_os = "macos")]
        {
            let mut cmd = Command::new("pmset");
            cmd.arg("sleepnow");
            cmd
        }

        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            let mut cmd = Command::new("systemctl");
            cmd.arg("suspend");
            cmd
        }
    }
}

impl Suspender for SystemSuspender {
    fn suspend(&self) -> Result<(), SleepListenerError> {
        let status = Self::command()
            .status()
            .map_err(SleepListenerError::Suspend)?;
        if status.success() {
            Ok(())
        } else {
            Err(SleepListenerError::SuspendStatus(status))
        }
    }
}

/// Listens for sleep requests.
pub struct SleepListener {
    socket: UdpSocket,
    suspender: Arc<dyn Suspender>,
}

impl SleepListener {
    /// Binds the listener socket.
    ///
    /// # Errors
    ///
    /// Returns [`SleepListenerError::Bind`] if the address is unavailable.
    pub async fn bind(
        addr: SocketAddr,
        suspender: Arc<dyn Suspender>,
    ) -> Result<Self, SleepListenerError> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| SleepListenerError::Bind { addr, source })?;
        Ok(Self { socket, suspender })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Serves requests until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        info!(
            "sleep listener on {}",
            self.local_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|_| "unknown address".into())
        );
        let mut buf = [0u8; 512];

        loop {
            let received = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                r = self.socket.recv_from(&mut buf) => r,
            };

            match received {
                Ok((len, from)) if is_sleep_request(&buf[..len]) => {
                    info!("sleep requested by {from}");
                    let suspender = Arc::clone(&self.suspender);
                    match tokio::task::spawn_blocking(move || suspender.suspend()).await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => warn!("{e}"),
                        Err(e) => warn!("suspend task failed: {e}"),
                    }
                }
                Ok((len, from)) => debug!("ignoring {len}-byte datagram from {from}"),
                Err(e) => warn!("sleep listener receive error: {e}"),
            }
        }

        debug!("sleep listener stopped");
    }
}

/// `true` if the datagram is exactly the sleep command.
fn is_sleep_request(datagram: &[u8]) -> bool {
    datagram == SLEEP_COMMAND
}
