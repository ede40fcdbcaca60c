//! Scripted transport shared by the integration tests.
//!
//! Each dial consumes the next [`Plan`]; once the plans run out every dial
//! yields a connection that blocks until cancelled.  The transport records
//! when each dial happened and how many times connections were closed.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use m4p_client::application::session::{
    Connection, ConnectionError, DeviceEndpoint, ReceiveError, Transport,
};
use m4p_core::InboundEvent;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// What the next dial produces.
pub enum Plan {
    /// The dial fails.
    Refuse,
    /// Yields the scripted results, then `Closed`.
    Replay(Vec<Result<InboundEvent, ReceiveError>>),
    /// Yields the scripted results, then `Timeout`.
    ReplayThenTimeout(Vec<Result<InboundEvent, ReceiveError>>),
    /// Blocks in `receive` until cancelled.
    Hang,
}

pub struct FakeTransport {
    plans: Mutex<VecDeque<Plan>>,
    dial_times: Mutex<Vec<Instant>>,
    dials: watch::Sender<usize>,
    closes: Arc<AtomicUsize>,
}

impl FakeTransport {
    pub fn new(plans: Vec<Plan>) -> Arc<Self> {
        let (dials, _) = watch::channel(0);
        Arc::new(Self {
            plans: Mutex::new(plans.into()),
            dial_times: Mutex::new(Vec::new()),
            dials,
            closes: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn dial_times(&self) -> Vec<Instant> {
        self.dial_times.lock().unwrap().clone()
    }

    /// Waits until at least `n` dials have happened.
    pub async fn wait_for_dials(&self, n: usize) {
        let mut rx = self.dials.subscribe();
        rx.wait_for(|count| *count >= n).await.unwrap();
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn dial(&self, endpoint: &DeviceEndpoint) -> Result<Box<dyn Connection>, ConnectionError> {
        self.dial_times.lock().unwrap().push(Instant::now());
        self.dials.send_modify(|count| *count += 1);

        let plan = self.plans.lock().unwrap().pop_front().unwrap_or(Plan::Hang);
        let (script, end) = match plan {
            Plan::Refuse => {
                return Err(ConnectionError::NoAddress {
                    endpoint: endpoint.clone(),
                })
            }
            Plan::Replay(script) => (script, End::Closed),
            Plan::ReplayThenTimeout(script) => (script, End::Timeout),
            Plan::Hang => (Vec::new(), End::Hang),
        };

        Ok(Box::new(FakeConnection {
            script: script.into(),
            end,
            closes: Arc::clone(&self.closes),
        }))
    }
}

#[derive(Clone, Copy)]
enum End {
    Closed,
    Timeout,
    Hang,
}

struct FakeConnection {
    script: VecDeque<Result<InboundEvent, ReceiveError>>,
    end: End,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl Connection for FakeConnection {
    async fn receive(&mut self, cancel: &CancellationToken) -> Result<InboundEvent, ReceiveError> {
        if let Some(next) = self.script.pop_front() {
            return next;
        }
        match self.end {
            End::Closed => Err(ReceiveError::Closed {
                reason: "peer went away".into(),
            }),
            End::Timeout => Err(ReceiveError::Timeout {
                after: std::time::Duration::from_secs(6),
            }),
            End::Hang => {
                cancel.cancelled().await;
                Err(ReceiveError::Cancelled)
            }
        }
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn endpoint() -> DeviceEndpoint {
    DeviceEndpoint::new("192.168.1.75", 42831)
}
