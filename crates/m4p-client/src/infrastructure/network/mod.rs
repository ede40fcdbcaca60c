//! UDP datagram transport for the TV companion app.
//!
//! Architecture:
//! - [`UdpTransport::dial`] resolves the device, connects an ephemeral UDP
//!   socket to it and sends the sensor subscription.
//! - [`UdpConnection::receive`] waits for the next datagram while sending a
//!   keepalive every interval.  Device keepalives are consumed here and only
//!   extend the receive deadline.
//! - Closing drops the socket; later receives report `Closed`.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use m4p_core::protocol::datagram::{
    decode_datagram, encode_keepalive, encode_subscribe, Datagram, MAX_DATAGRAM_LEN,
};
use m4p_core::InboundEvent;
use tokio::net::{lookup_host, UdpSocket};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::application::session::{
    Connection, ConnectionError, DeviceEndpoint, ReceiveError, Transport,
};

/// Timing parameters for UDP sessions.
#[derive(Debug, Clone)]
pub struct UdpTransportConfig {
    /// How often the client pings the device while waiting.
    pub keepalive_interval: Duration,
    /// Silence after which a receive reports `Timeout`.
    pub receive_timeout: Duration,
    /// Telemetry rate requested in the subscription.
    pub update_frequency_hz: u32,
}

impl Default for UdpTransportConfig {
    fn default() -> Self {
        Self {
            keepalive_interval: Duration::from_secs(2),
            receive_timeout: Duration::from_secs(6),
            update_frequency_hz: 65,
        }
    }
}

/// Dials devices over UDP.
#[derive(Debug, Clone, Default)]
pub struct UdpTransport {
    config: UdpTransportConfig,
}

impl UdpTransport {
    pub fn new(config: UdpTransportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn dial(&self, endpoint: &DeviceEndpoint) -> Result<Box<dyn Connection>, ConnectionError> {
        let peer = lookup_host((endpoint.host.as_str(), endpoint.port))
            .await
            .map_err(|source| ConnectionError::Resolve {
                endpoint: endpoint.clone(),
                source,
            })?
            .next()
            .ok_or_else(|| ConnectionError::NoAddress {
                endpoint: endpoint.clone(),
            })?;

        let socket_err = |source| ConnectionError::Socket {
            endpoint: endpoint.clone(),
            source,
        };
        let socket = UdpSocket::bind(unspecified_for(peer)).await.map_err(socket_err)?;
        socket.connect(peer).await.map_err(socket_err)?;

        let subscribe = encode_subscribe(self.config.update_frequency_hz)?;
        socket.send(&subscribe).await.map_err(socket_err)?;
        info!("subscribed to {peer} at {} Hz", self.config.update_frequency_hz);

        Ok(Box::new(UdpConnection::new(socket, peer, &self.config)?))
    }
}

/// An open UDP session with one device.
pub struct UdpConnection {
    socket: Option<UdpSocket>,
    peer: SocketAddr,
    keepalive: Interval,
    keepalive_msg: Vec<u8>,
    receive_timeout: Duration,
    /// Reused for every datagram of the session.
    buf: Box<[u8]>,
}

impl UdpConnection {
    fn new(
        socket: UdpSocket,
        peer: SocketAddr,
        config: &UdpTransportConfig,
    ) -> Result<Self, ConnectionError> {
        let mut keepalive = time::interval_at(
            Instant::now() + config.keepalive_interval,
            config.keepalive_interval,
        );
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Ok(Self {
            socket: Some(socket),
            peer,
            keepalive,
            keepalive_msg: encode_keepalive()?,
            receive_timeout: config.receive_timeout,
            buf: vec![0u8; MAX_DATAGRAM_LEN].into_boxed_slice(),
        })
    }
}

#[async_trait]
impl Connection for UdpConnection {
    async fn receive(&mut self, cancel: &CancellationToken) -> Result<InboundEvent, ReceiveError> {
        let Self {
            socket,
            peer,
            keepalive,
            keepalive_msg,
            receive_timeout,
            buf,
        } = self;
        let socket = socket.as_ref().ok_or_else(|| ReceiveError::Closed {
            reason: "connection already closed".into(),
        })?;
        let closed = |e: std::io::Error| ReceiveError::Closed {
            reason: e.to_string(),
        };

        let mut deadline = Instant::now() + *receive_timeout;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ReceiveError::Cancelled),
                _ = time::sleep_until(deadline) => {
                    return Err(ReceiveError::Timeout { after: *receive_timeout });
                }
                _ = keepalive.tick() => {
                    trace!("keepalive to {peer}");
                    socket.send(keepalive_msg).await.map_err(closed)?;
                }
                received = socket.recv(&mut buf[..]) => {
                    let len = received.map_err(closed)?;
                    match decode_datagram(&buf[..len])? {
                        Datagram::KeepAlive => {
                            trace!("keepalive from {peer}");
                            deadline = Instant::now() + *receive_timeout;
                        }
                        Datagram::Event(event) => return Ok(event),
                    }
                }
            }
        }
    }

    fn close(&mut self) {
        if self.socket.take().is_some() {
            debug!("closed session with {}", self.peer);
        }
    }
}

/// Wildcard local address in the peer's family.
fn unspecified_for(peer: SocketAddr) -> SocketAddr {
    match peer {
        SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
