//! Protocol module containing inbound event types, the telemetry codec and
//! the JSON datagram format.

pub mod datagram;
pub mod events;
pub mod telemetry;

pub use datagram::{decode_datagram, encode_keepalive, encode_subscribe, Datagram, DatagramError};
pub use events::{InboundEvent, PointerButtonKind};
pub use telemetry::{decode_telemetry, TelemetryDecodeError, TelemetryRecord, TELEMETRY_LEN};
