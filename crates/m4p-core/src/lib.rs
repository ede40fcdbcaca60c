//! # m4p-core
//!
//! Shared library for magic-remote clients containing the telemetry codec,
//! the JSON datagram format spoken by the device, the keycode table, and the
//! pure translation from device events to local input actions.
//!
//! This crate has zero dependencies on OS APIs or network sockets.
//!
//! # Architecture overview
//!
//! A "magic remote" is a TV pointer remote.  A small app on the TV streams
//! what the remote does (button edges, absolute pointer coordinates, wheel
//! notches) to a client on the LAN, which replays it as local input.
//!
//! - **`protocol`** – How bytes travel.  Datagrams are JSON objects tagged by
//!   kind; pointer telemetry is a fixed 50-byte little-endian record carried
//!   base64-encoded inside them.
//!
//! - **`domain`** – Pure logic.  The [`ActionMapper`] turns an
//!   [`InboundEvent`] into ordered [`SemanticAction`]s using a
//!   [`CalibrationProfile`].
//!
//! - **`keymap`** – The fixed table of well-known remote keycodes, plus the
//!   translation of semantic key names to Linux input codes used by the
//!   uinput backend.

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::action::{KeyName, PointerButton, SemanticAction};
pub use domain::calibration::{CalibrationError, CalibrationProfile};
pub use domain::mapper::{ActionMapper, Translation};
pub use protocol::events::{InboundEvent, PointerButtonKind};
pub use protocol::telemetry::{decode_telemetry, TelemetryDecodeError, TelemetryRecord};
