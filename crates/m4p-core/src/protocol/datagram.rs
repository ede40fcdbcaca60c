//! JSON datagram format exchanged with the remote's companion app.
//!
//! Every datagram is one UTF-8 JSON object tagged by its `t` field.  The body
//! of each kind sits under a field named after it:
//!
//! ```text
//! {"t":"input","input":{"parameters":{"keyCode":415,"isDown":true}}}
//! {"t":"remote_update","remoteUpdate":{"payload":"<base64 telemetry>"}}
//! {"t":"mouse","mouse":{"type":"mousedown"}}
//! {"t":"wheel","wheel":{"delta":120}}
//! {"t":"keepalive"}
//! ```
//!
//! Outbound, the client only ever sends a sensor subscription and keepalives.
//! Decoding is pure: no sockets, no clocks.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::events::{InboundEvent, PointerButtonKind};

/// Version number sent in the subscription request.
pub const PROTOCOL_VERSION: u32 = 1;

/// Largest datagram the client expects to receive.
pub const MAX_DATAGRAM_LEN: usize = 8 * 1024;

/// Telemetry fields requested in the subscription, in payload order.
pub const TELEMETRY_FILTER: [&str; 6] = [
    "returnValue",
    "deviceId",
    "coordinate",
    "gyroscope",
    "acceleration",
    "quaternion",
];

/// Errors that can occur while decoding or encoding a datagram.
#[derive(Debug, Error)]
pub enum DatagramError {
    /// The bytes are not a JSON object of the expected shape.
    #[error("malformed datagram: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A known kind arrived without its body object.
    #[error("datagram of kind {kind:?} is missing its body")]
    MissingBody { kind: &'static str },

    /// The telemetry payload is not valid base64.
    #[error("telemetry payload is not valid base64: {0}")]
    Payload(#[from] base64::DecodeError),
}

/// A decoded inbound datagram.
#[derive(Debug, Clone, PartialEq)]
pub enum Datagram {
    /// An input event for the session loop.
    Event(InboundEvent),
    /// Liveness signal from the device; consumed by the transport.
    KeepAlive,
}

// ── Wire shapes ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawDatagram {
    t: String,
    #[serde(default)]
    input: Option<InputBody>,
    #[serde(default, rename = "remoteUpdate")]
    remote_update: Option<RemoteUpdateBody>,
    #[serde(default)]
    mouse: Option<MouseBody>,
    #[serde(default)]
    wheel: Option<WheelBody>,
}

#[derive(Deserialize)]
struct InputBody {
    parameters: InputParameters,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InputParameters {
    key_code: u32,
    #[serde(default)]
    is_down: bool,
}

#[derive(Deserialize)]
struct RemoteUpdateBody {
    payload: String,
}

#[derive(Deserialize)]
struct MouseBody {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct WheelBody {
    delta: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeRequest<'a> {
    t: &'static str,
    version: u32,
    update_freq: u32,
    filter: &'a [&'static str],
}

#[derive(Serialize)]
struct KeepAliveMessage {
    t: &'static str,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes one datagram.
///
/// Unknown `t` values, and pointer-button kinds other than `mousedown` /
/// `mouseup`, become [`InboundEvent::Unrecognized`] rather than errors.
///
/// # Errors
///
/// Returns [`DatagramError`] if the JSON is malformed, a known kind lacks its
/// body, or the telemetry payload is not base64.
///
/// # Examples
///
/// ```rust
/// use m4p_core::protocol::datagram::{decode_datagram, Datagram};
/// use m4p_core::InboundEvent;
///
/// let bytes = br#"{"t":"wheel","wheel":{"delta":-120}}"#;
/// assert_eq!(
///     decode_datagram(bytes).unwrap(),
///     Datagram::Event(InboundEvent::Scroll { delta: -120 })
/// );
/// ```
pub fn decode_datagram(bytes: &[u8]) -> Result<Datagram, DatagramError> {
    let raw: RawDatagram = serde_json::from_slice(bytes)?;

    let event = match raw.t.as_str() {
        "keepalive" => return Ok(Datagram::KeepAlive),
        "input" => {
            let body = raw.input.ok_or(DatagramError::MissingBody { kind: "input" })?;
            InboundEvent::Key {
                code: body.parameters.key_code,
                is_down: body.parameters.is_down,
            }
        }
        "remote_update" => {
            let body = raw
                .remote_update
                .ok_or(DatagramError::MissingBody { kind: "remote_update" })?;
            InboundEvent::Telemetry {
                payload: STANDARD.decode(body.payload.as_bytes())?,
            }
        }
        "mouse" => {
            let body = raw.mouse.ok_or(DatagramError::MissingBody { kind: "mouse" })?;
            match PointerButtonKind::from_wire(&body.kind) {
                Some(kind) => InboundEvent::PointerButton { kind },
                None => InboundEvent::Unrecognized {
                    kind: format!("mouse/{}", body.kind),
                },
            }
        }
        "wheel" => {
            let body = raw.wheel.ok_or(DatagramError::MissingBody { kind: "wheel" })?;
            InboundEvent::Scroll { delta: body.delta }
        }
        _ => InboundEvent::Unrecognized { kind: raw.t },
    };

    Ok(Datagram::Event(event))
}

/// Encodes the sensor subscription sent right after the socket is opened.
///
/// # Errors
///
/// Returns [`DatagramError::Malformed`] if serialization fails.
pub fn encode_subscribe(update_freq_hz: u32) -> Result<Vec<u8>, DatagramError> {
    let request = SubscribeRequest {
        t: "sub_sensor",
        version: PROTOCOL_VERSION,
        update_freq: update_freq_hz,
        filter: &TELEMETRY_FILTER,
    };
    Ok(serde_json::to_vec(&request)?)
}

/// Encodes a keepalive datagram.
///
/// # Errors
///
/// Returns [`DatagramError::Malformed`] if serialization fails.
pub fn encode_keepalive() -> Result<Vec<u8>, DatagramError> {
    Ok(serde_json::to_vec(&KeepAliveMessage { t: "keepalive" })?)
}

/// Encodes a telemetry payload as a `remote_update` datagram.
///
/// The client never sends these; fake devices in tests do.  Available with
/// the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
pub fn encode_remote_update(payload: &[u8]) -> Vec<u8> {
    format!(
        r#"{{"t":"remote_update","remoteUpdate":{{"payload":"{}"}}}}"#,
        STANDARD.encode(payload)
    )
    .into_bytes()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
