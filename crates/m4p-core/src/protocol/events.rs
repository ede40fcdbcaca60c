//! Inbound events produced once per received datagram.

use serde::{Deserialize, Serialize};

/// Edge of the remote's primary (OK / click) button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButtonKind {
    Down,
    Up,
}

impl PointerButtonKind {
    /// Parses the device's textual kind (`"mousedown"` / `"mouseup"`).
    ///
    /// Returns `None` for any other value.
    pub fn from_wire(kind: &str) -> Option<Self> {
        match kind {
            "mousedown" => Some(PointerButtonKind::Down),
            "mouseup" => Some(PointerButtonKind::Up),
            _ => None,
        }
    }

    /// Returns `true` for [`PointerButtonKind::Down`].
    pub fn is_down(self) -> bool {
        matches!(self, PointerButtonKind::Down)
    }
}

/// One event received from the device.
///
/// The transport produces exactly one `InboundEvent` per frame; the session
/// loop owns it for one dispatch cycle and then drops it.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// A remote key changed state.
    Key { code: u32, is_down: bool },
    /// Raw pointer/sensor telemetry, decoded by [`crate::decode_telemetry`].
    Telemetry { payload: Vec<u8> },
    /// The primary button was pressed or released.
    PointerButton { kind: PointerButtonKind },
    /// The wheel moved by `delta` raw units (60 per notch).
    Scroll { delta: i32 },
    /// A frame of a kind this client does not model.  Produces no action.
    Unrecognized { kind: String },
}

impl InboundEvent {
    /// Short, allocation-free name of the variant for log lines.
    pub fn kind_name(&self) -> &'static str {
        match self {
            InboundEvent::Key { .. } => "key",
            InboundEvent::Telemetry { .. } => "telemetry",
            InboundEvent::PointerButton { .. } => "pointer_button",
            InboundEvent::Scroll { .. } => "scroll",
            InboundEvent::Unrecognized { .. } => "unrecognized",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
