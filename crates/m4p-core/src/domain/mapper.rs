//! ActionMapper: translates inbound device events into semantic actions.
//!
//! The mapper holds only the read-only [`CalibrationProfile`].  It never
//! performs I/O, so the session loop can call it from any task and tests can
//! assert on its output directly.

use crate::domain::action::{KeyName, PointerButton, SemanticAction};
use crate::domain::calibration::CalibrationProfile;
use crate::keymap::{self, KeyBinding};
use crate::protocol::events::{InboundEvent, PointerButtonKind};
use crate::protocol::telemetry::{decode_telemetry, TelemetryDecodeError, TelemetryRecord};

/// Raw wheel units per logical scroll step.
pub const SCROLL_NOTCH: i32 = 60;

/// Result of translating one inbound event.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    /// Actions to inject, in order.
    pub actions: Vec<SemanticAction>,
    /// Set when a telemetry payload was short; `actions` were still derived
    /// from the partial record.
    pub incomplete: Option<TelemetryDecodeError>,
}

/// Maps device events to local input actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionMapper {
    calibration: CalibrationProfile,
}

impl ActionMapper {
    /// Creates a mapper using `calibration` for pointer coordinates.
    pub fn new(calibration: CalibrationProfile) -> Self {
        Self { calibration }
    }

    /// The active calibration profile.
    pub fn calibration(&self) -> CalibrationProfile {
        self.calibration
    }

    /// Translates one event, decoding telemetry payloads on the way.
    ///
    /// A short telemetry payload is not an error: the partial record is
    /// mapped and the decode error is returned alongside the actions.
    pub fn translate(&self, event: &InboundEvent) -> Translation {
        let mut incomplete = None;
        let actions = match event {
            InboundEvent::Key { code, is_down } => {
                self.map_key(*code, *is_down).into_iter().collect()
            }
            InboundEvent::Telemetry { payload } => {
                let record = decode_telemetry(payload).unwrap_or_else(|e| {
                    let partial = e.partial;
                    incomplete = Some(e);
                    partial
                });
                vec![self.map_telemetry(&record)]
            }
            InboundEvent::PointerButton { kind } => vec![self.map_pointer_button(*kind)],
            InboundEvent::Scroll { delta } => vec![self.map_scroll(*delta)],
            InboundEvent::Unrecognized { .. } => Vec::new(),
        };
        Translation { actions, incomplete }
    }

    /// Convenience wrapper returning only the actions.
    pub fn map(&self, event: &InboundEvent) -> Vec<SemanticAction> {
        self.translate(event).actions
    }

    /// Maps a key edge through the fixed table.
    ///
    /// Returns `None` for suppressed table entries and reserved codes.
    pub fn map_key(&self, code: u32, down: bool) -> Option<SemanticAction> {
        match keymap::lookup(code).map(|k| k.binding) {
            Some(KeyBinding::Key(name)) => Some(SemanticAction::KeyToggle {
                key: KeyName::Named(name),
                down,
            }),
            Some(KeyBinding::Button(button)) => Some(SemanticAction::ButtonToggle { button, down }),
            Some(KeyBinding::Suppressed) => None,
            None if keymap::is_reserved(code) => None,
            None => Some(SemanticAction::KeyToggle {
                key: KeyName::Code(code),
                down,
            }),
        }
    }

    /// Maps a telemetry record to an absolute pointer move.
    ///
    /// Only the coordinate is consumed; the sensor fields are inert.
    pub fn map_telemetry(&self, record: &TelemetryRecord) -> SemanticAction {
        let (x, y) = self.calibration.apply(record.coordinate);
        SemanticAction::PointerMove { x, y }
    }

    /// Maps the primary button edge.
    pub fn map_pointer_button(&self, kind: PointerButtonKind) -> SemanticAction {
        SemanticAction::ButtonToggle {
            button: PointerButton::Left,
            down: kind.is_down(),
        }
    }

    /// Maps a wheel delta to whole notches, truncating toward zero.
    pub fn map_scroll(&self, delta: i32) -> SemanticAction {
        SemanticAction::Scroll {
            amount: delta / SCROLL_NOTCH,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
