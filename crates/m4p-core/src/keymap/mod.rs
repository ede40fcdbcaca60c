//! Keycode tables.
//!
//! The remote reports DOM-style `keyCode` values.  A handful of them (media
//! transport, the four colour buttons, back, guide) have dedicated bindings in
//! [`REMOTE_KEYS`]; every other code below [`RESERVED_KEYCODE_THRESHOLD`]
//! passes through as a raw key, and codes at or above it are protocol-internal
//! and never injected.

pub mod linux_input;

use crate::domain::action::PointerButton;

/// Codes at or above this value are reserved by the device and dropped.
pub const RESERVED_KEYCODE_THRESHOLD: u32 = 1000;

/// What a table entry turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBinding {
    /// Toggle the named key.
    Key(&'static str),
    /// Toggle a pointer button.
    Button(PointerButton),
    /// Known key that deliberately produces nothing.
    Suppressed,
}

/// One entry of the fixed remote key table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteKey {
    pub code: u32,
    /// Label printed on the remote.
    pub label: &'static str,
    pub binding: KeyBinding,
}

/// Fixed bindings for well-known remote keys.
pub const REMOTE_KEYS: &[RemoteKey] = &[
    RemoteKey { code: 415, label: "play", binding: KeyBinding::Key("audio_play") },
    RemoteKey { code: 19, label: "pause", binding: KeyBinding::Key("audio_pause") },
    RemoteKey { code: 461, label: "back", binding: KeyBinding::Button(PointerButton::Back) },
    RemoteKey { code: 403, label: "red", binding: KeyBinding::Key("cmd") },
    RemoteKey { code: 404, label: "green", binding: KeyBinding::Key("escape") },
    RemoteKey { code: 405, label: "yellow", binding: KeyBinding::Suppressed },
    RemoteKey { code: 406, label: "blue", binding: KeyBinding::Button(PointerButton::Forward) },
    RemoteKey { code: 458, label: "guide", binding: KeyBinding::Button(PointerButton::Right) },
];

/// Looks up the table entry for `code`.
pub fn lookup(code: u32) -> Option<&'static RemoteKey> {
    REMOTE_KEYS.iter().find(|key| key.code == code)
}

/// Returns `true` if `code` is in the reserved range.
pub fn is_reserved(code: u32) -> bool {
    code >= RESERVED_KEYCODE_THRESHOLD
}
