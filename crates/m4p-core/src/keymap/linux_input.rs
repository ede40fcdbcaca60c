//! Semantic key names to Linux input event codes (`linux/input-event-codes.h`).
//!
//! Used by the uinput injector.  Raw remote codes follow DOM `keyCode`
//! numbering, so only keys a TV remote can plausibly produce are covered:
//! navigation, digits, letters from the on-screen keyboard, and media keys.

use crate::domain::action::KeyName;

// Linux KEY_* values.
pub const KEY_ESC: u16 = 1;
pub const KEY_BACKSPACE: u16 = 14;
pub const KEY_TAB: u16 = 15;
pub const KEY_ENTER: u16 = 28;
pub const KEY_SPACE: u16 = 57;
pub const KEY_HOME: u16 = 102;
pub const KEY_UP: u16 = 103;
pub const KEY_PAGEUP: u16 = 104;
pub const KEY_LEFT: u16 = 105;
pub const KEY_RIGHT: u16 = 106;
pub const KEY_END: u16 = 107;
pub const KEY_DOWN: u16 = 108;
pub const KEY_PAGEDOWN: u16 = 109;
pub const KEY_DELETE: u16 = 111;
pub const KEY_LEFTMETA: u16 = 125;
pub const KEY_STOPCD: u16 = 166;
pub const KEY_REWIND: u16 = 168;
pub const KEY_PLAYCD: u16 = 200;
pub const KEY_PAUSECD: u16 = 201;
pub const KEY_FASTFORWARD: u16 = 208;

/// Letters A–Z in alphabetical order.
const LETTERS: [u16; 26] = [
    30, 48, 46, 32, 18, 33, 34, 35, 23, 36, 37, 38, 50, 49, 24, 25, 16, 19, 31, 20, 22, 47, 17,
    45, 21, 44,
];

/// Translates a [`KeyName`] to a Linux key code.
///
/// Returns `None` if the key has no Linux equivalent.
pub fn key_to_linux(key: &KeyName) -> Option<u16> {
    match key {
        KeyName::Named(name) => named_to_linux(name),
        KeyName::Code(code) => dom_to_linux(*code),
    }
}

fn named_to_linux(name: &str) -> Option<u16> {
    match name {
        "audio_play" => Some(KEY_PLAYCD),
        "audio_pause" => Some(KEY_PAUSECD),
        "cmd" => Some(KEY_LEFTMETA),
        "escape" => Some(KEY_ESC),
        _ => None,
    }
}

fn dom_to_linux(code: u32) -> Option<u16> {
    match code {
        8 => Some(KEY_BACKSPACE),
        9 => Some(KEY_TAB),
        13 => Some(KEY_ENTER),
        27 => Some(KEY_ESC),
        32 => Some(KEY_SPACE),
        33 => Some(KEY_PAGEUP),
        34 => Some(KEY_PAGEDOWN),
        35 => Some(KEY_END),
        36 => Some(KEY_HOME),
        37 => Some(KEY_LEFT),
        38 => Some(KEY_UP),
        39 => Some(KEY_RIGHT),
        40 => Some(KEY_DOWN),
        46 => Some(KEY_DELETE),
        // KEY_0 sits after KEY_9.
        48 => Some(11),
        49..=57 => Some((code - 49 + 2) as u16),
        65..=90 => Some(LETTERS[(code - 65) as usize]),
        412 => Some(KEY_REWIND),
        413 => Some(KEY_STOPCD),
        417 => Some(KEY_FASTFORWARD),
        _ => None,
    }
}

/// Every code [`key_to_linux`] can return; the uinput device registers these.
pub fn all_linux_keys() -> Vec<u16> {
    let mut keys = vec![
        KEY_ESC,
        KEY_BACKSPACE,
        KEY_TAB,
        KEY_ENTER,
        KEY_SPACE,
        KEY_HOME,
        KEY_UP,
        KEY_PAGEUP,
        KEY_LEFT,
        KEY_RIGHT,
        KEY_END,
        KEY_DOWN,
        KEY_PAGEDOWN,
        KEY_DELETE,
        KEY_LEFTMETA,
        KEY_STOPCD,
        KEY_REWIND,
        KEY_PLAYCD,
        KEY_PAUSECD,
        KEY_FASTFORWARD,
    ];
    keys.extend(2..=11);
    keys.extend_from_slice(&LETTERS);
    keys
}
