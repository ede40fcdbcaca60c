//! Semantic input actions handed to an injector backend.

use std::fmt;

/// Name of a key to toggle.
///
/// Well-known remote keys map to named keys; other codes below the reserved
/// threshold pass through as their raw numeric code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyName {
    /// A named key such as `"audio_play"` or `"escape"`.
    Named(&'static str),
    /// A raw remote keycode (DOM `keyCode` numbering).
    Code(u32),
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyName::Named(name) => f.write_str(name),
            KeyName::Code(code) => write!(f, "{code}"),
        }
    }
}

/// Pointer buttons the remote can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary button.
    Left,
    /// Secondary button (context menu).
    Right,
    /// Extra button 1, "go back" in browsers.
    Back,
    /// Extra button 2, "go forward" in browsers.
    Forward,
}

impl PointerButton {
    /// Conventional short name (`left`, `right`, `x1`, `x2`).
    pub fn name(self) -> &'static str {
        match self {
            PointerButton::Left => "left",
            PointerButton::Right => "right",
            PointerButton::Back => "x1",
            PointerButton::Forward => "x2",
        }
    }
}

impl fmt::Display for PointerButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One input action for the local machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticAction {
    /// Press (`down = true`) or release a key.
    KeyToggle { key: KeyName, down: bool },
    /// Move the pointer to absolute, calibrated pixel coordinates.
    PointerMove { x: i32, y: i32 },
    /// Press or release a pointer button.
    ButtonToggle { button: PointerButton, down: bool },
    /// Scroll vertically by whole notches; positive is away from the user.
    Scroll { amount: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_name_display() {
        assert_eq!(KeyName::Named("audio_play").to_string(), "audio_play");
        assert_eq!(KeyName::Code(13).to_string(), "13");
    }

    #[test]
    fn test_pointer_button_names() {
        assert_eq!(PointerButton::Left.name(), "left");
        assert_eq!(PointerButton::Right.name(), "right");
        assert_eq!(PointerButton::Back.name(), "x1");
        assert_eq!(PointerButton::Forward.name(), "x2");
    }
}
