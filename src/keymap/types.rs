//! Core types for the keymap system: KeyCode

use std::fmt;

/// A physical button: keyboard key, mouse button or controller button.
///
/// Modifier keys are ordinary buttons here. A binding such as
/// `LeftShift + R` requires both buttons to be held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    /// A letter or digit key (normalized to uppercase)
    Char(char),

    // Named keys
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,

    // Arrow keys
    Up,
    Down,
    Left,
    Right,

    // Modifiers
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    LeftAlt,
    RightAlt,

    // Function keys
    F(u8), // F1-F24

    // Numpad
    NumPad(u8), // NumPad0-NumPad9

    // Mouse
    MouseLeft,
    MouseRight,
    MouseMiddle,

    // Controller
    ControllerA,
    ControllerB,
    ControllerX,
    ControllerY,
    ControllerBack,
    ControllerStart,
    LeftShoulder,
    RightShoulder,
    LeftTrigger,
    RightTrigger,
}

impl KeyCode {
    /// Create a character key, normalizing case
    pub fn char(c: char) -> Self {
        KeyCode::Char(c.to_ascii_uppercase())
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Escape => write!(f, "Escape"),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::Backspace => write!(f, "Back"),
            KeyCode::Delete => write!(f, "Delete"),
            KeyCode::Space => write!(f, "Space"),
            KeyCode::Up => write!(f, "Up"),
            KeyCode::Down => write!(f, "Down"),
            KeyCode::Left => write!(f, "Left"),
            KeyCode::Right => write!(f, "Right"),
            KeyCode::LeftShift => write!(f, "LeftShift"),
            KeyCode::RightShift => write!(f, "RightShift"),
            KeyCode::LeftControl => write!(f, "LeftControl"),
            KeyCode::RightControl => write!(f, "RightControl"),
            KeyCode::LeftAlt => write!(f, "LeftAlt"),
            KeyCode::RightAlt => write!(f, "RightAlt"),
            KeyCode::F(n) => write!(f, "F{}", n),
            KeyCode::NumPad(n) => write!(f, "NumPad{}", n),
            KeyCode::MouseLeft => write!(f, "MouseLeft"),
            KeyCode::MouseRight => write!(f, "MouseRight"),
            KeyCode::MouseMiddle => write!(f, "MouseMiddle"),
            KeyCode::ControllerA => write!(f, "ControllerA"),
            KeyCode::ControllerB => write!(f, "ControllerB"),
            KeyCode::ControllerX => write!(f, "ControllerX"),
            KeyCode::ControllerY => write!(f, "ControllerY"),
            KeyCode::ControllerBack => write!(f, "ControllerBack"),
            KeyCode::ControllerStart => write!(f, "ControllerStart"),
            KeyCode::LeftShoulder => write!(f, "LeftShoulder"),
            KeyCode::RightShoulder => write!(f, "RightShoulder"),
            KeyCode::LeftTrigger => write!(f, "LeftTrigger"),
            KeyCode::RightTrigger => write!(f, "RightTrigger"),
        }
    }
}
