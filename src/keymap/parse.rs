//! String parsing for key bindings
//!
//! Accepts the button names used in config files, e.g. `"LeftShift"`,
//! `"R"`, `"LeftControl + R, F5"` or `"None"`.

use super::binding::{Keybind, KeybindList};
use super::types::KeyCode;

/// Parse a comma-separated list of `+`-joined button combinations
pub fn parse_keybind_list(list_str: &str) -> Result<KeybindList, KeymapError> {
    let trimmed = list_str.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(KeybindList::none());
    }

    let mut keybinds = Vec::new();
    for alternative in trimmed.split(',') {
        let alternative = alternative.trim();
        if alternative.is_empty() || alternative.eq_ignore_ascii_case("none") {
            continue;
        }
        keybinds.push(parse_keybind(alternative)?);
    }

    Ok(KeybindList { keybinds })
}

/// Parse a key string like "LeftControl + R" into a Keybind
pub fn parse_keybind(key_str: &str) -> Result<Keybind, KeymapError> {
    let mut buttons = Vec::new();

    for part in key_str.split('+') {
        let part = part.trim();
        if part.is_empty() {
            return Err(KeymapError::InvalidKey(format!(
                "Empty button in binding: {}",
                key_str
            )));
        }
        let button = parse_key_code(part)?;
        if !buttons.contains(&button) {
            buttons.push(button);
        }
    }

    Ok(Keybind::combo(buttons))
}

/// Parse a key code from string
pub fn parse_key_code(key: &str) -> Result<KeyCode, KeymapError> {
    let lower = key.to_ascii_lowercase();

    // Single character
    let mut chars = lower.chars();
    if let (Some(c), None) = (chars.next(), chars.clone().next()) {
        if c.is_ascii_alphanumeric() {
            return Ok(KeyCode::char(c));
        }
    }

    // Digit row as named by SMAPI ("D1")
    if let Some(rest) = lower.strip_prefix('d') {
        if rest.len() == 1 && rest.chars().all(|c| c.is_ascii_digit()) {
            return Ok(KeyCode::char(rest.chars().next().unwrap_or('0')));
        }
    }

    // Function keys
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=24).contains(&n) {
            return Ok(KeyCode::F(n));
        }
    }

    // Numpad
    if let Some(n) = lower
        .strip_prefix("numpad")
        .or_else(|| lower.strip_prefix("num"))
        .and_then(|n| n.parse::<u8>().ok())
    {
        if n <= 9 {
            return Ok(KeyCode::NumPad(n));
        }
    }

    // Named keys
    match lower.as_str() {
        "enter" | "return" => Ok(KeyCode::Enter),
        "escape" | "esc" => Ok(KeyCode::Escape),
        "tab" => Ok(KeyCode::Tab),
        "backspace" | "back" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "space" => Ok(KeyCode::Space),

        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),

        "leftshift" | "shift" => Ok(KeyCode::LeftShift),
        "rightshift" => Ok(KeyCode::RightShift),
        "leftcontrol" | "leftctrl" | "ctrl" | "control" => Ok(KeyCode::LeftControl),
        "rightcontrol" | "rightctrl" => Ok(KeyCode::RightControl),
        "leftalt" | "alt" => Ok(KeyCode::LeftAlt),
        "rightalt" => Ok(KeyCode::RightAlt),

        "mouseleft" => Ok(KeyCode::MouseLeft),
        "mouseright" => Ok(KeyCode::MouseRight),
        "mousemiddle" => Ok(KeyCode::MouseMiddle),

        "controllera" => Ok(KeyCode::ControllerA),
        "controllerb" => Ok(KeyCode::ControllerB),
        "controllerx" => Ok(KeyCode::ControllerX),
        "controllery" => Ok(KeyCode::ControllerY),
        "controllerback" => Ok(KeyCode::ControllerBack),
        "controllerstart" => Ok(KeyCode::ControllerStart),
        "leftshoulder" => Ok(KeyCode::LeftShoulder),
        "rightshoulder" => Ok(KeyCode::RightShoulder),
        "lefttrigger" => Ok(KeyCode::LeftTrigger),
        "righttrigger" => Ok(KeyCode::RightTrigger),

        _ => Err(KeymapError::InvalidKey(format!("Unknown key: {}", key))),
    }
}

/// Errors that can occur when parsing key bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapError {
    InvalidKey(String),
}

impl std::fmt::Display for KeymapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeymapError::InvalidKey(k) => write!(f, "Invalid key: {}", k),
        }
    }
}

impl std::error::Error for KeymapError {}
