//! Keybind and KeybindList: button combinations that trigger a highlight

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::parse::parse_keybind_list;
use super::types::KeyCode;

/// A set of buttons that must all be held at once
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keybind {
    pub buttons: Vec<KeyCode>,
}

impl Keybind {
    /// Create a single-button keybind
    pub fn single(button: KeyCode) -> Self {
        Self {
            buttons: vec![button],
        }
    }

    /// Create a combination keybind (e.g. LeftControl + R)
    pub fn combo(buttons: Vec<KeyCode>) -> Self {
        Self { buttons }
    }

    /// True if every button of this keybind is held.
    /// An empty keybind never matches.
    pub fn is_down(&self, pressed: &HashSet<KeyCode>) -> bool {
        !self.buttons.is_empty() && self.buttons.iter().all(|b| pressed.contains(b))
    }
}

impl fmt::Display for Keybind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.buttons.iter().map(|b| b.to_string()).collect();
        write!(f, "{}", parts.join(" + "))
    }
}

/// Alternative keybinds; any one of them triggers the list.
///
/// Serialized as a string such as `"LeftShift"`, `"LeftControl + R, F5"` or
/// `"None"` for an unbound list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeybindList {
    pub keybinds: Vec<Keybind>,
}

impl KeybindList {
    /// Empty list that never triggers
    pub fn none() -> Self {
        Self::default()
    }

    /// List bound to a single button
    pub fn single(button: KeyCode) -> Self {
        Self {
            keybinds: vec![Keybind::single(button)],
        }
    }

    pub fn is_bound(&self) -> bool {
        self.keybinds.iter().any(|k| !k.buttons.is_empty())
    }

    /// True if any alternative is fully held
    pub fn is_down(&self, pressed: &HashSet<KeyCode>) -> bool {
        self.keybinds.iter().any(|k| k.is_down(pressed))
    }
}

impl fmt::Display for KeybindList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_bound() {
            return write!(f, "None");
        }
        let parts: Vec<String> = self.keybinds.iter().map(|k| k.to_string()).collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl TryFrom<String> for KeybindList {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_keybind_list(&value).map_err(|e| e.to_string())
    }
}

impl From<KeybindList> for String {
    fn from(list: KeybindList) -> Self {
        list.to_string()
    }
}
