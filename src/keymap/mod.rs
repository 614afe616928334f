//! Hotkey bindings for range highlights
//!
//! This module provides the button vocabulary and binding lists that
//! config files and plugins use to name highlight hotkeys:
//! - `KeyCode` names a single keyboard, mouse or controller button
//! - `Keybind` is a combination of buttons held together
//! - `KeybindList` holds alternative keybinds, parsed from strings
//!
//! # Architecture
//!
//! ```text
//! "LeftControl + R, F5" → parse_keybind_list() → KeybindList → is_down(pressed)
//! ```
//!
//! Polling the buttons is the host's job; the engine only receives the
//! set of currently held `KeyCode`s.

mod binding;
mod parse;
mod types;

pub use binding::{Keybind, KeybindList};
pub use parse::{parse_key_code, parse_keybind, parse_keybind_list, KeymapError};
pub use types::KeyCode;
