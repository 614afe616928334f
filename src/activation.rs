//! Activation state and hotkey tracking
//!
//! [`ActivationState`] is the per-refresh snapshot of what the player is
//! asking to see. [`HotkeyTracker`] derives the requested categories from the
//! set of held buttons, in hold or toggle mode.

use std::collections::{BTreeSet, HashSet};

use crate::category::Category;
use crate::keymap::{KeyCode, KeybindList};
use crate::world::TilePos;

/// What the player currently requests, supplied by the host each tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationState {
    /// Categories whose trigger is active
    pub requested: BTreeSet<Category>,
    /// Show every category regardless of `requested`
    pub show_all: bool,
    /// Name of the item in the player's hand
    pub held_item: Option<String>,
    /// Tile under the mouse cursor
    pub cursor_tile: Option<TilePos>,
    /// Tile the player is facing
    pub action_tile: Option<TilePos>,
    pub mouse_hidden: bool,
    pub player_moving: bool,
}

impl ActivationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_requested(mut self, category: Category) -> Self {
        self.requested.insert(category);
        self
    }

    pub fn with_show_all(mut self, show_all: bool) -> Self {
        self.show_all = show_all;
        self
    }

    pub fn holding(mut self, item: impl Into<String>) -> Self {
        self.held_item = Some(item.into());
        self
    }

    pub fn with_cursor(mut self, tile: TilePos) -> Self {
        self.cursor_tile = Some(tile);
        self
    }

    pub fn with_action_tile(mut self, tile: TilePos) -> Self {
        self.action_tile = Some(tile);
        self
    }

    pub fn with_mouse_hidden(mut self, hidden: bool) -> Self {
        self.mouse_hidden = hidden;
        self
    }

    pub fn with_player_moving(mut self, moving: bool) -> Self {
        self.player_moving = moving;
        self
    }

    pub fn is_requested(&self, category: &Category) -> bool {
        self.show_all || self.requested.contains(category)
    }
}

/// Turns held buttons into requested categories.
///
/// In hold mode a category is requested while any of its bindings is down.
/// In toggle mode each press (rising edge) flips the category on or off.
#[derive(Debug, Clone, Default)]
pub struct HotkeyTracker {
    toggle_mode: bool,
    was_down: BTreeSet<Category>,
    toggled: BTreeSet<Category>,
}

impl HotkeyTracker {
    pub fn new(toggle_mode: bool) -> Self {
        Self {
            toggle_mode,
            ..Self::default()
        }
    }

    pub fn toggle_mode(&self) -> bool {
        self.toggle_mode
    }

    /// Switching modes clears any toggled categories
    pub fn set_toggle_mode(&mut self, toggle_mode: bool) {
        if self.toggle_mode != toggle_mode {
            self.toggle_mode = toggle_mode;
            self.toggled.clear();
        }
    }

    /// Feed the currently held buttons and get the requested categories.
    ///
    /// `bindings` may list a category more than once; any of its bindings
    /// being down counts as the category being down.
    pub fn update(&mut self, bindings: &[(Category, KeybindList)], pressed: &HashSet<KeyCode>) -> BTreeSet<Category> {
        let down: BTreeSet<Category> = bindings
            .iter()
            .filter(|(_, hotkey)| hotkey.is_down(pressed))
            .map(|(category, _)| category.clone())
            .collect();

        let requested = if self.toggle_mode {
            for category in down.difference(&self.was_down) {
                if !self.toggled.remove(category) {
                    self.toggled.insert(category.clone());
                }
            }
            self.toggled.clone()
        } else {
            down.clone()
        };

        self.was_down = down;
        requested
    }

    /// Build a full activation snapshot from held buttons
    pub fn activation(
        &mut self,
        bindings: &[(Category, KeybindList)],
        show_all_key: &KeybindList,
        pressed: &HashSet<KeyCode>,
    ) -> ActivationState {
        ActivationState {
            requested: self.update(bindings, pressed),
            show_all: show_all_key.is_down(pressed),
            ..ActivationState::default()
        }
    }
}
