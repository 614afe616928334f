//! Highlighter registry
//!
//! Maps string keys to highlighter definitions. Two registries exist, one for
//! building subjects and one for item subjects. A registry is a cheap shared
//! handle: clones see the same entries, so plugins can keep a handle and
//! add or remove definitions at any time. The engine iterates a snapshot
//! taken at the start of each refresh.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::category::Category;
use crate::color::Color;
use crate::keymap::KeybindList;
use crate::shape::Mask;
use crate::world::Building;

/// Result of a building highlighter for one building
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingHighlight {
    pub tint: Color,
    pub mask: Mask,
    /// Offset from the building's top-left tile to the mask centre
    pub x_offset: i32,
    pub y_offset: i32,
}

/// Result of an item highlighter for one item name
#[derive(Debug, Clone, PartialEq)]
pub struct ItemHighlight {
    pub tint: Color,
    pub mask: Mask,
}

pub type BuildingCallback = dyn Fn(&Building) -> Option<BuildingHighlight>;
pub type ItemCallback = dyn Fn(&str) -> Option<ItemHighlight>;

/// A registered highlighter
pub struct HighlighterDefinition<F: ?Sized> {
    pub key: String,
    pub category: Category,
    /// Unbound when the highlighter has no hotkey of its own
    pub hotkey: KeybindList,
    pub callback: Rc<F>,
}

impl<F: ?Sized> Clone for HighlighterDefinition<F> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            category: self.category.clone(),
            hotkey: self.hotkey.clone(),
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<F: ?Sized> fmt::Debug for HighlighterDefinition<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighlighterDefinition")
            .field("key", &self.key)
            .field("category", &self.category)
            .field("hotkey", &self.hotkey)
            .finish_non_exhaustive()
    }
}

pub type BuildingDefinition = HighlighterDefinition<BuildingCallback>;
pub type ItemDefinition = HighlighterDefinition<ItemCallback>;

/// Insertion-ordered key → definition map behind a shared handle
pub struct HighlighterRegistry<F: ?Sized> {
    entries: Rc<RefCell<Vec<HighlighterDefinition<F>>>>,
    revision: Rc<Cell<u64>>,
}

pub type BuildingRegistry = HighlighterRegistry<BuildingCallback>;
pub type ItemRegistry = HighlighterRegistry<ItemCallback>;

impl<F: ?Sized> Clone for HighlighterRegistry<F> {
    fn clone(&self) -> Self {
        Self {
            entries: Rc::clone(&self.entries),
            revision: Rc::clone(&self.revision),
        }
    }
}

impl<F: ?Sized> Default for HighlighterRegistry<F> {
    fn default() -> Self {
        Self {
            entries: Rc::new(RefCell::new(Vec::new())),
            revision: Rc::new(Cell::new(0)),
        }
    }
}

impl<F: ?Sized> fmt::Debug for HighlighterRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.borrow().iter()).finish()
    }
}

impl<F: ?Sized> HighlighterRegistry<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition. An existing definition with the same key is
    /// replaced in its original position.
    pub fn add(&self, key: impl Into<String>, category: Category, hotkey: KeybindList, callback: Rc<F>) {
        let definition = HighlighterDefinition {
            key: key.into(),
            category,
            hotkey,
            callback,
        };

        let mut entries = self.entries.borrow_mut();
        match entries.iter_mut().find(|d| d.key == definition.key) {
            Some(existing) => {
                tracing::info!("Replacing highlighter '{}'", definition.key);
                *existing = definition;
            }
            None => {
                tracing::info!("Registered highlighter '{}'", definition.key);
                entries.push(definition);
            }
        }
        self.bump();
    }

    /// Remove a definition. Unknown keys are ignored.
    pub fn remove(&self, key: &str) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|d| d.key != key);
        let removed = entries.len() != before;
        if removed {
            tracing::info!("Removed highlighter '{}'", key);
            self.bump();
        }
        removed
    }

    /// Snapshot of all definitions in registration order
    pub fn list(&self) -> Vec<HighlighterDefinition<F>> {
        self.entries.borrow().clone()
    }

    pub fn get(&self, key: &str) -> Option<HighlighterDefinition<F>> {
        self.entries.borrow().iter().find(|d| d.key == key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().iter().any(|d| d.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Incremented on every add and effective remove
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    fn bump(&self) {
        self.revision.set(self.revision.get().wrapping_add(1));
    }
}
