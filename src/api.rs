//! Plugin API
//!
//! Other mods register their own highlighters through this handle and use
//! the shape helpers to build masks. Every highlighter registered here forms
//! its own category, named after its key. Keys should be namespaced by the
//! registering plugin, since re-using a key replaces the old highlighter.

use std::cell::RefCell;
use std::rc::Rc;

use crate::category::Category;
use crate::color::Color;
use crate::config::HighlightConfig;
use crate::keymap::KeybindList;
use crate::registry::{BuildingHighlight, BuildingRegistry, ItemHighlight, ItemRegistry};
use crate::shape::{self, Mask};
use crate::world::Building;

#[derive(Clone)]
pub struct RangeHighlightApi {
    buildings: BuildingRegistry,
    items: ItemRegistry,
    config: Rc<RefCell<HighlightConfig>>,
}

impl RangeHighlightApi {
    pub(crate) fn new(
        buildings: BuildingRegistry,
        items: ItemRegistry,
        config: Rc<RefCell<HighlightConfig>>,
    ) -> Self {
        Self {
            buildings,
            items,
            config,
        }
    }

    // ----- Tints currently configured -----

    pub fn junimo_range_tint(&self) -> Color {
        self.config.borrow().junimo.tint
    }

    pub fn scarecrow_range_tint(&self) -> Color {
        self.config.borrow().scarecrow.tint
    }

    pub fn sprinkler_range_tint(&self) -> Color {
        self.config.borrow().sprinkler.tint
    }

    pub fn beehouse_range_tint(&self) -> Color {
        self.config.borrow().beehouse.tint
    }

    pub fn mushroom_log_range_tint(&self) -> Color {
        self.config.borrow().mushroom_log.tint
    }

    pub fn bomb_range_tint(&self) -> Color {
        self.config.borrow().bomb.tint
    }

    // ----- Shape helpers -----

    pub fn cartesian_circle(&self, radius: u32, exclude_center: bool) -> Mask {
        shape::cartesian_disc(radius, exclude_center)
    }

    pub fn manhattan_circle(&self, radius: u32, exclude_center: bool) -> Mask {
        shape::manhattan_disc(radius, exclude_center)
    }

    pub fn square_circle(&self, radius: u32, exclude_center: bool) -> Mask {
        shape::chebyshev_disc(radius, exclude_center)
    }

    /// Cartesian disc without its centre tile
    pub fn cartesian_disc(&self, radius: u32) -> Mask {
        self.cartesian_circle(radius, true)
    }

    /// Manhattan disc without its centre tile
    pub fn manhattan_disc(&self, radius: u32) -> Mask {
        self.manhattan_circle(radius, true)
    }

    /// Square without its centre tile
    pub fn chebyshev_disc(&self, radius: u32) -> Mask {
        self.square_circle(radius, true)
    }

    // ----- Registration -----

    /// Highlight every building the callback accepts. The mask centre sits at
    /// the building's top-left tile plus the returned offsets.
    pub fn add_building_range_highlighter<F>(&self, key: &str, hotkey: Option<KeybindList>, highlighter: F)
    where
        F: Fn(&Building) -> Option<BuildingHighlight> + 'static,
    {
        self.buildings.add(
            key,
            Category::external(key),
            hotkey.unwrap_or_default(),
            Rc::new(highlighter),
        );
    }

    /// Highlight placed and held items the callback accepts, by item name
    pub fn add_item_range_highlighter<F>(&self, key: &str, hotkey: Option<KeybindList>, highlighter: F)
    where
        F: Fn(&str) -> Option<ItemHighlight> + 'static,
    {
        self.items.add(
            key,
            Category::external(key),
            hotkey.unwrap_or_default(),
            Rc::new(highlighter),
        );
    }

    pub fn remove_building_range_highlighter(&self, key: &str) {
        self.buildings.remove(key);
    }

    pub fn remove_item_range_highlighter(&self, key: &str) {
        self.items.remove(key);
    }
}
