//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use range_highlight::composite::CompositeMap;
use range_highlight::render::RenderSink;
use range_highlight::world::{Building, PlacedItem, TilePos, WorldQuery};

pub const TICK: Duration = Duration::from_millis(16);

/// In-memory world built up by tests
#[derive(Debug, Default, Clone)]
pub struct TestWorld {
    pub buildings: Vec<Building>,
    pub items: Vec<PlacedItem>,
    pub bombs: Vec<PlacedItem>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_building(mut self, kind: &str, x: i32, y: i32) -> Self {
        self.buildings.push(Building::new(kind, TilePos::new(x, y), 2, 2));
        self
    }

    pub fn with_item(mut self, name: &str, x: i32, y: i32) -> Self {
        self.items.push(PlacedItem::new(name, TilePos::new(x, y)));
        self
    }

    pub fn with_ticking_bomb(mut self, name: &str, x: i32, y: i32) -> Self {
        self.bombs.push(PlacedItem::new(name, TilePos::new(x, y)));
        self
    }
}

impl WorldQuery for TestWorld {
    fn buildings(&self) -> Vec<Building> {
        self.buildings.clone()
    }

    fn placed_items(&self) -> Vec<PlacedItem> {
        self.items.clone()
    }

    fn ticking_bombs(&self) -> Vec<PlacedItem> {
        self.bombs.clone()
    }
}

/// Sink that keeps every presented map
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub frames: Rc<RefCell<Vec<CompositeMap>>>,
}

impl RecordingSink {
    pub fn count(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn last(&self) -> Option<CompositeMap> {
        self.frames.borrow().last().cloned()
    }
}

impl RenderSink for RecordingSink {
    fn present(&mut self, map: &CompositeMap) {
        self.frames.borrow_mut().push(map.clone());
    }
}

/// Sorted covered tiles as (x, y) pairs
pub fn covered(map: &CompositeMap) -> Vec<(i32, i32)> {
    map.tiles().map(|t| (t.x, t.y)).collect()
}
