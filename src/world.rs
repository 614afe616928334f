//! World-side types consumed by the engine
//!
//! The host game owns the real world data. The engine only sees it through
//! [`WorldQuery`], which lists what is placed in the current location.

use serde::{Deserialize, Serialize};

use crate::shape::Mask;

/// Absolute tile coordinate in the current location
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl From<(i32, i32)> for TilePos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Size of the current location in tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub width: u32,
    pub height: u32,
}

impl GridBounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn contains(&self, tile: TilePos) -> bool {
        tile.x >= 0 && tile.y >= 0 && (tile.x as u32) < self.width && (tile.y as u32) < self.height
    }
}

/// A placed building: its type name and axis-aligned footprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub kind: String,
    /// Top-left tile of the footprint
    pub tile: TilePos,
    #[serde(default = "one")]
    pub width: u32,
    #[serde(default = "one")]
    pub height: u32,
}

fn one() -> u32 {
    1
}

impl Building {
    pub fn new(kind: impl Into<String>, tile: TilePos, width: u32, height: u32) -> Self {
        Self {
            kind: kind.into(),
            tile,
            width,
            height,
        }
    }

    /// True if `tile` lies within the footprint
    pub fn occupies(&self, tile: TilePos) -> bool {
        let dx = tile.x as i64 - self.tile.x as i64;
        let dy = tile.y as i64 - self.tile.y as i64;
        dx >= 0 && dy >= 0 && dx < self.width as i64 && dy < self.height as i64
    }
}

/// A placed object, identified by its item name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub name: String,
    pub tile: TilePos,
}

impl PlacedItem {
    pub fn new(name: impl Into<String>, tile: TilePos) -> Self {
        Self {
            name: name.into(),
            tile,
        }
    }
}

/// Read access to the current location.
///
/// Implemented by the host; [`crate::scene::Scene`] is a data-backed version.
pub trait WorldQuery {
    /// Location size, when known. Tiles outside are not drawn.
    fn bounds(&self) -> Option<GridBounds> {
        None
    }

    fn buildings(&self) -> Vec<Building>;

    fn placed_items(&self) -> Vec<PlacedItem>;

    /// Bombs whose fuse is currently burning
    fn ticking_bombs(&self) -> Vec<PlacedItem>;

    /// Coverage an object reports for itself, if any (e.g. modded sprinklers).
    /// The mask is centred on the object's tile.
    fn sprinkler_coverage(&self, _item: &PlacedItem) -> Option<Mask> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains() {
        let bounds = GridBounds::new(10, 5);
        assert!(bounds.contains(TilePos::new(0, 0)));
        assert!(bounds.contains(TilePos::new(9, 4)));
        assert!(!bounds.contains(TilePos::new(10, 4)));
        assert!(!bounds.contains(TilePos::new(-1, 0)));
    }

    #[test]
    fn test_building_occupies_footprint() {
        let hut = Building::new("Junimo Hut", TilePos::new(4, 4), 3, 2);
        assert!(hut.occupies(TilePos::new(4, 4)));
        assert!(hut.occupies(TilePos::new(6, 5)));
        assert!(!hut.occupies(TilePos::new(7, 5)));
        assert!(!hut.occupies(TilePos::new(4, 6)));
        assert!(!hut.occupies(TilePos::new(3, 4)));
    }
}
