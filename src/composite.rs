//! Overlap compositing
//!
//! Merges an ordered list of tinted masks into one color per tile.
//! A tile covered once takes that contribution's tint. A tile covered two or
//! more times takes the overlap tint when overlaps are shown, otherwise the
//! tint of the last contribution covering it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::category::Category;
use crate::color::Color;
use crate::shape::Mask;
use crate::world::{GridBounds, TilePos};

/// Default color for tiles covered by two or more ranges
pub const DEFAULT_OVERLAP_TINT: Color = Color::rgba(255, 64, 64, 178);

/// One mask placed on the grid with a tint
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    /// Tile under the mask centre
    pub anchor: TilePos,
    pub mask: Mask,
    pub tint: Color,
    pub category: Category,
}

impl Contribution {
    pub fn new(anchor: TilePos, mask: Mask, tint: Color, category: Category) -> Self {
        Self {
            anchor,
            mask,
            tint,
            category,
        }
    }

    /// Absolute tiles covered by the mask
    pub fn tiles(&self) -> impl Iterator<Item = TilePos> + '_ {
        self.mask
            .covered_offsets()
            .map(move |(dx, dy)| self.anchor.offset(dx, dy))
    }
}

/// Resolved state of one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompositeCell {
    /// Color to draw
    pub color: Color,
    /// Number of contributions covering the tile
    pub count: u32,
    /// Source-over stack of every covering tint, in order
    #[serde(skip)]
    pub stacked: Color,
    /// Category of the last contribution covering the tile
    #[serde(skip)]
    pub last_category: u32,
}

/// Tile → cell map, ordered by (x, y)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeMap {
    cells: BTreeMap<TilePos, CompositeCell>,
    categories: Vec<Category>,
    /// Whether multiply covered tiles were drawn with the overlap tint
    overlaps_shown: bool,
}

impl CompositeMap {
    pub fn get(&self, tile: TilePos) -> Option<&CompositeCell> {
        self.cells.get(&tile)
    }

    /// Final color at `tile`, if covered
    pub fn color(&self, tile: TilePos) -> Option<Color> {
        self.cells.get(&tile).map(|c| c.color)
    }

    /// Category of the last contribution that covered `tile`
    pub fn category(&self, tile: TilePos) -> Option<&Category> {
        self.cells
            .get(&tile)
            .and_then(|c| self.categories.get(c.last_category as usize))
    }

    pub fn iter(&self) -> impl Iterator<Item = (TilePos, &CompositeCell)> {
        self.cells.iter().map(|(t, c)| (*t, c))
    }

    pub fn tiles(&self) -> impl Iterator<Item = TilePos> + '_ {
        self.cells.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if `tile` was covered more than once and drawn as an overlap
    pub fn is_overlap(&self, tile: TilePos) -> bool {
        self.overlaps_shown && self.cells.get(&tile).is_some_and(|c| c.count > 1)
    }

    /// Number of tiles covered more than once
    pub fn overlap_count(&self) -> usize {
        self.cells.values().filter(|c| c.count > 1).count()
    }

    /// Smallest rectangle holding every covered tile: (min, max) inclusive
    pub fn extent(&self) -> Option<(TilePos, TilePos)> {
        let mut tiles = self.cells.keys();
        let first = *tiles.next()?;
        Some(tiles.fold((first, first), |(lo, hi), t| {
            (
                TilePos::new(lo.x.min(t.x), lo.y.min(t.y)),
                TilePos::new(hi.x.max(t.x), hi.y.max(t.y)),
            )
        }))
    }

    fn category_index(&mut self, category: &Category) -> u32 {
        match self.categories.iter().position(|c| c == category) {
            Some(idx) => idx as u32,
            None => {
                self.categories.push(category.clone());
                (self.categories.len() - 1) as u32
            }
        }
    }
}

impl Serialize for CompositeMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Entry<'a> {
            x: i32,
            y: i32,
            color: Color,
            count: u32,
            category: Option<&'a str>,
        }

        serializer.collect_seq(self.cells.iter().map(|(tile, cell)| Entry {
            x: tile.x,
            y: tile.y,
            color: cell.color,
            count: cell.count,
            category: self
                .categories
                .get(cell.last_category as usize)
                .map(|c| c.name()),
        }))
    }
}

/// Compositing settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compositor {
    pub show_overlaps: bool,
    pub overlap_tint: Color,
    /// Tiles outside are dropped; negative tiles are always dropped
    pub bounds: Option<GridBounds>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            show_overlaps: true,
            overlap_tint: DEFAULT_OVERLAP_TINT,
            bounds: None,
        }
    }
}

impl Compositor {
    pub fn new(show_overlaps: bool, overlap_tint: Color) -> Self {
        Self {
            show_overlaps,
            overlap_tint,
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: Option<GridBounds>) -> Self {
        self.bounds = bounds;
        self
    }

    fn in_bounds(&self, tile: TilePos) -> bool {
        match self.bounds {
            Some(bounds) => bounds.contains(tile),
            None => tile.x >= 0 && tile.y >= 0,
        }
    }

    /// Merge contributions in order
    pub fn composite(&self, contributions: &[Contribution]) -> CompositeMap {
        let mut map = CompositeMap {
            overlaps_shown: self.show_overlaps,
            ..CompositeMap::default()
        };

        for contribution in contributions {
            let category = map.category_index(&contribution.category);
            let tint = contribution.tint;

            for tile in contribution.tiles() {
                if !self.in_bounds(tile) {
                    continue;
                }
                map.cells
                    .entry(tile)
                    .and_modify(|cell| {
                        cell.count += 1;
                        cell.stacked = tint.blend_over(cell.stacked);
                        cell.last_category = category;
                        cell.color = if self.show_overlaps {
                            self.overlap_tint
                        } else {
                            tint
                        };
                    })
                    .or_insert(CompositeCell {
                        color: tint,
                        count: 1,
                        stacked: tint,
                        last_category: category,
                    });
            }
        }

        map
    }
}

/// Composite with the default overlap tint and no bounds
pub fn composite(contributions: &[Contribution], overlaps_enabled: bool) -> CompositeMap {
    Compositor::new(overlaps_enabled, DEFAULT_OVERLAP_TINT).composite(contributions)
}
