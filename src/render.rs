//! Render sinks
//!
//! The engine hands each finished [`CompositeMap`] to a [`RenderSink`].
//! [`RasterSink`] paints the map into an ARGB framebuffer, one square of
//! `tile_size` pixels per tile, alpha blended over a background.

use std::io::{self, Write};

use crate::category::Category;
use crate::color::Color;
use crate::composite::CompositeMap;
use crate::world::{GridBounds, TilePos};

/// Receives the composited overlay once per refresh
pub trait RenderSink {
    fn present(&mut self, map: &CompositeMap);
}

impl<F: FnMut(&CompositeMap)> RenderSink for F {
    fn present(&mut self, map: &CompositeMap) {
        self(map)
    }
}

/// Discards every map
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn present(&mut self, _map: &CompositeMap) {}
}

/// Blend a source pixel (with alpha) onto an opaque destination pixel.
///
/// Both colors are in ARGB format. The result is opaque.
#[inline]
pub fn blend_pixel(src: u32, dst: u32) -> u32 {
    let alpha = (src >> 24) & 0xFF;
    if alpha == 0 {
        return dst;
    }
    if alpha == 255 {
        return src | 0xFF000000;
    }

    let inv_alpha = 255 - alpha;

    let r = ((((src >> 16) & 0xFF) * alpha + ((dst >> 16) & 0xFF) * inv_alpha) / 255) & 0xFF;
    let g = ((((src >> 8) & 0xFF) * alpha + ((dst >> 8) & 0xFF) * inv_alpha) / 255) & 0xFF;
    let b = (((src & 0xFF) * alpha + (dst & 0xFF) * inv_alpha) / 255) & 0xFF;

    0xFF000000 | (r << 16) | (g << 8) | b
}

/// Software framebuffer covering a rectangle of tiles
#[derive(Debug, Clone)]
pub struct RasterSink {
    /// Tile drawn at pixel (0, 0)
    origin: TilePos,
    columns: usize,
    rows: usize,
    tile_size: usize,
    background: u32,
    /// Grid line color in ARGB; `None` draws no grid
    grid: Option<u32>,
    buffer: Vec<u32>,
    frames: u64,
}

impl RasterSink {
    pub fn new(origin: TilePos, columns: usize, rows: usize, tile_size: usize) -> Self {
        let tile_size = tile_size.max(1);
        let background = 0xFF_3A_5F_2B; // grass green
        Self {
            origin,
            columns,
            rows,
            tile_size,
            background,
            grid: None,
            buffer: vec![background; columns * rows * tile_size * tile_size],
            frames: 0,
        }
    }

    /// Framebuffer for a whole location
    pub fn for_bounds(bounds: GridBounds, tile_size: usize) -> Self {
        Self::new(
            TilePos::new(0, 0),
            bounds.width as usize,
            bounds.height as usize,
            tile_size,
        )
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background.with_alpha(255).to_argb_u32();
        self.buffer.fill(self.background);
        self
    }

    pub fn with_grid(mut self, grid: Color) -> Self {
        self.grid = Some(grid.to_argb_u32());
        self
    }

    pub fn width(&self) -> usize {
        self.columns * self.tile_size
    }

    pub fn height(&self) -> usize {
        self.rows * self.tile_size
    }

    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }

    /// Number of maps presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// ARGB pixel at `(px, py)`
    pub fn pixel(&self, px: usize, py: usize) -> Option<u32> {
        if px >= self.width() || py >= self.height() {
            return None;
        }
        self.buffer.get(py * self.width() + px).copied()
    }

    /// Top-left pixel of `tile`, if it is inside the framebuffer
    pub fn tile_origin(&self, tile: TilePos) -> Option<(usize, usize)> {
        let col = tile.x as i64 - self.origin.x as i64;
        let row = tile.y as i64 - self.origin.y as i64;
        if col < 0 || row < 0 || col >= self.columns as i64 || row >= self.rows as i64 {
            return None;
        }
        Some((col as usize * self.tile_size, row as usize * self.tile_size))
    }

    fn fill_tile(&mut self, tile: TilePos, argb: u32) {
        let Some((x0, y0)) = self.tile_origin(tile) else {
            return;
        };
        let width = self.width();
        for py in y0..y0 + self.tile_size {
            for px in x0..x0 + self.tile_size {
                let idx = py * width + px;
                if idx < self.buffer.len() {
                    self.buffer[idx] = blend_pixel(argb, self.buffer[idx]);
                }
            }
        }
    }

    fn draw_grid(&mut self, color: u32) {
        let width = self.width();
        let height = self.height();
        for py in (0..height).step_by(self.tile_size) {
            for px in 0..width {
                self.buffer[py * width + px] = blend_pixel(color, self.buffer[py * width + px]);
            }
        }
        for px in (0..width).step_by(self.tile_size) {
            for py in 0..height {
                self.buffer[py * width + px] = blend_pixel(color, self.buffer[py * width + px]);
            }
        }
    }

    /// Write the framebuffer as a binary PPM (P6) image
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width(), self.height())?;
        let mut bytes = Vec::with_capacity(self.buffer.len() * 3);
        for argb in &self.buffer {
            bytes.push((argb >> 16) as u8);
            bytes.push((argb >> 8) as u8);
            bytes.push(*argb as u8);
        }
        out.write_all(&bytes)
    }
}

impl RenderSink for RasterSink {
    fn present(&mut self, map: &CompositeMap) {
        self.buffer.fill(self.background);
        for (tile, cell) in map.iter() {
            self.fill_tile(tile, cell.color.to_argb_u32());
        }
        if let Some(grid) = self.grid {
            self.draw_grid(grid);
        }
        self.frames += 1;
    }
}

/// Character for a tile in the ASCII view
fn tile_char(map: &CompositeMap, tile: TilePos) -> char {
    if map.get(tile).is_none() {
        return '.';
    }
    if map.is_overlap(tile) {
        return '*';
    }
    match map.category(tile) {
        Some(Category::Junimo) => 'J',
        Some(Category::Sprinkler) => 'S',
        Some(Category::Scarecrow) => 'C',
        Some(Category::Beehouse) => 'B',
        Some(Category::MushroomLog) => 'M',
        Some(Category::Bomb) => 'X',
        Some(Category::External(_)) | None => '#',
    }
}

/// Render `rows` lines of `columns` tiles starting at `origin`.
///
/// Uncovered tiles are `.`, overlaps `*`, and covered tiles a letter per
/// category (`#` for plugin categories).
pub fn ascii_grid(map: &CompositeMap, origin: TilePos, columns: usize, rows: usize) -> String {
    let mut out = String::with_capacity((columns + 1) * rows);
    for row in 0..rows as i32 {
        for col in 0..columns as i32 {
            out.push(tile_char(map, origin.offset(col, row)));
        }
        out.push('\n');
    }
    out
}
