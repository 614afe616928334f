//! Disc-shaped tile masks
//!
//! A [`Mask`] is a square grid of odd side `2r+1` centred on `(r, r)`.
//! Cells are addressed `(i, j)` where `i` runs along the x axis and `j`
//! along the y axis, so a mask anchored at tile `(x, y)` covers tile
//! `(x + i - r, y + j - r)` wherever cell `(i, j)` is set.

use std::fmt;

/// How the distance between two grid cells is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceMetric {
    /// Euclidean norm truncated toward zero
    Cartesian,
    /// `|dx| + |dy|`
    Manhattan,
    /// `max(|dx|, |dy|)`, a square
    Chebyshev,
}

impl DistanceMetric {
    /// Distance for absolute offsets `dx`, `dy`
    #[inline]
    pub fn distance(self, dx: u32, dy: u32) -> u32 {
        match self {
            DistanceMetric::Cartesian => {
                let sq = dx as f64 * dx as f64 + dy as f64 * dy as f64;
                // Truncated, not rounded
                sq.sqrt().trunc() as u32
            }
            DistanceMetric::Manhattan => dx + dy,
            DistanceMetric::Chebyshev => dx.max(dy),
        }
    }
}

/// Errors produced at the shape boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// A negative radius was requested
    InvalidArgument(String),
    /// Hand-built mask data does not describe an odd-sided square
    Malformed(String),
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::InvalidArgument(e) => write!(f, "Invalid argument: {}", e),
            ShapeError::Malformed(e) => write!(f, "Malformed mask: {}", e),
        }
    }
}

impl std::error::Error for ShapeError {}

/// Square boolean occupancy grid of side `2r+1`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mask {
    radius: u32,
    side: usize,
    cells: Vec<bool>,
}

impl Mask {
    /// Build a mask from a flat row-major buffer (`cells[j * side + i]`)
    pub fn from_cells(side: usize, cells: Vec<bool>) -> Result<Self, ShapeError> {
        if side == 0 || side % 2 == 0 {
            return Err(ShapeError::Malformed(format!(
                "side length must be odd, got {}",
                side
            )));
        }
        if cells.len() != side * side {
            return Err(ShapeError::Malformed(format!(
                "expected {} cells for side {}, got {}",
                side * side,
                side,
                cells.len()
            )));
        }
        Ok(Self {
            radius: (side / 2) as u32,
            side,
            cells,
        })
    }

    /// Build a mask from rows; `rows[j][i]` is cell `(i, j)`
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self, ShapeError> {
        let side = rows.len();
        let mut cells = Vec::with_capacity(side * side);
        for (j, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != side {
                return Err(ShapeError::Malformed(format!(
                    "row {} has {} cells, expected {}",
                    j,
                    row.len(),
                    side
                )));
            }
            cells.extend_from_slice(row);
        }
        Self::from_cells(side, cells)
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Cell at grid position `(i, j)`; out of range reads as uncovered
    #[inline]
    pub fn cell(&self, i: usize, j: usize) -> bool {
        if i >= self.side || j >= self.side {
            return false;
        }
        self.cells[j * self.side + i]
    }

    /// Cell at offset `(dx, dy)` from the centre
    pub fn get(&self, dx: i32, dy: i32) -> bool {
        let r = self.radius as i64;
        let (i, j) = (dx as i64 + r, dy as i64 + r);
        if i < 0 || j < 0 {
            return false;
        }
        self.cell(i as usize, j as usize)
    }

    /// Number of covered cells
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Offsets `(dx, dy)` from the centre of every covered cell, row by row
    pub fn covered_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let r = self.radius as i32;
        let side = self.side;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, covered)| **covered)
            .map(move |(idx, _)| ((idx % side) as i32 - r, (idx / side) as i32 - r))
    }

    /// True if every covered cell of `self` is also covered in `other`
    pub fn is_subset_of(&self, other: &Mask) -> bool {
        self.covered_offsets().all(|(dx, dy)| other.get(dx, dy))
    }

    /// Cells of `self` not covered by `other`, both aligned on their centres
    pub fn difference(&self, other: &Mask) -> Mask {
        let r = self.radius as i32;
        let mut cells = self.cells.clone();
        for (idx, cell) in cells.iter_mut().enumerate() {
            let dx = (idx % self.side) as i32 - r;
            let dy = (idx / self.side) as i32 - r;
            if *cell && other.get(dx, dy) {
                *cell = false;
            }
        }
        Mask {
            radius: self.radius,
            side: self.side,
            cells,
        }
    }
}

/// Generate a disc of `radius` under `metric`.
///
/// Fails with [`ShapeError::InvalidArgument`] for a negative radius. A zero
/// radius is a single cell, which `exclude_center` clears.
pub fn generate(radius: i32, metric: DistanceMetric, exclude_center: bool) -> Result<Mask, ShapeError> {
    if radius < 0 {
        return Err(ShapeError::InvalidArgument(format!(
            "radius must be non-negative, got {}",
            radius
        )));
    }
    Ok(disc(radius as u32, metric, exclude_center))
}

fn disc(radius: u32, metric: DistanceMetric, exclude_center: bool) -> Mask {
    let r = radius as usize;
    let side = 2 * r + 1;
    let mut cells = vec![false; side * side];

    for j in 0..side {
        for i in 0..side {
            let dx = r.abs_diff(i) as u32;
            let dy = r.abs_diff(j) as u32;
            cells[j * side + i] = metric.distance(dx, dy) <= radius;
        }
    }

    if exclude_center {
        cells[r * side + r] = false;
    }

    Mask {
        radius,
        side,
        cells,
    }
}

/// Euclidean disc (distance truncated before comparison)
pub fn cartesian_disc(radius: u32, exclude_center: bool) -> Mask {
    disc(radius, DistanceMetric::Cartesian, exclude_center)
}

/// Diamond of cells with `|dx| + |dy| <= radius`
pub fn manhattan_disc(radius: u32, exclude_center: bool) -> Mask {
    disc(radius, DistanceMetric::Manhattan, exclude_center)
}

/// Full `(2r+1)x(2r+1)` square
pub fn chebyshev_disc(radius: u32, exclude_center: bool) -> Mask {
    disc(radius, DistanceMetric::Chebyshev, exclude_center)
}
