//! Grid map representation
//!
//! A static 2D grid of cell codes: 0 = empty, 1-4 = wall materials.
//! Out-of-bounds lookups read as solid, so ray traversal and collision
//! checks never need edge special cases.

use glam::Vec2;

/// Cell code reported for out-of-bounds lookups
pub const OUT_OF_BOUNDS_CELL: u8 = 1;

/// Construction-time map failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// No rows, or rows with no cells
    Empty,
    /// A row's length differs from the first row's
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Cell size must be finite and positive
    BadCellSize,
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::Empty => write!(f, "map has no cells"),
            MapError::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
            MapError::BadCellSize => write!(f, "cell size must be finite and positive"),
        }
    }
}

impl std::error::Error for MapError {}

/// A static grid of wall cells, immutable after construction
#[derive(Debug, Clone)]
pub struct GridMap {
    width: u32,
    height: u32,
    cell_size: f32,
    cells: Vec<u8>,
}

impl GridMap {
    /// Build a map from rows of cell codes
    ///
    /// Fatal if the rows are empty or their lengths disagree; there is no
    /// mid-session recovery from a malformed map.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R], cell_size: f32) -> Result<Self, MapError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(MapError::BadCellSize);
        }
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if width == 0 {
            return Err(MapError::Empty);
        }
        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != width {
                return Err(MapError::RaggedRow {
                    row,
                    expected: width,
                    found: r.len(),
                });
            }
            cells.extend_from_slice(r);
        }
        Ok(Self {
            width: width as u32,
            height: rows.len() as u32,
            cell_size,
            cells,
        })
    }

    /// Build an empty map ringed by a border of the given wall code
    pub fn bordered(width: u32, height: u32, cell_size: f32, code: u8) -> Result<Self, MapError> {
        let mut rows = Vec::with_capacity(height as usize);
        for y in 0..height {
            let mut row = vec![0u8; width as usize];
            if y == 0 || y + 1 == height {
                row.fill(code);
            } else if width > 0 {
                row[0] = code;
                row[width as usize - 1] = code;
            }
            rows.push(row);
        }
        Self::from_rows(&rows, cell_size)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// World units per cell
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World-space extent of the whole grid
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.cell_size,
            self.height as f32 * self.cell_size,
        )
    }

    /// Cell code at integer cell coordinates; out of bounds reads as solid
    #[inline]
    pub fn cell_at(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return OUT_OF_BOUNDS_CELL;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// True when the cell holds any wall material
    #[inline]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.cell_at(x, y) != 0
    }

    /// Cell coordinates containing a world position
    #[inline]
    pub fn cell_of(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }
}
