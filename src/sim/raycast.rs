//! DDA ray casting over the grid map
//!
//! One ray per screen column, traversed in cell space with the classic
//! two-axis side-distance walk. Distances are reported perpendicular to
//! the view plane so wall strips stay straight across the screen.

use crate::consts;
use crate::rotate_vec;

use crate::sim::state::World;

/// Which grid line the ray crossed last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// A vertical grid line (the traversal stepped along x)
    Vertical,
    /// A horizontal grid line (the traversal stepped along y)
    Horizontal,
}

/// A wall intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    /// Perpendicular wall distance in world units, floored to a small
    /// positive epsilon so perspective division stays finite
    pub distance: f32,
    /// Material code of the struck cell (1-4)
    pub cell: u8,
    /// Grid line orientation at the hit, for shading variation
    pub side: Side,
}

/// One cast column, recomputed every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub column: u32,
    /// None when no wall lies within the draw distance; the renderer
    /// skips the column
    pub hit: Option<WallHit>,
}

/// Cast one ray per screen column across the field of view
///
/// Column 0 looks along the left edge of the view, the last column along
/// the right edge; a single column casts dead ahead. Pure function of the
/// world; the caller keeps `player.dir` normalized.
pub fn cast_rays(world: &World, columns: u32) -> Vec<Ray> {
    debug_assert!(world.player.dir.is_normalized());
    (0..columns)
        .map(|column| Ray {
            column,
            hit: cast_single(world, column_offset(world.fov, column, columns)),
        })
        .collect()
}

/// Angular offset of a column from the view center
#[inline]
pub fn column_offset(fov: f32, column: u32, columns: u32) -> f32 {
    if columns <= 1 {
        return 0.0;
    }
    fov * (column as f32 / (columns - 1) as f32 - 0.5)
}

/// Cast a single ray at an angular offset from the look direction
pub fn cast_single(world: &World, offset: f32) -> Option<WallHit> {
    let map = &world.map;
    let cell_size = map.cell_size();
    let dir = rotate_vec(world.player.dir, offset);

    // Traverse in cell units, convert back to world units on hit
    let origin = world.player.pos / cell_size;
    let draw_cells = world.draw_distance / cell_size;

    let mut cell_x = origin.x.floor() as i32;
    let mut cell_y = origin.y.floor() as i32;

    // A solid starting cell is an immediate hit at the epsilon floor
    let start = map.cell_at(cell_x, cell_y);
    if start != 0 {
        return Some(WallHit {
            distance: consts::MIN_HIT_DISTANCE * cell_size,
            cell: start,
            side: Side::Vertical,
        });
    }

    let delta_x = if dir.x == 0.0 {
        f32::INFINITY
    } else {
        (1.0 / dir.x).abs()
    };
    let delta_y = if dir.y == 0.0 {
        f32::INFINITY
    } else {
        (1.0 / dir.y).abs()
    };

    let (step_x, mut side_x) = if dir.x < 0.0 {
        (-1, (origin.x - cell_x as f32) * delta_x)
    } else {
        (1, (cell_x as f32 + 1.0 - origin.x) * delta_x)
    };
    let (step_y, mut side_y) = if dir.y < 0.0 {
        (-1, (origin.y - cell_y as f32) * delta_y)
    } else {
        (1, (cell_y as f32 + 1.0 - origin.y) * delta_y)
    };

    // The cap only guards degenerate directions; the distance check is
    // what normally ends the walk
    let max_steps = draw_cells.ceil() as u32 * 2 + 4;
    for _ in 0..max_steps {
        // Step whichever axis crosses its next grid line sooner
        let (crossing, side) = if side_x < side_y {
            let crossing = side_x;
            side_x += delta_x;
            cell_x += step_x;
            (crossing, Side::Vertical)
        } else {
            let crossing = side_y;
            side_y += delta_y;
            cell_y += step_y;
            (crossing, Side::Horizontal)
        };
        if crossing > draw_cells {
            return None;
        }
        let cell = map.cell_at(cell_x, cell_y);
        if cell != 0 {
            // Perpendicular distance flattens the fisheye curve
            let perp = crossing * offset.cos();
            return Some(WallHit {
                distance: perp.max(consts::MIN_HIT_DISTANCE) * cell_size,
                cell,
                side,
            });
        }
    }
    None
}
