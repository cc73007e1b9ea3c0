//! Player collision against the grid
//!
//! The player is a circle tested against solid cells with a conservative
//! bounding-box sample: every cell the circle's box overlaps must be empty
//! for a position to stand. Movement resolves per axis, so a blocked axis
//! cancels while the other keeps sliding.

use glam::Vec2;

use crate::sim::map::GridMap;

/// True when any cell under the circle's bounding box is solid
///
/// Out-of-bounds cells read as solid, so the map edge behaves like a wall.
pub fn circle_overlaps_solid(map: &GridMap, pos: Vec2, radius: f32) -> bool {
    let (min_x, min_y) = map.cell_of(pos - Vec2::splat(radius));
    let (max_x, max_y) = map.cell_of(pos + Vec2::splat(radius));
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            if map.is_solid(x, y) {
                return true;
            }
        }
    }
    false
}

/// Resolve a candidate displacement against the walls
///
/// Axis-separated: X is tried first, Y from wherever X landed. A blocked
/// axis keeps its previous coordinate, which is what makes wall sliding
/// work. Always returns a position; an already-valid start can at worst
/// stay where it is.
pub fn resolve_movement(map: &GridMap, from: Vec2, delta: Vec2, radius: f32) -> Vec2 {
    let mut pos = from;

    let try_x = Vec2::new(from.x + delta.x, from.y);
    if !circle_overlaps_solid(map, try_x, radius) {
        pos.x = try_x.x;
    }

    let try_y = Vec2::new(pos.x, from.y + delta.y);
    if !circle_overlaps_solid(map, try_y, radius) {
        pos.y = try_y.y;
    }

    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ring() -> GridMap {
        GridMap::bordered(10, 10, 64.0, 1).unwrap()
    }

    #[test]
    fn test_free_movement_unclamped() {
        let map = ring();
        let from = Vec2::new(300.0, 300.0);
        let to = resolve_movement(&map, from, Vec2::new(20.0, -15.0), 16.0);
        assert_eq!(to, Vec2::new(320.0, 285.0));
    }

    #[test]
    fn test_idempotent_on_valid_position() {
        let map = ring();
        let pos = Vec2::new(300.0, 300.0);
        let once = resolve_movement(&map, pos, Vec2::ZERO, 16.0);
        let twice = resolve_movement(&map, once, Vec2::ZERO, 16.0);
        assert_eq!(once, pos);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_slide_preserves_y_when_x_blocked() {
        let map = ring();
        // Just shy of the east wall face at x = 576
        let from = Vec2::new(559.0, 352.0);
        let to = resolve_movement(&map, from, Vec2::new(10.0, 5.0), 16.0);
        assert_eq!(to.x, from.x);
        assert_eq!(to.y, 357.0);
    }

    #[test]
    fn test_pure_x_drive_clamps_x_only() {
        let map = ring();
        let from = Vec2::new(559.0, 352.0);
        // Pure X intent into the wall, concurrent Y intent alongside
        let to = resolve_movement(&map, from, Vec2::new(40.0, 7.0), 16.0);
        assert_eq!(to.x, from.x);
        assert_eq!(to.y, 359.0);
    }

    #[test]
    fn test_corner_blocks_both_axes() {
        let map = ring();
        // Near the north-east inside corner
        let from = Vec2::new(559.0, 81.0);
        let to = resolve_movement(&map, from, Vec2::new(30.0, -30.0), 16.0);
        assert_eq!(to, from);
    }

    #[test]
    fn test_overlap_detects_border() {
        let map = ring();
        assert!(circle_overlaps_solid(&map, Vec2::new(70.0, 300.0), 16.0));
        assert!(!circle_overlaps_solid(&map, Vec2::new(300.0, 300.0), 16.0));
        // Touching the wall face exactly counts as overlap
        assert!(circle_overlaps_solid(&map, Vec2::new(560.0, 300.0), 16.0));
    }

    proptest! {
        #[test]
        fn prop_resolution_never_ends_in_wall(
            x in 81.0_f32..559.0,
            y in 81.0_f32..559.0,
            dx in -300.0_f32..300.0,
            dy in -300.0_f32..300.0,
        ) {
            let map = ring();
            let from = Vec2::new(x, y);
            prop_assume!(!circle_overlaps_solid(&map, from, 16.0));

            let to = resolve_movement(&map, from, Vec2::new(dx, dy), 16.0);
            prop_assert!(!circle_overlaps_solid(&map, to, 16.0));

            // Settled positions stay put
            let again = resolve_movement(&map, to, Vec2::ZERO, 16.0);
            prop_assert_eq!(again, to);
        }
    }
}
