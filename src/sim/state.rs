//! World state: the player body and the view parameters the caster reads

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts;
use crate::rotate_vec;
use crate::sim::collision;
use crate::sim::map::GridMap;

/// The first-person camera body
#[derive(Debug, Clone)]
pub struct Player {
    /// Position in world units
    pub pos: Vec2,
    /// Unit look direction
    pub dir: Vec2,
    /// Collision radius in world units
    pub radius: f32,
    /// Movement speed in world units per second
    pub move_speed: f32,
    /// Turn rate, scaled by pointer travel
    pub turn_speed: f32,
}

impl Player {
    pub fn new(pos: Vec2, dir: Vec2) -> Self {
        Self {
            pos,
            dir: dir.normalize_or(Vec2::X),
            radius: consts::PLAYER_RADIUS,
            move_speed: consts::MOVE_SPEED,
            turn_speed: consts::TURN_SPEED,
        }
    }

    /// Rotate the look direction, re-normalizing so repeated turns never drift
    pub fn rotate(&mut self, angle: f32) {
        self.dir = rotate_vec(self.dir, angle).normalize_or(Vec2::X);
    }
}

/// Tunable world parameters
#[derive(Debug, Clone, Copy)]
pub struct WorldConfig {
    /// Horizontal field of view in radians
    pub fov: f32,
    /// Maximum wall distance in world units
    pub draw_distance: f32,
    pub move_speed: f32,
    pub turn_speed: f32,
    pub radius: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            fov: consts::DEFAULT_FOV_DEGREES.to_radians(),
            draw_distance: consts::DEFAULT_DRAW_CELLS * consts::CELL_SIZE,
            move_speed: consts::MOVE_SPEED,
            turn_speed: consts::TURN_SPEED,
            radius: consts::PLAYER_RADIUS,
        }
    }
}

/// Camera pose snapshot, persisted across reloads and surface rebuilds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewPose {
    pub pos: Vec2,
    pub dir: Vec2,
}

/// The complete raycasting world
#[derive(Debug, Clone)]
pub struct World {
    pub map: GridMap,
    pub player: Player,
    /// Horizontal field of view in radians
    pub fov: f32,
    /// Maximum wall distance in world units
    pub draw_distance: f32,
    /// Fixed ticks advanced since creation
    pub time_ticks: u64,
}

impl World {
    pub fn new(map: GridMap, spawn: Vec2, dir: Vec2, config: WorldConfig) -> Self {
        let mut player = Player::new(spawn, dir);
        player.radius = config.radius;
        player.move_speed = config.move_speed;
        player.turn_speed = config.turn_speed;
        Self {
            map,
            player,
            fov: config.fov,
            draw_distance: config.draw_distance,
            time_ticks: 0,
        }
    }

    /// The built-in demo arena: a 16x16 ring of outer walls with pillars of
    /// the other materials inside. Spawn sits at 25% of the world extent,
    /// looking east.
    pub fn demo_arena() -> Self {
        #[rustfmt::skip]
        const ROWS: [[u8; 16]; 16] = [
            [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 0, 0, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 0, 0, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 0, 0, 3, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 0, 0, 3, 3, 0, 0, 0, 0, 0, 0, 0, 4, 4, 1],
            [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 2, 2, 0, 0, 0, 0, 0, 4, 4, 0, 0, 0, 0, 1],
            [1, 0, 2, 2, 0, 0, 0, 0, 0, 4, 4, 0, 0, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 3, 3, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        ];
        // Row arrays are fixed-size, so construction cannot fail
        let map = GridMap::from_rows(&ROWS, consts::CELL_SIZE)
            .expect("demo arena rows are rectangular");
        let spawn = map.world_size() * 0.25;
        Self::new(map, spawn, Vec2::X, WorldConfig::default())
    }

    /// Snapshot the camera pose
    pub fn pose(&self) -> ViewPose {
        ViewPose {
            pos: self.player.pos,
            dir: self.player.dir,
        }
    }

    /// Restore a saved pose
    ///
    /// Rejects poses that are not finite or would embed the player in a
    /// wall, leaving the world untouched and returning false.
    pub fn apply_pose(&mut self, pose: ViewPose) -> bool {
        if !pose.pos.is_finite() || !pose.dir.is_finite() {
            return false;
        }
        let dir = pose.dir.normalize_or_zero();
        if dir == Vec2::ZERO {
            return false;
        }
        if collision::circle_overlaps_solid(&self.map, pose.pos, self.player.radius) {
            return false;
        }
        self.player.pos = pose.pos;
        self.player.dir = dir;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_arena_spawn_clear() {
        let world = World::demo_arena();
        let size = world.map.world_size();
        assert_eq!(world.player.pos, size * 0.25);
        // Every cell the player's circle could touch at spawn must be empty
        let r = world.player.radius;
        let (min_x, min_y) = world.map.cell_of(world.player.pos - Vec2::splat(r));
        let (max_x, max_y) = world.map.cell_of(world.player.pos + Vec2::splat(r));
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                assert!(!world.map.is_solid(x, y), "solid cell ({x}, {y}) at spawn");
            }
        }
    }

    #[test]
    fn test_rotate_preserves_unit_length() {
        let mut player = Player::new(Vec2::new(100.0, 100.0), Vec2::X);
        for _ in 0..10_000 {
            player.rotate(0.013);
        }
        assert!((player.dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_apply_pose_rejects_wall_embed() {
        let mut world = World::demo_arena();
        let before = world.pose();

        // Center of a border cell
        let bad = ViewPose {
            pos: Vec2::new(32.0, 32.0),
            dir: Vec2::X,
        };
        assert!(!world.apply_pose(bad));
        assert_eq!(world.pose(), before);

        assert!(!world.apply_pose(ViewPose {
            pos: Vec2::new(f32::NAN, 100.0),
            dir: Vec2::X,
        }));
        assert!(!world.apply_pose(ViewPose {
            pos: Vec2::new(200.0, 200.0),
            dir: Vec2::ZERO,
        }));
        assert_eq!(world.pose(), before);
    }

    #[test]
    fn test_pose_round_trip() {
        let mut world = World::demo_arena();
        let pose = ViewPose {
            pos: Vec2::new(300.0, 600.0),
            dir: Vec2::new(0.6, 0.8),
        };
        let json = serde_json::to_string(&pose).unwrap();
        let restored: ViewPose = serde_json::from_str(&json).unwrap();
        assert!(world.apply_pose(restored));
        assert!((world.player.pos - pose.pos).length() < 1e-6);
        assert!((world.player.dir - pose.dir).length() < 1e-6);
    }
}
