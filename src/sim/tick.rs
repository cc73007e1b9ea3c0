//! Fixed timestep simulation tick
//!
//! Translates held keys and pointer travel into player movement, resolved
//! against the map every step.

use glam::Vec2;

use crate::consts;
use crate::sim::collision::resolve_movement;
use crate::sim::state::World;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Pointer lock held; movement only applies while true
    pub active: bool,
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    /// Accumulated horizontal pointer travel in pixels. One-shot: the
    /// session clears it after the first substep of a frame.
    pub turn_pixels: f32,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &FrameInput, dt: f32) {
    world.time_ticks += 1;

    if !input.active {
        return;
    }

    let World { map, player, .. } = world;

    if input.turn_pixels != 0.0 {
        player.rotate(player.turn_speed * input.turn_pixels * consts::MOUSE_TURN_SCALE);
    }

    // Pressed axes add up; diagonals intentionally run faster than the
    // configured speed, preserving the original movement feel
    let mut heading = Vec2::ZERO;
    if input.forward {
        heading += player.dir;
    }
    if input.backward {
        heading -= player.dir;
    }
    if input.strafe_right {
        heading += player.dir.perp();
    }
    if input.strafe_left {
        heading -= player.dir.perp();
    }

    if heading != Vec2::ZERO {
        let step = heading * player.move_speed * dt;
        player.pos = resolve_movement(map, player.pos, step, player.radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::map::GridMap;
    use crate::sim::state::WorldConfig;

    fn open_world() -> World {
        let map = GridMap::bordered(20, 20, 64.0, 1).unwrap();
        let spawn = map.world_size() * 0.5;
        World::new(map, spawn, Vec2::X, WorldConfig::default())
    }

    #[test]
    fn test_forward_displacement() {
        let mut world = open_world();
        let start = world.player.pos;
        let input = FrameInput {
            active: true,
            forward: true,
            ..Default::default()
        };
        tick(&mut world, &input, SIM_DT);
        let moved = world.player.pos - start;
        let expected = world.player.move_speed * SIM_DT;
        assert!((moved.length() - expected).abs() < 1e-4);
        assert!(moved.y.abs() < 1e-6);
        assert_eq!(world.time_ticks, 1);
    }

    #[test]
    fn test_diagonal_is_not_normalized() {
        let mut world = open_world();
        let start = world.player.pos;
        let input = FrameInput {
            active: true,
            forward: true,
            strafe_right: true,
            ..Default::default()
        };
        tick(&mut world, &input, SIM_DT);
        let moved = (world.player.pos - start).length();
        let expected = std::f32::consts::SQRT_2 * world.player.move_speed * SIM_DT;
        assert!((moved - expected).abs() < 1e-4);
    }

    #[test]
    fn test_opposed_keys_cancel() {
        let mut world = open_world();
        let start = world.player.pos;
        let input = FrameInput {
            active: true,
            forward: true,
            backward: true,
            ..Default::default()
        };
        tick(&mut world, &input, SIM_DT);
        assert_eq!(world.player.pos, start);
    }

    #[test]
    fn test_inactive_input_moves_nothing() {
        let mut world = open_world();
        let start = world.player.pos;
        let input = FrameInput {
            forward: true,
            turn_pixels: 50.0,
            ..Default::default()
        };
        tick(&mut world, &input, SIM_DT);
        assert_eq!(world.player.pos, start);
        assert_eq!(world.player.dir, Vec2::X);
        // The clock still runs while idle
        assert_eq!(world.time_ticks, 1);
    }

    #[test]
    fn test_mouse_turn_scale() {
        let mut world = open_world();
        let input = FrameInput {
            active: true,
            turn_pixels: 100.0,
            ..Default::default()
        };
        tick(&mut world, &input, SIM_DT);
        let expected = world.player.turn_speed * 100.0 * consts::MOUSE_TURN_SCALE;
        let angle = world.player.dir.y.atan2(world.player.dir.x);
        assert!((angle - expected).abs() < 1e-5);
        assert!((world.player.dir.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_wall_press_stays_out() {
        let mut world = open_world();
        let input = FrameInput {
            active: true,
            forward: true,
            ..Default::default()
        };
        // Several seconds of driving east into the border
        for _ in 0..1200 {
            tick(&mut world, &input, SIM_DT);
        }
        let wall_face = 19.0 * 64.0;
        assert!(world.player.pos.x + world.player.radius <= wall_face);
        assert!(!crate::sim::collision::circle_overlaps_solid(
            &world.map,
            world.player.pos,
            world.player.radius,
        ));
    }

    #[test]
    fn test_determinism() {
        let mut a = World::demo_arena();
        let mut b = World::demo_arena();
        let input = FrameInput {
            active: true,
            forward: true,
            strafe_left: true,
            turn_pixels: 3.0,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.player.dir, b.player.dir);
        assert_eq!(a.time_ticks, b.time_ticks);
    }
}
