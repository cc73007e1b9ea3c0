//! Gridcast - animated portfolio backgrounds with a raycasting core
//!
//! Core modules:
//! - `sim`: Deterministic raycasting world (grid map, player, DDA caster, collision)
//! - `renderer`: WebGPU rendering (wall strips + fullscreen pattern shaders)
//! - `session`: Simulation selection and explicit start/stop lifecycle
//! - `settings`: User preferences persisted to LocalStorage

pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::{Session, SimulationKind};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth movement)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World units per map cell
    pub const CELL_SIZE: f32 = 64.0;
    /// Wall height in cells (scales the projected strip height)
    pub const WALL_HEIGHT: f32 = 1.0;
    /// Hit distance floor in cells, keeps perspective division finite
    pub const MIN_HIT_DISTANCE: f32 = 0.001;

    /// Player defaults
    pub const MOVE_SPEED: f32 = 150.0;
    pub const TURN_SPEED: f32 = 3.0;
    pub const PLAYER_RADIUS: f32 = 16.0;

    /// View defaults
    pub const DEFAULT_FOV_DEGREES: f32 = 60.0;
    pub const DEFAULT_DRAW_CELLS: f32 = 20.0;

    /// Radians per pixel of pointer travel, per unit of turn speed
    pub const MOUSE_TURN_SCALE: f32 = 0.001;
}

/// Rotate a vector by an angle in radians
#[inline]
pub fn rotate_vec(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}
