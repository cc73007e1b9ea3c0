//! Deterministic raycasting world
//!
//! All world logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Total functions; the only fallible seam is map construction
//! - No rendering or platform dependencies

pub mod collision;
pub mod map;
pub mod raycast;
pub mod state;
pub mod tick;

pub use collision::{circle_overlaps_solid, resolve_movement};
pub use map::{GridMap, MapError};
pub use raycast::{Ray, Side, WallHit, cast_rays, cast_single};
pub use state::{Player, ViewPose, World, WorldConfig};
pub use tick::{FrameInput, tick};
