//! Simulation selection and run lifecycle
//!
//! One `Session` owns the world, the fixed-timestep accumulator, and the
//! render state. `start`/`stop` bracket the run explicitly; dropping the
//! render state on `stop` releases the GPU pipelines and buffers.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::renderer::{RenderState, build_frame};
use crate::settings::Settings;
use crate::sim::{FrameInput, World, cast_rays, tick};

/// The available background simulations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationKind {
    /// Retro first-person raycasting demo
    Raycaster,
    /// Animated Voronoi cell pattern
    Voronoi,
    /// Flowing fBm noise field
    Fluid,
}

impl SimulationKind {
    pub const ALL: [SimulationKind; 3] = [
        SimulationKind::Raycaster,
        SimulationKind::Voronoi,
        SimulationKind::Fluid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationKind::Raycaster => "Raycaster",
            SimulationKind::Voronoi => "Voronoi",
            SimulationKind::Fluid => "Fluid",
        }
    }

    /// Parse a URL parameter or HUD label
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "raycaster" | "wolfenstein" => Some(SimulationKind::Raycaster),
            "voronoi" => Some(SimulationKind::Voronoi),
            "fluid" => Some(SimulationKind::Fluid),
            _ => None,
        }
    }

    /// Random pick for a fresh visit
    pub fn random(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// True for the shader-only kinds that never tick the world
    pub fn is_pattern(&self) -> bool {
        !matches!(self, SimulationKind::Raycaster)
    }

    /// Shader selector for the pattern pipeline (matches pattern.wgsl)
    fn pattern_index(&self) -> u32 {
        match self {
            SimulationKind::Voronoi => 0,
            _ => 1,
        }
    }
}

/// A running (or stopped) background simulation
pub struct Session {
    pub kind: SimulationKind,
    pub world: World,
    renderer: Option<RenderState>,
    accumulator: f32,
    running: bool,
}

impl Session {
    pub fn new(kind: SimulationKind) -> Self {
        Self {
            kind,
            world: World::demo_arena(),
            renderer: None,
            accumulator: 0.0,
            running: false,
        }
    }

    /// Begin the run; `None` runs headless (native demo loop, tests)
    pub fn start(&mut self, renderer: Option<RenderState>) {
        self.renderer = renderer;
        self.running = true;
        log::info!("Session started: {}", self.kind.as_str());
    }

    /// End the run and release the GPU resources
    pub fn stop(&mut self) {
        self.renderer = None;
        self.running = false;
        self.accumulator = 0.0;
        log::info!("Session stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    /// Switch simulation kinds in place; the world (and camera pose)
    /// survives so returning to the raycaster resumes where it left off
    pub fn switch_kind(&mut self, kind: SimulationKind) {
        if kind != self.kind {
            log::info!("Switching simulation: {}", kind.as_str());
            self.kind = kind;
        }
    }

    /// Advance the world by a frame's worth of fixed timesteps
    ///
    /// Pattern kinds are driven purely by wall-clock time and skip the
    /// accumulator entirely. `turn_pixels` is consumed by the first
    /// substep.
    pub fn advance(&mut self, input: &mut FrameInput, dt: f32) {
        if !self.running {
            return;
        }
        if self.kind.is_pattern() {
            // Pointer travel while a pattern shows is discarded, not
            // banked for a snap turn back in the raycaster
            input.turn_pixels = 0.0;
            return;
        }

        self.accumulator += dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.world, input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.turn_pixels = 0.0;
        }
    }

    /// Draw one frame of the current kind
    pub fn render(&mut self, settings: &Settings, time_secs: f32) -> Result<(), wgpu::SurfaceError> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };

        if self.kind.is_pattern() {
            return renderer.render_pattern(time_secs, self.kind.pattern_index());
        }

        // View parameters follow live settings
        self.world.fov = settings.fov();
        self.world.draw_distance = settings.draw_distance();

        let (width, height) = renderer.size;
        let columns = settings.columns_for_width(width);
        let rays = cast_rays(&self.world, columns);
        let vertices = build_frame(
            &rays,
            width as f32,
            height as f32,
            self.world.map.cell_size(),
            self.world.draw_distance,
        );
        renderer.render_strips(&vertices)
    }

    /// Reconfigure the surface; world state carries over unchanged
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_kind_round_trip() {
        for kind in SimulationKind::ALL {
            assert_eq!(SimulationKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(
            SimulationKind::from_str("wolfenstein"),
            Some(SimulationKind::Raycaster)
        );
        assert_eq!(SimulationKind::from_str("plasma"), None);
    }

    #[test]
    fn test_random_kind_is_deterministic_per_seed() {
        assert_eq!(SimulationKind::random(7), SimulationKind::random(7));
        // All kinds reachable over a spread of seeds
        let mut seen = [false; 3];
        for seed in 0..64 {
            let kind = SimulationKind::random(seed);
            seen[SimulationKind::ALL.iter().position(|k| *k == kind).unwrap()] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_lifecycle() {
        let mut session = Session::new(SimulationKind::Raycaster);
        assert!(!session.is_running());

        session.start(None);
        assert!(session.is_running());
        assert!(!session.has_renderer());

        session.stop();
        assert!(!session.is_running());
    }

    #[test]
    fn test_advance_runs_fixed_substeps() {
        let mut session = Session::new(SimulationKind::Raycaster);
        session.start(None);

        let mut input = FrameInput {
            active: true,
            forward: true,
            turn_pixels: 40.0,
            ..Default::default()
        };
        // Exactly three substeps' worth of time
        session.advance(&mut input, 3.0 * SIM_DT);
        assert_eq!(session.world.time_ticks, 3);
        // One-shot pointer travel consumed
        assert_eq!(input.turn_pixels, 0.0);
    }

    #[test]
    fn test_advance_clamps_runaway_frames() {
        let mut session = Session::new(SimulationKind::Raycaster);
        session.start(None);
        let mut input = FrameInput::default();
        // A multi-second stall must not replay as thousands of ticks
        session.advance(&mut input, 30.0);
        assert!(session.world.time_ticks <= MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_pattern_kinds_discard_pointer_travel() {
        let mut session = Session::new(SimulationKind::Raycaster);
        session.start(None);
        session.switch_kind(SimulationKind::Voronoi);

        // Mouse still moves while the pointer stays locked
        let mut input = FrameInput {
            active: true,
            turn_pixels: 500.0,
            ..Default::default()
        };
        session.advance(&mut input, 0.1);
        assert_eq!(input.turn_pixels, 0.0);

        // Back in the raycaster the view must not snap
        session.switch_kind(SimulationKind::Raycaster);
        let dir = session.world.player.dir;
        session.advance(&mut input, SIM_DT);
        assert_eq!(session.world.player.dir, dir);
    }

    #[test]
    fn test_pattern_kinds_do_not_tick() {
        let mut session = Session::new(SimulationKind::Voronoi);
        session.start(None);
        let mut input = FrameInput {
            active: true,
            forward: true,
            ..Default::default()
        };
        session.advance(&mut input, 1.0);
        assert_eq!(session.world.time_ticks, 0);
    }

    #[test]
    fn test_switch_kind_keeps_world_pose() {
        let mut session = Session::new(SimulationKind::Raycaster);
        session.start(None);

        let mut input = FrameInput {
            active: true,
            forward: true,
            ..Default::default()
        };
        session.advance(&mut input, 0.5);
        let pose = session.world.pose();

        session.switch_kind(SimulationKind::Fluid);
        session.switch_kind(SimulationKind::Raycaster);
        assert_eq!(session.world.pose(), pose);
    }

    #[test]
    fn test_stopped_session_does_not_advance() {
        let mut session = Session::new(SimulationKind::Raycaster);
        let mut input = FrameInput {
            active: true,
            forward: true,
            ..Default::default()
        };
        session.advance(&mut input, 1.0);
        assert_eq!(session.world.time_ticks, 0);
    }
}
