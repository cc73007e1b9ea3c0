//! WebGPU rendering module
//!
//! A vertex-colored strip pipeline draws the raycaster view; a fullscreen
//! pattern pipeline draws the shader-only backgrounds.

pub mod pipeline;
pub mod strips;
pub mod vertex;

pub use pipeline::RenderState;
pub use strips::build_frame;
pub use vertex::Vertex;
