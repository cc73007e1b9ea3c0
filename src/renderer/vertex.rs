//! Vertex types and the site color theme

use bytemuck::{Pod, Zeroable};

use crate::sim::Side;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Site theme palette shared by every simulation kind
pub mod colors {
    /// Sky and the brightest wall face
    pub const THEME_LIGHT: [f32; 4] = [0.69, 0.75, 0.74, 1.0];
    pub const THEME_MID: [f32; 4] = [0.65, 0.65, 0.66, 1.0];
    pub const THEME_DARK: [f32; 4] = [0.47, 0.45, 0.44, 1.0];
    pub const THEME_DARKER: [f32; 4] = [0.27, 0.25, 0.24, 1.0];
    /// Floor green
    pub const GROUND: [f32; 4] = [0.27, 0.45, 0.44, 1.0];
}

/// Base wall color for a cell code and hit side
///
/// Each material pairs two palette entries so walls on the two grid-line
/// orientations shade differently.
pub fn wall_color(cell: u8, side: Side) -> [f32; 4] {
    use colors::*;
    match (cell, side) {
        (1, Side::Vertical) => THEME_LIGHT,
        (1, Side::Horizontal) => THEME_MID,
        (2, Side::Vertical) => THEME_DARK,
        (2, Side::Horizontal) => THEME_DARKER,
        (3, Side::Vertical) => THEME_MID,
        (3, Side::Horizontal) => THEME_DARK,
        (4, Side::Vertical) => THEME_DARKER,
        _ => THEME_LIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_color_varies_by_side() {
        for cell in 1..=4u8 {
            assert_ne!(
                wall_color(cell, Side::Vertical),
                wall_color(cell, Side::Horizontal),
                "cell {cell} shades both sides the same"
            );
        }
    }
}
