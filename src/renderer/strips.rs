//! Screen-space geometry for the raycaster view
//!
//! Sky and ground quads plus one vertical strip per hit column. Positions
//! are in pixels; `RenderState::render_strips` converts them to clip space
//! before upload, which also clips strips taller than the screen.

use crate::consts;
use crate::renderer::vertex::{Vertex, colors, wall_color};
use crate::sim::{Ray, WallHit};

/// Scale a color by wall distance: near walls keep their base color,
/// walls at the draw distance fade to black
fn shade(color: [f32; 4], distance: f32, draw_distance: f32) -> [f32; 4] {
    let brightness = 1.0 - (distance / draw_distance).clamp(0.0, 1.0);
    [
        color[0] * brightness,
        color[1] * brightness,
        color[2] * brightness,
        color[3],
    ]
}

fn push_quad(out: &mut Vec<Vertex>, x0: f32, y0: f32, x1: f32, y1: f32, color: [f32; 4]) {
    // Two triangles
    out.push(Vertex::new(x0, y0, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x0, y1, color));

    out.push(Vertex::new(x0, y1, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x1, y1, color));
}

/// Projected strip height for a hit, inversely proportional to distance
#[inline]
pub fn strip_height(hit: &WallHit, screen_h: f32, cell_size: f32) -> f32 {
    screen_h * consts::WALL_HEIGHT * cell_size / hit.distance
}

/// Build the full frame: sky, ground, then one strip per hit column
pub fn build_frame(
    rays: &[Ray],
    screen_w: f32,
    screen_h: f32,
    cell_size: f32,
    draw_distance: f32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(12 + rays.len() * 6);

    let half = screen_h / 2.0;
    push_quad(&mut vertices, 0.0, 0.0, screen_w, half, colors::THEME_LIGHT);
    push_quad(&mut vertices, 0.0, half, screen_w, screen_h, colors::GROUND);

    let columns = rays.len() as f32;
    for ray in rays {
        let Some(hit) = ray.hit else { continue };

        let x0 = ray.column as f32 / columns * screen_w;
        let x1 = (ray.column + 1) as f32 / columns * screen_w;
        let line = strip_height(&hit, screen_h, cell_size);
        let color = shade(wall_color(hit.cell, hit.side), hit.distance, draw_distance);
        push_quad(&mut vertices, x0, half - line / 2.0, x1, half + line / 2.0, color);
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Side;

    fn hit(distance: f32) -> Ray {
        Ray {
            column: 0,
            hit: Some(WallHit {
                distance,
                cell: 1,
                side: Side::Vertical,
            }),
        }
    }

    #[test]
    fn test_sky_and_ground_always_present() {
        let vertices = build_frame(&[], 800.0, 600.0, 64.0, 1280.0);
        assert_eq!(vertices.len(), 12);
        assert_eq!(vertices[0].color, colors::THEME_LIGHT);
        assert_eq!(vertices[6].color, colors::GROUND);
        // Sky covers the top half, ground the bottom
        assert_eq!(vertices[0].position, [0.0, 0.0]);
        assert_eq!(vertices[11].position, [800.0, 600.0]);
    }

    #[test]
    fn test_no_hit_columns_skipped() {
        let rays = vec![
            hit(256.0),
            Ray {
                column: 1,
                hit: None,
            },
        ];
        let vertices = build_frame(&rays, 800.0, 600.0, 64.0, 1280.0);
        // Sky + ground + one strip
        assert_eq!(vertices.len(), 18);
    }

    #[test]
    fn test_strip_height_inverse_to_distance() {
        let near = strip_height(hit(64.0).hit.as_ref().unwrap(), 600.0, 64.0);
        let far = strip_height(hit(256.0).hit.as_ref().unwrap(), 600.0, 64.0);
        // One cell away fills the screen exactly; four cells away is a quarter
        assert!((near - 600.0).abs() < 1e-3);
        assert!((far - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_strip_centered_and_spanning_column() {
        let mut rays = vec![hit(9999.0), hit(9999.0), hit(128.0)];
        for (i, ray) in rays.iter_mut().enumerate() {
            ray.column = i as u32;
        }
        let vertices = build_frame(&rays, 300.0, 600.0, 64.0, 1280.0);
        // Last 6 vertices belong to column 2 of 3
        let strip = &vertices[vertices.len() - 6..];
        assert_eq!(strip[0].position[0], 200.0);
        assert_eq!(strip[5].position[0], 300.0);
        let line = 600.0 * 64.0 / 128.0;
        assert!((strip[0].position[1] - (300.0 - line / 2.0)).abs() < 1e-3);
        assert!((strip[5].position[1] - (300.0 + line / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn test_distance_shading() {
        let draw = 1280.0;
        let vertices = build_frame(&[hit(draw)], 800.0, 600.0, 64.0, draw);
        // At the draw distance the strip fades to black
        let strip_color = vertices[12].color;
        assert!(strip_color[0].abs() < 1e-6);
        assert!(strip_color[1].abs() < 1e-6);
        assert!(strip_color[2].abs() < 1e-6);
        assert_eq!(strip_color[3], 1.0);
    }
}
