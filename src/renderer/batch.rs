//! CPU-side triangle batch implementing [`Surface`]

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use super::{Rgb, Surface};

/// Collects tessellated draw calls for one frame
///
/// Vertices are kept in call order, so drawing them as one triangle list with
/// alpha blending reproduces the painter's order of the calls.
#[derive(Debug, Default)]
pub struct VertexBatch {
    vertices: Vec<Vertex>,
    draw_calls: usize,
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop this frame's geometry, keeping the allocation
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.draw_calls = 0;
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Number of primitive calls recorded since the last clear
    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl Surface for VertexBatch {
    fn draw_circle_outline(&mut self, center: Vec2, radius: f32, stroke_width: f32, color: Rgb) {
        // Stroke grows inward from the radius
        let segments = shapes::segments_for_radius(radius);
        self.vertices.extend(shapes::ring(
            center,
            radius - stroke_width,
            radius,
            colors::opaque(color),
            segments,
        ));
        self.draw_calls += 1;
    }

    fn draw_filled_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        let segments = shapes::segments_for_radius(radius);
        self.vertices
            .extend(shapes::circle(center, radius, colors::opaque(color), segments));
        self.draw_calls += 1;
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: u8, stroke_width: f32) {
        if alpha > 0 {
            self.vertices
                .extend(shapes::line(from, to, stroke_width, colors::rgba(color, alpha)));
        }
        self.draw_calls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_keeps_call_order() {
        let mut batch = VertexBatch::new();
        batch.draw_circle_outline(Vec2::new(400.0, 300.0), 250.0, 2.0, [255, 255, 255]);
        let after_arena = batch.vertices().len();
        batch.draw_filled_circle(Vec2::new(400.0, 300.0), 15.0, [255, 0, 0]);

        assert_eq!(batch.draw_calls(), 2);
        assert!(after_arena > 0);
        // Ball triangles come after the arena ring
        assert_eq!(batch.vertices()[after_arena].color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_transparent_line_emits_nothing() {
        let mut batch = VertexBatch::new();
        batch.draw_line(Vec2::ZERO, Vec2::new(10.0, 0.0), [0, 255, 0], 0, 2.0);
        assert!(batch.is_empty());
        assert_eq!(batch.draw_calls(), 1);
    }

    #[test]
    fn test_line_alpha_carried_to_vertices() {
        let mut batch = VertexBatch::new();
        batch.draw_line(Vec2::ZERO, Vec2::new(10.0, 0.0), [0, 0, 255], 51, 2.0);
        assert!(batch.vertices().iter().all(|v| (v.color[3] - 0.2).abs() < 1e-6));
    }

    #[test]
    fn test_clear_resets() {
        let mut batch = VertexBatch::new();
        batch.draw_filled_circle(Vec2::ZERO, 5.0, [1, 2, 3]);
        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.draw_calls(), 0);
    }
}
