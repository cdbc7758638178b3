//! Rendering module
//!
//! The simulation only ever talks to a [`Surface`]: three primitive draw calls,
//! issued in painter's order. [`VertexBatch`] tessellates those calls into
//! triangles and [`RenderState`] pushes the triangles through WebGPU.

pub mod batch;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use batch::VertexBatch;
pub use pipeline::RenderState;

use glam::Vec2;

/// 8-bit RGB color
pub type Rgb = [u8; 3];

/// Primitive drawing operations consumed by the simulation
///
/// Coordinates are window pixels with y pointing down. Later calls paint over
/// earlier ones.
pub trait Surface {
    /// Unfilled circle with the given stroke width
    fn draw_circle_outline(&mut self, center: Vec2, radius: f32, stroke_width: f32, color: Rgb);

    /// Solid, fully opaque circle
    fn draw_filled_circle(&mut self, center: Vec2, radius: f32, color: Rgb);

    /// Line segment alpha-blended over what is already drawn
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: u8, stroke_width: f32);
}
