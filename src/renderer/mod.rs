//! Rendering module
//!
//! `scene` turns game state into draw calls on a [`Canvas`]. Two canvases
//! exist: [`DrawList`] records the calls (tests, headless runs) and
//! [`RenderState`] tessellates them for WebGPU.

pub mod draw_list;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use draw_list::{DrawCommand, DrawList};
pub use pipeline::RenderState;
pub use scene::render;

use glam::Vec2;

/// RGBA, 0-1 per channel
pub type Color = [f32; 4];

/// A 2D drawing surface in field coordinates (origin top-left, y down)
pub trait Canvas {
    /// Start a frame by clearing a `width` x `height` area
    fn begin_frame(&mut self, width: f32, height: f32);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Draw `text` centred on `center`, `size` units tall
    fn fill_text(&mut self, text: &str, center: Vec2, size: f32, color: Color);

    /// Present the frame
    fn end_frame(&mut self);
}
