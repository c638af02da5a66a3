//! Rendering adapter: draws a world snapshot onto a canvas.
//!
//! # Invariants
//! - Renderers read particles through `World::all_particles` and never
//!   mutate them.
//! - Each particle is drawn as a filled circle at its position with its
//!   perceived radius.
//! - Draw calls are batched per color, in sorted color order.

mod canvas;
mod renderer;
mod svg;

pub use canvas::{Canvas, Circle};
pub use renderer::{CanvasRenderer, DebugTextRenderer, FrameStats, Renderer, color_batches};
pub use svg::SvgCanvas;

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}
