use pixelswarm_common::{Dimensions, Vector};

/// A filled circle in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vector,
    pub radius: f64,
}

/// Minimal 2D drawing surface.
pub trait Canvas {
    fn dimensions(&self) -> Dimensions;

    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Draw every circle in one batch with a single fill color.
    fn fill_circles(&mut self, color: &str, circles: &[Circle]);
}
