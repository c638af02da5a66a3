use glam::DVec2;
use pixelswarm_common::{Dimensions, Vector};
use pixelswarm_kernel::{Force, forces};

/// Where a pixel's particle settles: the pixel scaled by `scale` inside an
/// image centred on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelTarget {
    pub pixel_x: u32,
    pub pixel_y: u32,
    pub image: Dimensions,
    pub canvas: Dimensions,
    pub scale: f64,
}

impl PixelTarget {
    /// `pixel * scale + canvas / 2 - image * scale / 2`, per axis.
    pub fn position(&self) -> Vector {
        let pixel = DVec2::new(f64::from(self.pixel_x), f64::from(self.pixel_y));
        let image = DVec2::new(self.image.width, self.image.height);
        let canvas = DVec2::new(self.canvas.width, self.canvas.height);
        (pixel * self.scale + canvas / 2.0 - image * self.scale / 2.0).into()
    }

    /// A new pull force toward [`PixelTarget::position`].
    pub fn force(&self, strength: f64) -> Force {
        let at = self.position();
        forces::radial_pull(at.x, at.y, strength)
    }
}
