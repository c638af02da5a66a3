use std::path::Path;

use pixelswarm_common::{Dimensions, Rgba};

use crate::error::SetupError;

/// A decoded image: `width * height` RGBA samples in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelGrid {
    pub fn new(width: u32, height: u32, pixels: Vec<Rgba>) -> Result<Self, SetupError> {
        if pixels.len() != width as usize * height as usize {
            return Err(SetupError::InvalidGrid {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a grid by sampling `pixel(x, y)` for every coordinate.
    pub fn from_fn<F>(width: u32, height: u32, mut pixel: F) -> Self
    where
        F: FnMut(u32, u32) -> Rgba,
    {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(pixel(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// From a flat `[r, g, b, a, r, g, b, a, ...]` buffer.
    pub fn from_rgba8(width: u32, height: u32, raw: &[u8]) -> Result<Self, SetupError> {
        if raw.len() % 4 != 0 {
            return Err(SetupError::InvalidGrid {
                width,
                height,
                len: raw.len() / 4,
            });
        }
        let pixels = raw
            .chunks_exact(4)
            .map(|c| Rgba::new(c[0], c[1], c[2], c[3]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// Decode an image file (PNG or JPEG).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let path = path.as_ref();
        let decoded = image::open(path)?.into_rgba8();
        let (width, height) = decoded.dimensions();
        tracing::debug!(path = %path.display(), width, height, "decoded image");
        Self::from_rgba8(width, height, decoded.as_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(f64::from(self.width), f64::from(self.height))
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::new(255, 0, 0, 255);
    const CLEAR: Rgba = Rgba::new(0, 0, 0, 0);

    #[test]
    fn rejects_mismatched_buffer() {
        let err = PixelGrid::new(2, 2, vec![RED; 3]).unwrap_err();
        assert!(matches!(err, SetupError::InvalidGrid { len: 3, .. }));
        assert!(PixelGrid::from_rgba8(1, 1, &[1, 2, 3]).is_err());
    }

    #[test]
    fn row_major_lookup() {
        let grid = PixelGrid::new(2, 1, vec![RED, CLEAR]).unwrap();
        assert_eq!(grid.get(0, 0), Some(RED));
        assert_eq!(grid.get(1, 0), Some(CLEAR));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 1), None);
    }

    #[test]
    fn from_fn_visits_every_coordinate() {
        let grid = PixelGrid::from_fn(3, 2, |x, y| Rgba::new(x as u8, y as u8, 0, 255));
        assert_eq!(grid.len(), 6);
        assert_eq!(grid.get(2, 1), Some(Rgba::new(2, 1, 0, 255)));
        assert_eq!(grid.dimensions(), Dimensions::new(3.0, 2.0));
    }

    #[test]
    fn from_rgba8_splits_samples() {
        let grid = PixelGrid::from_rgba8(1, 2, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(grid.get(0, 1), Some(Rgba::new(5, 6, 7, 8)));
    }

    #[test]
    fn open_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 255, 128]));
        img.save(&path).unwrap();

        let grid = PixelGrid::open(&path).unwrap();
        assert_eq!((grid.width(), grid.height()), (2, 1));
        assert_eq!(grid.get(0, 0), Some(RED));
        assert_eq!(grid.get(1, 0), Some(Rgba::new(0, 0, 255, 128)));
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = PixelGrid::open(dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, SetupError::Load(_)));
    }
}
