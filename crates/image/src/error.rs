use pixelswarm_kernel::KernelError;

/// Errors from loading a pixel grid or populating a world from it.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("image load failed: {0}")]
    Load(#[from] image::ImageError),
    #[error("pixel buffer of {len} samples does not match {width}x{height}")]
    InvalidGrid { width: u32, height: u32, len: usize },
    #[error(transparent)]
    Kernel(#[from] KernelError),
}
