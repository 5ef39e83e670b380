#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod compress;
pub mod diagnostics;
pub mod error;
pub mod filters;
pub mod image;
pub mod transform;

// Building blocks – public, but considered internals.
pub mod config;
pub mod linalg;
pub mod parallel;

// --- High-level re-exports -------------------------------------------------

// Main entry points over packed RGBA buffers.
pub use crate::compress::{compress_svd, ChannelCompressor, CompressOptions};
pub use crate::filters::{apply_filter, apply_filter_kind, FilterKind, FilterOptions};
pub use crate::transform::{apply_transform, AffineTransform};

pub use crate::error::{ImageError, LinalgError};
pub use crate::image::{RgbaImage, RgbaView};

// Reports returned next to the images.
pub use crate::diagnostics::{CompressionReport, QualityReport, TimingBreakdown};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use tiny_img::prelude::*;
///
/// # fn main() -> Result<(), ImageError> {
/// let (w, h) = (64usize, 48usize);
/// let pixels = vec![128u8; w * h * 4];
///
/// let sharpened = apply_filter(&pixels, w, h, "sharpen")?;
/// let compressed = compress_svd(&sharpened, w, h, 8)?;
/// assert_eq!(compressed.len(), pixels.len());
///
/// let view = RgbaView::new(&compressed, w, h)?;
/// let rotated = apply_transform(view, &AffineTransform::rotation(15.0))?;
/// println!("{}x{}", rotated.w, rotated.h);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageView, RgbaImage, RgbaView};
    pub use crate::{
        apply_filter, apply_transform, compress_svd, AffineTransform, ChannelCompressor,
        ImageError,
    };
}
