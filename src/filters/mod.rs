//! 3×3 convolution filters over RGBA buffers.
//!
//! - Colour channels are convolved independently; alpha is copied.
//! - Borders clamp neighbour coordinates to the nearest edge pixel.
//! - Results are rounded (`+0.5`, truncated) and clamped to `[0, 255]`.
//! - Rows are processed in fixed-height chunks, one worker per chunk. The
//!   output does not depend on the chunk height.

pub mod convolve;
pub mod kernel;

pub use convolve::{apply_filter, apply_filter_kind, FilterOptions};
pub use kernel::{FilterKind, Kernel3};
