//! Error types returned by the image kernels and the dense linear algebra.
//!
//! Recoverable parameter problems (unknown filter names, degenerate ranks)
//! never surface here; they are handled as pass-through by the kernels.

use thiserror::Error;

/// Failures of a whole-image operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("buffer length {actual} does not match {width}x{height} RGBA (expected {expected} bytes)")]
    ShapeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("image dimensions {width}x{height} overflow the addressable buffer size")]
    DimensionOverflow { width: usize, height: usize },

    #[error("{stage}: {chunks} worker chunk(s) failed")]
    WorkerFault { stage: &'static str, chunks: usize },
}

/// Failures of [`DenseMatrix`](crate::linalg::DenseMatrix) algebra and the
/// Jacobi factorization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinalgError {
    #[error("shape mismatch: {left_rows}x{left_cols} is incompatible with {right_rows}x{right_cols}")]
    ShapeMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    #[error("cannot allocate a {rows}x{cols} matrix")]
    Allocation { rows: usize, cols: usize },

    #[error("matrix is empty")]
    Empty,

    #[error("all singular values vanished (largest = {largest:e})")]
    Degenerate { largest: f64 },
}
