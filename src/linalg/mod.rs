//! Dense linear algebra used by the SVD compressor.

pub mod dense;
pub mod jacobi;

pub use dense::DenseMatrix;
pub use jacobi::{JacobiOptions, JacobiSvd, SvdResult};
