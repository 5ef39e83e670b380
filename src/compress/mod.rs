//! Rank-truncated SVD compression of RGBA images.
//!
//! Each channel is lifted into a `height × width` matrix, factorized with
//! [`JacobiSvd`](crate::linalg::JacobiSvd), truncated to the requested rank
//! and written back rounded and clamped to `[0, 255]`.
//!
//! - Ranks outside `1..min(width, height)` skip compression and return a copy.
//! - A channel whose factorization fails (allocation, degenerate spectrum,
//!   worker panic) keeps its original samples; the other channels still
//!   compress.
//! - The four channels are processed concurrently; matrix fill and write-back
//!   are split over row ranges.

pub mod channel;
pub mod options;

pub use channel::{compress_svd, ChannelCompressor};
pub use options::CompressOptions;
