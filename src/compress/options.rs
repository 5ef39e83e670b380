use crate::linalg::JacobiOptions;
use serde::Deserialize;

/// Options for [`ChannelCompressor`](super::ChannelCompressor).
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct CompressOptions {
    /// Eigen-solver settings used for every channel.
    pub jacobi: JacobiOptions,
    /// Factorize the four channels concurrently.
    pub concurrent_channels: bool,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            jacobi: JacobiOptions::default(),
            concurrent_channels: true,
        }
    }
}

impl CompressOptions {
    pub fn with_jacobi(mut self, jacobi: JacobiOptions) -> Self {
        self.jacobi = jacobi;
        self
    }

    pub fn with_concurrent_channels(mut self, concurrent: bool) -> Self {
        self.concurrent_channels = concurrent;
        self
    }
}
