use super::timing::TimingBreakdown;
use crate::image::RgbaImage;
use serde::Serialize;

/// One plane of an RGBA image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha];

    /// Sample offset of this channel inside a pixel.
    pub fn offset(self) -> usize {
        self as usize
    }
}

/// What happened to one channel during compression.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChannelOutcome {
    /// Rank-truncated reconstruction was written.
    Compressed,
    /// The original samples were copied through.
    Fallback { reason: String },
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelReport {
    pub channel: Channel,
    pub outcome: ChannelOutcome,
    /// Singular triplets used for the reconstruction (0 on fallback).
    pub kept_rank: usize,
    /// `Σ_{i<k} σᵢ² / Σ σᵢ²` of the kept triplets.
    pub energy_retained: f64,
    pub iterations: usize,
    pub converged: bool,
    pub elapsed_ms: f64,
}

impl ChannelReport {
    pub fn fallback(channel: Channel, reason: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            channel,
            outcome: ChannelOutcome::Fallback {
                reason: reason.into(),
            },
            kept_rank: 0,
            energy_retained: 1.0,
            iterations: 0,
            converged: false,
            elapsed_ms,
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.outcome == ChannelOutcome::Compressed
    }
}

/// Output of `ChannelCompressor::compress`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionReport {
    #[serde(skip)]
    pub image: RgbaImage,
    pub width: usize,
    pub height: usize,
    pub requested_rank: i64,
    /// `true` when the rank was outside `1..min(w, h)` and the input was copied.
    pub skipped: bool,
    pub channels: Vec<ChannelReport>,
    pub timing: TimingBreakdown,
}
