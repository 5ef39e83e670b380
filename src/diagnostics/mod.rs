//! Reports returned alongside kernel outputs: timings, per-channel
//! compression outcomes and distortion measures.

pub mod compress;
pub mod quality;
pub mod timing;

pub use compress::{Channel, ChannelOutcome, ChannelReport, CompressionReport};
pub use quality::QualityReport;
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
