use super::options::CompressOptions;
use crate::diagnostics::{
    elapsed_ms, Channel, ChannelOutcome, ChannelReport, CompressionReport, TimingBreakdown,
};
use crate::error::{ImageError, LinalgError};
use crate::filters::convolve::round_to_u8;
use crate::image::{ImageView, RgbaImage, RgbaView, CHANNELS};
use crate::linalg::{DenseMatrix, JacobiSvd};
use crate::parallel::{
    for_each_row_chunk, map_isolated, rows_per_worker, run_isolated, try_for_each_row_chunk,
};
use log::{debug, warn};
use std::time::Instant;

/// Compress a packed RGBA buffer to the given rank.
///
/// `rank <= 0` or `rank >= min(width, height)` returns an unchanged copy.
pub fn compress_svd(
    pixels: &[u8],
    width: usize,
    height: usize,
    rank: i64,
) -> Result<Vec<u8>, ImageError> {
    let view = RgbaView::new(pixels, width, height)?;
    let report = ChannelCompressor::default().compress(view, rank)?;
    Ok(report.image.into_raw())
}

/// Reconstruction of one channel, or `None` to copy the source samples.
struct ChannelPlane {
    matrix: Option<DenseMatrix>,
    report: ChannelReport,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ChannelCompressor {
    options: CompressOptions,
}

impl ChannelCompressor {
    pub fn new(options: CompressOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompressOptions {
        &self.options
    }

    /// Compress `src` keeping `rank` singular triplets per channel.
    pub fn compress(&self, src: RgbaView<'_>, rank: i64) -> Result<CompressionReport, ImageError> {
        src.validate()?;
        let total_start = Instant::now();
        let (w, h) = (src.w, src.h);

        let Some(k) = effective_rank(rank, w, h) else {
            debug!("compress: rank {rank} outside 1..min({w}, {h}), returning a copy");
            return Ok(CompressionReport {
                image: src.to_owned_image(),
                width: w,
                height: h,
                requested_rank: rank,
                skipped: true,
                channels: Vec::new(),
                timing: TimingBreakdown::with_total(elapsed_ms(total_start)),
            });
        };
        debug!("compress: rank {k} on {w}x{h}");

        let mut timing = TimingBreakdown::default();
        let planes = timing.measure("channels", || self.compress_channels(src, k));
        let image = timing.measure("rebuild", || rebuild(src, &planes))?;
        timing.total_ms = elapsed_ms(total_start);

        Ok(CompressionReport {
            image,
            width: w,
            height: h,
            requested_rank: rank,
            skipped: false,
            channels: planes.into_iter().map(|p| p.report).collect(),
            timing,
        })
    }

    fn compress_channels(&self, src: RgbaView<'_>, k: usize) -> Vec<ChannelPlane> {
        let run = |&channel: &Channel| self.compress_channel(src, channel, k);
        let results: Vec<Result<ChannelPlane, String>> = if self.options.concurrent_channels {
            map_isolated(&Channel::ALL, run)
        } else {
            Channel::ALL.iter().map(|c| run_isolated(|| run(c))).collect()
        };

        results
            .into_iter()
            .zip(Channel::ALL)
            .map(|(result, channel)| plane_from(result, channel))
            .collect()
    }

    fn compress_channel(&self, src: RgbaView<'_>, channel: Channel, k: usize) -> ChannelPlane {
        let start = Instant::now();
        self.factorize_plane(channel, fill_channel(src, channel), k, start)
    }

    /// Factorize a filled channel matrix and keep its leading `k` triplets.
    fn factorize_plane(
        &self,
        channel: Channel,
        filled: Result<DenseMatrix, String>,
        k: usize,
        start: Instant,
    ) -> ChannelPlane {
        let fallback = |reason: String| ChannelPlane {
            matrix: None,
            report: ChannelReport::fallback(channel, reason, elapsed_ms(start)),
        };

        let matrix = match filled {
            Ok(m) => m,
            Err(reason) => {
                warn!("compress: {channel:?} channel not filled: {reason}");
                return fallback(reason);
            }
        };

        let svd = match JacobiSvd::new(self.options.jacobi).factorize(&matrix) {
            Ok(svd) => svd,
            Err(err @ LinalgError::Degenerate { .. }) => {
                debug!("compress: {channel:?} channel copied through: {err}");
                return fallback(err.to_string());
            }
            Err(err) => {
                warn!("compress: {channel:?} channel copied through: {err}");
                return fallback(err.to_string());
            }
        };

        let reconstructed = match svd.reconstruct(k) {
            Ok(m) => m,
            Err(err) => {
                warn!("compress: {channel:?} channel reconstruction failed: {err}");
                return fallback(err.to_string());
            }
        };

        ChannelPlane {
            matrix: Some(reconstructed),
            report: ChannelReport {
                channel,
                outcome: ChannelOutcome::Compressed,
                kept_rank: k.min(svd.rank()),
                energy_retained: svd.energy_ratio(k),
                iterations: svd.iterations,
                converged: svd.converged,
                elapsed_ms: elapsed_ms(start),
            },
        }
    }
}

/// A channel whose worker panicked keeps its source samples.
fn plane_from(result: Result<ChannelPlane, String>, channel: Channel) -> ChannelPlane {
    result.unwrap_or_else(|message| {
        warn!("compress: {channel:?} channel worker panicked: {message}");
        ChannelPlane {
            matrix: None,
            report: ChannelReport::fallback(channel, format!("worker panic: {message}"), 0.0),
        }
    })
}

/// Rank actually used, or `None` when compression should be skipped.
fn effective_rank(rank: i64, w: usize, h: usize) -> Option<usize> {
    let k = usize::try_from(rank).ok().filter(|&k| k > 0)?;
    (k < w.min(h)).then_some(k)
}

/// Lift one channel into a `h × w` matrix, split over row ranges.
fn fill_channel(src: RgbaView<'_>, channel: Channel) -> Result<DenseMatrix, String> {
    let (w, h) = (src.w, src.h);
    let mut matrix = DenseMatrix::try_zeros(h, w).map_err(|e| e.to_string())?;
    let c = channel.offset();
    let faults = for_each_row_chunk(matrix.as_mut_slice(), w, rows_per_worker(h), |start, rows| {
        for (local_y, row) in rows.chunks_mut(w).enumerate() {
            let src_row = src.row(start + local_y);
            for (x, cell) in row.iter_mut().enumerate() {
                if let Some(&v) = src_row.get(x * CHANNELS + c) {
                    *cell = f64::from(v);
                }
            }
        }
    });
    if faults.is_empty() {
        Ok(matrix)
    } else {
        Err(format!("{} fill chunk(s) failed", faults.len()))
    }
}

/// Interleave the reconstructed planes back into an RGBA buffer.
fn rebuild(src: RgbaView<'_>, planes: &[ChannelPlane]) -> Result<RgbaImage, ImageError> {
    let (w, h) = (src.w, src.h);
    let mut out = RgbaImage::new(w, h)?;
    let row_len = w * CHANNELS;
    let chunk_rows = rows_per_worker(h);
    try_for_each_row_chunk("compress rebuild", &mut out.data, row_len, chunk_rows, |start, rows| {
        for (local_y, row) in rows.chunks_mut(row_len).enumerate() {
            let y = start + local_y;
            let src_row = src.row(y);
            for (c, plane) in planes.iter().enumerate() {
                match &plane.matrix {
                    Some(m) => {
                        let m_row = m.row(y);
                        for x in 0..w {
                            row[x * CHANNELS + c] = round_to_u8(m_row[x]);
                        }
                    }
                    None => {
                        for x in 0..w {
                            row[x * CHANNELS + c] = src_row[x * CHANNELS + c];
                        }
                    }
                }
            }
        }
    })?;
    Ok(out)
}
