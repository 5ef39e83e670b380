use super::kernel::{FilterKind, Kernel3};
use crate::error::ImageError;
use crate::image::{RgbaImage, RgbaView, ALPHA, CHANNELS};
use crate::parallel::{try_for_each_row_chunk, DEFAULT_CHUNK_ROWS};
use log::debug;
use serde::Deserialize;

/// Colour channels run through the kernel; alpha is copied.
const COLOR_CHANNELS: usize = 3;

/// Options for the convolution executor.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Rows handed to one worker (>= 1).
    pub chunk_rows: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            chunk_rows: DEFAULT_CHUNK_ROWS,
        }
    }
}

impl FilterOptions {
    pub fn with_chunk_rows(mut self, chunk_rows: usize) -> Self {
        self.chunk_rows = chunk_rows;
        self
    }
}

/// Filter a packed RGBA buffer by filter name.
///
/// Unknown names yield a byte-exact copy of `pixels`. A buffer whose length
/// is not `width * height * 4` is rejected before any work is done.
pub fn apply_filter(
    pixels: &[u8],
    width: usize,
    height: usize,
    filter_name: &str,
) -> Result<Vec<u8>, ImageError> {
    let view = RgbaView::new(pixels, width, height)?;
    let kind = FilterKind::from_name(filter_name);
    if kind == FilterKind::Identity {
        debug!("apply_filter: unknown filter '{filter_name}', returning a copy");
    }
    apply_filter_kind(view, kind, &FilterOptions::default()).map(RgbaImage::into_raw)
}

/// Filter an RGBA view with a typed filter selection.
pub fn apply_filter_kind(
    src: RgbaView<'_>,
    kind: FilterKind,
    options: &FilterOptions,
) -> Result<RgbaImage, ImageError> {
    src.validate()?;
    let Some(kernel) = kind.kernel() else {
        return Ok(src.to_owned_image());
    };

    let mut out = RgbaImage::new(src.w, src.h)?;
    if src.w == 0 || src.h == 0 {
        return Ok(out);
    }
    debug!(
        "apply_filter: {} on {}x{} in chunks of {} rows",
        kind.name(),
        src.w,
        src.h,
        options.chunk_rows.max(1)
    );

    let row_len = src.w * CHANNELS;
    try_for_each_row_chunk(
        "apply_filter",
        &mut out.data,
        row_len,
        options.chunk_rows,
        |start, rows| convolve_rows(src, kernel, start, rows),
    )?;
    Ok(out)
}

/// Convolve rows `start_row..` of `src` into `out`, which holds whole rows.
fn convolve_rows(src: RgbaView<'_>, kernel: &Kernel3, start_row: usize, out: &mut [u8]) {
    let (w, h) = (src.w, src.h);
    let data = src.data;
    let row_len = w * CHANNELS;
    let rows_in_chunk = out.len() / row_len;

    for local_y in 0..rows_in_chunk {
        let y = start_row + local_y;
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
            let dst_px = local_y * row_len + x * CHANNELS;

            for c in 0..COLOR_CHANNELS {
                let mut sum = 0.0f64;
                for (ky, &sy) in y_idx.iter().enumerate() {
                    for (kx, &sx) in x_idx.iter().enumerate() {
                        let sample = (sy * w + sx) * CHANNELS + c;
                        let Some(&value) = data.get(sample) else {
                            continue;
                        };
                        sum += f64::from(value) * kernel[ky][kx];
                    }
                }
                if let Some(slot) = out.get_mut(dst_px + c) {
                    *slot = round_to_u8(sum);
                }
            }

            let alpha = (y * w + x) * CHANNELS + ALPHA;
            if let (Some(&a), Some(slot)) = (data.get(alpha), out.get_mut(dst_px + ALPHA)) {
                *slot = a;
            }
        }
    }
}

/// Add one half, truncate toward zero, clamp to `[0, 255]`.
#[inline]
pub(crate) fn round_to_u8(value: f64) -> u8 {
    ((value + 0.5) as i64).clamp(0, 255) as u8
}
