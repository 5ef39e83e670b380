//! Interleaved 8-bit RGBA buffers.
//!
//! `RgbaView` borrows caller memory, `RgbaImage` owns the output of a
//! kernel. Both use a tightly packed layout where sample `c` of pixel
//! `(x, y)` lives at `(y * w + x) * 4 + c`.
use super::traits::{ImageView, ImageViewMut};
use crate::error::ImageError;

/// Samples per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;
/// Index of the alpha sample inside a pixel.
pub const ALPHA: usize = 3;

/// Linear index of sample `c` of pixel `(x, y)` in a packed RGBA buffer.
#[inline]
pub fn sample_index(x: usize, y: usize, width: usize, c: usize) -> usize {
    (y * width + x) * CHANNELS + c
}

/// Number of bytes a `width × height` RGBA buffer must hold.
pub fn expected_len(width: usize, height: usize) -> Result<usize, ImageError> {
    width
        .checked_mul(height)
        .and_then(|px| px.checked_mul(CHANNELS))
        .ok_or(ImageError::DimensionOverflow { width, height })
}

/// Check that `len` bytes describe exactly a `width × height` RGBA image.
pub fn validate_shape(len: usize, width: usize, height: usize) -> Result<(), ImageError> {
    let expected = expected_len(width, height)?;
    if expected != len {
        return Err(ImageError::ShapeMismatch {
            width,
            height,
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// Borrowed RGBA image.
#[derive(Clone, Copy, Debug)]
pub struct RgbaView<'a> {
    pub w: usize,
    pub h: usize,
    pub data: &'a [u8],
}

impl<'a> RgbaView<'a> {
    /// Wrap `data`, rejecting buffers whose length disagrees with `w × h × 4`.
    pub fn new(data: &'a [u8], w: usize, h: usize) -> Result<Self, ImageError> {
        validate_shape(data.len(), w, h)?;
        Ok(Self { w, h, data })
    }

    /// Re-run the shape check, e.g. on a view built from public fields.
    pub fn validate(&self) -> Result<(), ImageError> {
        validate_shape(self.data.len(), self.w, self.h)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> u8 {
        self.data[sample_index(x, y, self.w, c)]
    }

    pub fn to_owned_image(&self) -> RgbaImage {
        RgbaImage {
            w: self.w,
            h: self.h,
            data: self.data.to_vec(),
        }
    }
}

impl ImageView for RgbaView<'_> {
    type Sample = u8;
    const CHANNELS: usize = CHANNELS;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let len = self.row_len();
        let start = y * len;
        &self.data[start..start + len]
    }
    #[inline]
    fn as_slice(&self) -> &[u8] {
        self.data
    }
}

/// Owned RGBA image, zero-initialised on construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RgbaImage {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl RgbaImage {
    pub fn new(w: usize, h: usize) -> Result<Self, ImageError> {
        let len = expected_len(w, h)?;
        Ok(Self {
            w,
            h,
            data: vec![0; len],
        })
    }

    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        validate_shape(data.len(), w, h)?;
        Ok(Self { w, h, data })
    }

    pub fn as_view(&self) -> RgbaView<'_> {
        RgbaView {
            w: self.w,
            h: self.h,
            data: &self.data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> u8 {
        self.data[sample_index(x, y, self.w, c)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, c: usize, v: u8) {
        let i = sample_index(x, y, self.w, c);
        self.data[i] = v;
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

impl ImageView for RgbaImage {
    type Sample = u8;
    const CHANNELS: usize = CHANNELS;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let len = self.row_len();
        let start = y * len;
        &self.data[start..start + len]
    }
    #[inline]
    fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl ImageViewMut for RgbaImage {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let len = self.row_len();
        let start = y * len;
        &mut self.data[start..start + len]
    }
    #[inline]
    fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
