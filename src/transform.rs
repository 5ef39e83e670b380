//! Affine image transforms about the image centre.
//!
//! Transforms are 3×3 homogeneous matrices; only the upper-left 2×2 linear
//! part is used for resampling. Each destination pixel is mapped back
//! through the inverse of that part and bilinearly sampled from the source.
//! Destinations whose source falls outside `[0, w-1) × [0, h-1)` stay zero,
//! as does the whole output when the linear part is singular.
use crate::error::ImageError;
use crate::image::{RgbaImage, RgbaView, CHANNELS};
use crate::parallel::{try_for_each_row_chunk, DEFAULT_CHUNK_ROWS};
use log::debug;
use nalgebra::{Matrix2, Matrix3, Vector2};

const SINGULAR_EPS: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    pub matrix: Matrix3<f32>,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Counter-clockwise rotation by `degrees` (in a y-up frame).
    pub fn rotation(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self {
            matrix: Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0),
        }
    }

    pub fn scaling(sx: f32, sy: f32) -> Self {
        Self {
            matrix: Matrix3::new(sx, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 1.0),
        }
    }

    pub fn flip(horizontal: bool, vertical: bool) -> Self {
        let sx = if horizontal { -1.0 } else { 1.0 };
        let sy = if vertical { -1.0 } else { 1.0 };
        Self::scaling(sx, sy)
    }

    /// Shear with `x' = x + kx·y`, `y' = ky·x + y`.
    pub fn shear(kx: f32, ky: f32) -> Self {
        Self {
            matrix: Matrix3::new(1.0, kx, 0.0, ky, 1.0, 0.0, 0.0, 0.0, 1.0),
        }
    }

    /// Matrix product `self · other`.
    pub fn then(&self, other: &AffineTransform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    fn linear(&self) -> Matrix2<f32> {
        self.matrix.fixed_view::<2, 2>(0, 0).into_owned()
    }

    /// Inverse of the linear part, `None` when it is (nearly) singular.
    pub fn inverse_linear(&self) -> Option<Matrix2<f32>> {
        let lin = self.linear();
        let det = lin.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPS {
            return None;
        }
        let inv_det = 1.0 / det;
        Some(Matrix2::new(
            lin[(1, 1)] * inv_det,
            -lin[(0, 1)] * inv_det,
            -lin[(1, 0)] * inv_det,
            lin[(0, 0)] * inv_det,
        ))
    }
}

/// Resample `src` through `transform`; output has the same size.
pub fn apply_transform(
    src: RgbaView<'_>,
    transform: &AffineTransform,
) -> Result<RgbaImage, ImageError> {
    src.validate()?;
    let mut out = RgbaImage::new(src.w, src.h)?;
    let Some(inv) = transform.inverse_linear() else {
        debug!("apply_transform: singular transform, returning an empty image");
        return Ok(out);
    };
    if src.w == 0 || src.h == 0 {
        return Ok(out);
    }

    let row_len = src.w * CHANNELS;
    try_for_each_row_chunk(
        "apply_transform",
        &mut out.data,
        row_len,
        DEFAULT_CHUNK_ROWS,
        |start, rows| resample_rows(src, &inv, start, rows),
    )?;
    Ok(out)
}

fn resample_rows(src: RgbaView<'_>, inv: &Matrix2<f32>, start_row: usize, out: &mut [u8]) {
    let (w, h) = (src.w, src.h);
    let centre = Vector2::new(w as f32 / 2.0, h as f32 / 2.0);
    let max_x = (w - 1) as f32;
    let max_y = (h - 1) as f32;
    let row_len = w * CHANNELS;

    for (local_y, row) in out.chunks_mut(row_len).enumerate() {
        let y = start_row + local_y;
        for x in 0..w {
            let dst = Vector2::new(x as f32, y as f32) - centre;
            let orig = inv * dst + centre;
            let (ox, oy) = (orig.x, orig.y);
            if !(ox >= 0.0 && ox < max_x && oy >= 0.0 && oy < max_y) {
                continue;
            }
            let (x0, y0) = (ox as usize, oy as usize);
            let (dx, dy) = (ox - x0 as f32, oy - y0 as f32);
            for c in 0..CHANNELS {
                let p00 = f32::from(src.get(x0, y0, c));
                let p01 = f32::from(src.get(x0 + 1, y0, c));
                let p10 = f32::from(src.get(x0, y0 + 1, c));
                let p11 = f32::from(src.get(x0 + 1, y0 + 1, c));
                let value = (1.0 - dx) * (1.0 - dy) * p00
                    + dx * (1.0 - dy) * p01
                    + (1.0 - dx) * dy * p10
                    + dx * dy * p11;
                row[x * CHANNELS + c] = value as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(w: usize, h: usize) -> Vec<u8> {
        (0..w * h * CHANNELS).map(|i| (i % 200) as u8 + 10).collect()
    }

    #[test]
    fn identity_keeps_interior_and_clears_last_row_and_column() {
        let (w, h) = (5usize, 4usize);
        let data = pattern(w, h);
        let view = RgbaView::new(&data, w, h).unwrap();
        let out = apply_transform(view, &AffineTransform::identity()).unwrap();
        for y in 0..h {
            for x in 0..w {
                for c in 0..CHANNELS {
                    let expect = if x < w - 1 && y < h - 1 {
                        view.get(x, y, c)
                    } else {
                        0
                    };
                    assert_eq!(out.get(x, y, c), expect, "({x},{y},{c})");
                }
            }
        }
    }

    #[test]
    fn singular_transform_yields_zero_image() {
        let data = pattern(3, 3);
        let view = RgbaView::new(&data, 3, 3).unwrap();
        let out = apply_transform(view, &AffineTransform::scaling(0.0, 1.0)).unwrap();
        assert!(out.data.iter().all(|&v| v == 0));
    }

    #[test]
    fn composition_multiplies_matrices() {
        let r = AffineTransform::rotation(90.0);
        let twice = r.then(&r);
        let half_turn = AffineTransform::rotation(180.0);
        assert!((twice.matrix - half_turn.matrix).abs().max() < 1e-5);
        let flips = AffineTransform::flip(true, false).then(&AffineTransform::flip(true, false));
        assert_eq!(flips.matrix, Matrix3::identity());
    }

    #[test]
    fn inverse_of_shear() {
        let t = AffineTransform::shear(0.5, 0.0);
        let inv = t.inverse_linear().unwrap();
        let prod = t.linear() * inv;
        assert!((prod - Matrix2::identity()).abs().max() < 1e-6);
    }

    #[test]
    fn horizontal_flip_mirrors_about_centre() {
        // With the centre at w/2 = 2.5 for w = 5, x maps to 5 - x: pixel 1
        // reads column 4 (out of range) and pixel 2 reads column 3.
        let (w, h) = (5usize, 3usize);
        let data = pattern(w, h);
        let view = RgbaView::new(&data, w, h).unwrap();
        let out = apply_transform(view, &AffineTransform::flip(true, false)).unwrap();
        assert_eq!(out.get(2, 0, 0), view.get(3, 0, 0));
        assert_eq!(out.get(3, 1, 1), view.get(2, 1, 1));
        assert_eq!(out.get(1, 0, 0), 0);
    }

    #[test]
    fn short_source_buffer_surfaces_as_worker_fault() {
        // A view assembled by hand skips validation; sampling past its end
        // panics inside the row workers.
        let data = vec![50u8; 4 * 4 * CHANNELS];
        let view = RgbaView {
            w: 4,
            h: 8,
            data: &data,
        };
        let mut out = vec![0u8; 4 * 8 * CHANNELS];
        let inv = Matrix2::identity();
        let err = try_for_each_row_chunk("apply_transform", &mut out, 4 * CHANNELS, 2, |s, rows| {
            resample_rows(view, &inv, s, rows)
        });
        assert!(matches!(
            err,
            Err(ImageError::WorkerFault {
                stage: "apply_transform",
                ..
            })
        ));
        // Rows backed by real data were still written.
        assert_eq!(out[0], 50);
    }
}
