//! Distortion measures between two equally sized sample buffers.
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub mean_abs_diff: f64,
    pub mse: f64,
    /// Peak signal-to-noise ratio in dB; `None` for identical inputs.
    pub psnr_db: Option<f64>,
}

impl QualityReport {
    /// Compare `reference` and `candidate`; `None` if the lengths differ.
    pub fn compare(reference: &[u8], candidate: &[u8]) -> Option<Self> {
        if reference.len() != candidate.len() {
            return None;
        }
        if reference.is_empty() {
            return Some(Self::default());
        }
        let n = reference.len() as f64;
        let (abs_sum, sq_sum) = reference
            .iter()
            .zip(candidate)
            .fold((0.0f64, 0.0f64), |(abs, sq), (&a, &b)| {
                let d = f64::from(a) - f64::from(b);
                (abs + d.abs(), sq + d * d)
            });
        let mse = sq_sum / n;
        let psnr_db = (mse > 0.0).then(|| 10.0 * (255.0f64 * 255.0 / mse).log10());
        Some(Self {
            mean_abs_diff: abs_sum / n,
            mse,
            psnr_db,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_buffers_have_no_distortion() {
        let a = [1u8, 2, 3, 4];
        let q = QualityReport::compare(&a, &a).unwrap();
        assert_eq!(q.mean_abs_diff, 0.0);
        assert_eq!(q.mse, 0.0);
        assert!(q.psnr_db.is_none());
    }

    #[test]
    fn simple_difference() {
        let q = QualityReport::compare(&[0, 0, 10, 10], &[0, 2, 10, 12]).unwrap();
        assert_eq!(q.mean_abs_diff, 1.0);
        assert_eq!(q.mse, 2.0);
        assert!(q.psnr_db.unwrap() > 40.0);
        assert!(QualityReport::compare(&[0], &[0, 1]).is_none());
    }
}
