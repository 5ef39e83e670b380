//! Fixed 3×3 kernels selectable by name.
use serde::{Deserialize, Serialize};

/// Row-major 3×3 weights, `k[dy + 1][dx + 1]` weighs the neighbour at
/// `(x + dx, y + dy)`.
pub type Kernel3 = [[f64; 3]; 3];

const NINTH: f64 = 1.0 / 9.0;

pub const BLUR_KERNEL: Kernel3 = [[NINTH; 3]; 3];
pub const SHARPEN_KERNEL: Kernel3 = [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];
pub const EDGE_KERNEL: Kernel3 = [[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]];
pub const EMBOSS_KERNEL: Kernel3 = [[-2.0, -1.0, 0.0], [-1.0, 1.0, 1.0], [0.0, 1.0, 2.0]];

/// Named filter. Unrecognised names resolve to [`FilterKind::Identity`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Blur,
    Sharpen,
    Edge,
    Emboss,
    Identity,
}

impl FilterKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "blur" => Self::Blur,
            "sharpen" => Self::Sharpen,
            "edge" => Self::Edge,
            "emboss" => Self::Emboss,
            _ => Self::Identity,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Blur => "blur",
            Self::Sharpen => "sharpen",
            Self::Edge => "edge",
            Self::Emboss => "emboss",
            Self::Identity => "identity",
        }
    }

    /// Weights for this filter; `None` means the output is a plain copy.
    pub fn kernel(self) -> Option<&'static Kernel3> {
        match self {
            Self::Blur => Some(&BLUR_KERNEL),
            Self::Sharpen => Some(&SHARPEN_KERNEL),
            Self::Edge => Some(&EDGE_KERNEL),
            Self::Emboss => Some(&EMBOSS_KERNEL),
            Self::Identity => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in [
            FilterKind::Blur,
            FilterKind::Sharpen,
            FilterKind::Edge,
            FilterKind::Emboss,
        ] {
            assert_eq!(FilterKind::from_name(kind.name()), kind);
        }
    }

    #[test]
    fn unknown_names_are_identity() {
        assert_eq!(FilterKind::from_name("unknown"), FilterKind::Identity);
        assert_eq!(FilterKind::from_name("Blur"), FilterKind::Identity);
        assert!(FilterKind::Identity.kernel().is_none());
    }

    #[test]
    fn smoothing_kernels_preserve_flat_regions() {
        for kernel in [&BLUR_KERNEL, &SHARPEN_KERNEL] {
            let sum: f64 = kernel.iter().flatten().sum();
            assert!((sum - 1.0).abs() < 1e-12);
        }
        let edge_sum: f64 = EDGE_KERNEL.iter().flatten().sum();
        assert_eq!(edge_sum, 0.0);
    }
}
