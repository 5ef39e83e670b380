use crate::compress::CompressOptions;
use crate::filters::FilterOptions;
use crate::transform::AffineTransform;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration of the `process_image` tool.
#[derive(Debug, Deserialize)]
pub struct ProcessToolConfig {
    #[serde(rename = "input")]
    pub input: PathBuf,
    /// Operations applied in order, each to the previous result.
    pub operations: Vec<OperationConfig>,
    #[serde(default)]
    pub filter: FilterOptions,
    #[serde(default)]
    pub compress: CompressOptions,
    pub output: ProcessOutputConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OperationConfig {
    /// Named 3×3 filter; unknown names copy the image.
    Filter { name: String },
    /// SVD compression to `rank` triplets per channel.
    Compress { rank: i64 },
    /// Affine transform composed left to right from `steps`.
    Transform { steps: Vec<TransformStep> },
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformStep {
    Rotate { degrees: f32 },
    Scale { sx: f32, sy: f32 },
    Flip {
        #[serde(default)]
        horizontal: bool,
        #[serde(default)]
        vertical: bool,
    },
    Shear { kx: f32, ky: f32 },
}

impl TransformStep {
    pub fn to_transform(self) -> AffineTransform {
        match self {
            Self::Rotate { degrees } => AffineTransform::rotation(degrees),
            Self::Scale { sx, sy } => AffineTransform::scaling(sx, sy),
            Self::Flip {
                horizontal,
                vertical,
            } => AffineTransform::flip(horizontal, vertical),
            Self::Shear { kx, ky } => AffineTransform::shear(kx, ky),
        }
    }
}

/// Compose `steps` as `s0 · s1 · …`; an empty list is the identity.
pub fn compose_steps(steps: &[TransformStep]) -> AffineTransform {
    steps
        .iter()
        .fold(AffineTransform::identity(), |acc, step| {
            acc.then(&step.to_transform())
        })
}

#[derive(Debug, Deserialize)]
pub struct ProcessOutputConfig {
    #[serde(rename = "image")]
    pub image: PathBuf,
    #[serde(rename = "summary_json", default)]
    pub summary_json: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<ProcessToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

pub fn parse_config(json: &str) -> Result<ProcessToolConfig, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_operations_and_defaults() {
        let cfg = parse_config(
            r#"{
                "input": "in.png",
                "operations": [
                    {"op": "filter", "name": "sharpen"},
                    {"op": "compress", "rank": 12},
                    {"op": "transform", "steps": [
                        {"kind": "rotate", "degrees": 30.0},
                        {"kind": "flip", "horizontal": true}
                    ]}
                ],
                "compress": {"jacobi": {"max_sweeps": 4}},
                "output": {"image": "out/result.png"}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.operations.len(), 3);
        assert!(matches!(&cfg.operations[0], OperationConfig::Filter { name } if name == "sharpen"));
        assert!(matches!(cfg.operations[1], OperationConfig::Compress { rank: 12 }));
        assert_eq!(cfg.filter.chunk_rows, 64);
        assert_eq!(cfg.compress.jacobi.max_sweeps, 4);
        assert!(cfg.compress.concurrent_channels);
        assert!(cfg.output.summary_json.is_none());
    }

    #[test]
    fn empty_step_list_is_identity() {
        assert_eq!(compose_steps(&[]), AffineTransform::identity());
        let t = compose_steps(&[TransformStep::Scale { sx: 2.0, sy: 3.0 }]);
        assert_eq!(t, AffineTransform::scaling(2.0, 3.0));
    }
}
