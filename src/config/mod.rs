//! JSON configuration for the command-line tools.
pub mod tool;

pub use tool::{load_config, OperationConfig, ProcessOutputConfig, ProcessToolConfig, TransformStep};
