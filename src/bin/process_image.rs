use serde::Serialize;
use std::env;
use std::path::Path;
use std::time::Instant;
use tiny_img::compress::ChannelCompressor;
use tiny_img::config::tool::{compose_steps, load_config, OperationConfig};
use tiny_img::diagnostics::{elapsed_ms, CompressionReport, QualityReport, TimingBreakdown};
use tiny_img::filters::{apply_filter_kind, FilterKind};
use tiny_img::image::io::{load_rgba_image, save_rgba_image, write_json_file};
use tiny_img::transform::apply_transform;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    let total_start = Instant::now();

    let input = load_rgba_image(&config.input)?;
    let compressor = ChannelCompressor::new(config.compress);
    let mut current = input.clone();
    let mut timing = TimingBreakdown::default();
    let mut steps = Vec::with_capacity(config.operations.len());

    for (index, op) in config.operations.iter().enumerate() {
        let start = Instant::now();
        let (next, compression) = match op {
            OperationConfig::Filter { name } => {
                let kind = FilterKind::from_name(name);
                let out = apply_filter_kind(current.as_view(), kind, &config.filter)
                    .map_err(|e| format!("Operation {index} (filter {name}) failed: {e}"))?;
                (out, None)
            }
            OperationConfig::Compress { rank } => {
                let mut report = compressor
                    .compress(current.as_view(), *rank)
                    .map_err(|e| format!("Operation {index} (compress {rank}) failed: {e}"))?;
                let out = std::mem::take(&mut report.image);
                (out, Some(report))
            }
            OperationConfig::Transform { steps: chain } => {
                let out = apply_transform(current.as_view(), &compose_steps(chain))
                    .map_err(|e| format!("Operation {index} (transform) failed: {e}"))?;
                (out, None)
            }
        };
        let label = operation_label(op);
        let ms = elapsed_ms(start);
        timing.push(label.clone(), ms);
        steps.push(OperationSummary {
            index,
            operation: label,
            elapsed_ms: ms,
            compression,
        });
        current = next;
    }
    timing.total_ms = elapsed_ms(total_start);

    save_rgba_image(current.as_view(), &config.output.image)?;
    println!(
        "Saved {}x{} result of {} operation(s) to {}",
        current.w,
        current.h,
        steps.len(),
        config.output.image.display()
    );

    if let Some(path) = &config.output.summary_json {
        let summary = RunSummary {
            input: config.input.display().to_string(),
            width: current.w,
            height: current.h,
            quality: QualityReport::compare(&input.data, &current.data),
            operations: steps,
            timing,
        };
        write_json_file(path, &summary)?;
        println!("Saved run summary to {}", path.display());
    }

    Ok(())
}

fn operation_label(op: &OperationConfig) -> String {
    match op {
        OperationConfig::Filter { name } => format!("filter:{name}"),
        OperationConfig::Compress { rank } => format!("compress:{rank}"),
        OperationConfig::Transform { steps } => format!("transform:{}", steps.len()),
    }
}

fn usage() -> String {
    "Usage: process_image <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OperationSummary {
    index: usize,
    operation: String,
    elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    compression: Option<CompressionReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunSummary {
    input: String,
    width: usize,
    height: usize,
    /// Distortion of the final image against the input (same size).
    quality: Option<QualityReport>,
    operations: Vec<OperationSummary>,
    timing: TimingBreakdown,
}
