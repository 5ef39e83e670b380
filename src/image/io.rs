//! I/O helpers for RGBA images and JSON, used by the command line tools.
//!
//! - `load_rgba_image`: decode a PNG/JPEG into an owned RGBA buffer.
//! - `save_rgba_image`: write an RGBA buffer to disk (format from extension).
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{RgbaImage, RgbaView};
use image::{ImageBuffer, Rgba};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert it to 8-bit RGBA.
pub fn load_rgba_image(path: &Path) -> Result<RgbaImage, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgba8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    RgbaImage::from_raw(width, height, img.into_raw())
        .map_err(|e| format!("Failed to wrap {}: {e}", path.display()))
}

/// Save an RGBA buffer, creating parent directories as needed.
pub fn save_rgba_image(view: RgbaView<'_>, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let width = u32::try_from(view.w).map_err(|_| format!("Width {} too large", view.w))?;
    let height = u32::try_from(view.h).map_err(|_| format!("Height {} too large", view.h))?;
    let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width, height, view.data.to_vec())
            .ok_or_else(|| "Failed to create image buffer".to_string())?;
    buffer
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
