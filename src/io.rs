// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! I/O utilities for writing animations and intermediate arrays.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use serde::Serialize;

use crate::error::{PipelineError, Result};

/// GIF quantization speed (1 = best quality, 30 = fastest).
const GIF_SPEED: i32 = 10;

/// Per-frame duration in whole milliseconds for the given playback rate.
#[must_use]
pub const fn frame_delay_ms(fps: u32) -> u32 {
    if fps == 0 { 0 } else { 1000 / fps }
}

/// Create the parent directory of `path` if it does not exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            PipelineError::IoError(format!("Failed to create directory {}: {e}", parent.display()))
        })?;
    }
    Ok(())
}

/// Encode frames into an infinitely looping animated GIF.
///
/// # Arguments
///
/// * `frames` - Ordered RGBA frames, all the same size.
/// * `path` - Output file path.
/// * `fps` - Playback rate; each frame lasts `1000 / fps` ms.
///
/// # Errors
///
/// Returns an error if `frames` is empty, `fps` is zero, or encoding fails.
pub fn save_animation<P: AsRef<Path>>(frames: &[RgbaImage], path: P, fps: u32) -> Result<()> {
    let path = path.as_ref();
    if frames.is_empty() {
        return Err(PipelineError::ImageError("No frames to encode".to_string()));
    }
    if fps == 0 {
        return Err(PipelineError::ConfigError("fps must be positive".to_string()));
    }
    ensure_parent_dir(path)?;

    let file = File::create(path)
        .map_err(|e| PipelineError::IoError(format!("Failed to create {}: {e}", path.display())))?;
    let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), GIF_SPEED);
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_numer_denom_ms(frame_delay_ms(fps), 1);
    encoder.encode_frames(
        frames
            .iter()
            .map(|img| Frame::from_parts(img.clone(), 0, 0, delay)),
    )?;
    Ok(())
}

/// Write a value as compact JSON.
///
/// # Returns
///
/// Number of bytes written.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<u64> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let bytes = serde_json::to_vec(value)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(bytes.len() as u64)
}

/// Size of a file in bytes, or 0 if it cannot be read.
#[must_use]
pub fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Output directory layout for a batch run.
///
/// ```text
/// <root>/projected/<slug>.npy
/// <root>/gif/<slug>.gif
/// <root>/lottie/<slug>.json
/// ```
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Create a layout rooted at `root`.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the projected `(T, 22, 2)` array.
    #[must_use]
    pub fn projected(&self, slug: &str) -> PathBuf {
        self.root.join("projected").join(format!("{slug}.npy"))
    }

    /// Path of the raster animation.
    #[must_use]
    pub fn raster(&self, slug: &str) -> PathBuf {
        self.root.join("gif").join(format!("{slug}.gif"))
    }

    /// Path of the vector animation.
    #[must_use]
    pub fn vector(&self, slug: &str) -> PathBuf {
        self.root.join("lottie").join(format!("{slug}.json"))
    }
}
