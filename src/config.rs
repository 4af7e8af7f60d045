// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pipeline configuration.
//!
//! This module defines [`PipelineConfig`], which groups the canvas, timing, keyframe and
//! styling parameters shared by every stage. It uses a builder pattern and can also be
//! loaded from a JSON file where missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::keyframes::KeyframeConfig;
use crate::motion::DEFAULT_SOURCE_FPS;
use crate::render::RenderStyle;

/// Default square canvas size in pixels.
pub const DEFAULT_CANVAS_SIZE: u32 = 400;
/// Default fraction of the canvas left empty on each side.
pub const DEFAULT_PADDING: f32 = 0.15;
/// Default raster playback rate.
pub const DEFAULT_TARGET_FPS: u32 = 15;

/// Configuration for the animation pipeline.
///
/// # Example
///
/// ```rust
/// use exercise_animation::PipelineConfig;
///
/// let config = PipelineConfig::new()
///     .with_canvas_size(512)
///     .with_padding(0.1)
///     .with_camera_angle(45.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Width and height of the output canvas in pixels.
    pub canvas_size: u32,
    /// Fraction of the canvas reserved as margin on each side, in `[0, 0.5)`.
    pub padding: f32,
    /// Frame rate of the input motion.
    pub source_fps: u32,
    /// Frame rate of the raster animation.
    pub target_fps: u32,
    /// Default camera rotation about the vertical axis, in degrees.
    pub camera_angle: f32,
    /// Keyframe detection parameters.
    pub keyframes: KeyframeConfig,
    /// Bone and joint styling.
    pub style: RenderStyle,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            padding: DEFAULT_PADDING,
            source_fps: DEFAULT_SOURCE_FPS,
            target_fps: DEFAULT_TARGET_FPS,
            camera_angle: 0.0,
            keyframes: KeyframeConfig::default(),
            style: RenderStyle::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or fails
    /// [`validate`](Self::validate).
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::IoError(format!("Failed to read config {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the canvas size.
    #[must_use]
    pub const fn with_canvas_size(mut self, size: u32) -> Self {
        self.canvas_size = size;
        self
    }

    /// Set the padding fraction.
    #[must_use]
    pub const fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Set the input frame rate.
    #[must_use]
    pub const fn with_source_fps(mut self, fps: u32) -> Self {
        self.source_fps = fps;
        self
    }

    /// Set the raster playback rate.
    #[must_use]
    pub const fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Set the default camera angle in degrees.
    #[must_use]
    pub const fn with_camera_angle(mut self, degrees: f32) -> Self {
        self.camera_angle = degrees;
        self
    }

    /// Set the keyframe detection parameters.
    #[must_use]
    pub const fn with_keyframes(mut self, keyframes: KeyframeConfig) -> Self {
        self.keyframes = keyframes;
        self
    }

    /// Set the render style.
    #[must_use]
    pub const fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Check every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ConfigError`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.canvas_size == 0 {
            return Err(PipelineError::ConfigError("canvas_size must be positive".to_string()));
        }
        if !(0.0..0.5).contains(&self.padding) {
            return Err(PipelineError::ConfigError(format!(
                "padding must be in [0, 0.5), got {}",
                self.padding
            )));
        }
        if self.source_fps == 0 || self.target_fps == 0 {
            return Err(PipelineError::ConfigError("fps must be positive".to_string()));
        }
        if !self.camera_angle.is_finite() {
            return Err(PipelineError::ConfigError("camera_angle must be finite".to_string()));
        }
        self.keyframes.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::Color;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.canvas_size, 400);
        assert!((config.padding - 0.15).abs() < f32::EPSILON);
        assert_eq!(config.source_fps, 30);
        assert_eq!(config.target_fps, 15);
        assert!(config.camera_angle.abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = PipelineConfig::new()
            .with_canvas_size(256)
            .with_padding(0.1)
            .with_source_fps(60)
            .with_target_fps(20)
            .with_camera_angle(90.0)
            .with_keyframes(KeyframeConfig::new().with_threshold(5.0));
        assert_eq!(config.canvas_size, 256);
        assert_eq!(config.source_fps, 60);
        assert_eq!(config.target_fps, 20);
        assert!((config.keyframes.threshold_degrees - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_validation() {
        assert!(PipelineConfig::new().with_canvas_size(0).validate().is_err());
        assert!(PipelineConfig::new().with_padding(0.5).validate().is_err());
        assert!(PipelineConfig::new().with_padding(-0.1).validate().is_err());
        assert!(PipelineConfig::new().with_target_fps(0).validate().is_err());
        assert!(PipelineConfig::new().with_camera_angle(f32::NAN).validate().is_err());
        assert!(PipelineConfig::new().with_padding(0.0).validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r##"{"canvas_size": 300, "keyframes": {"threshold_degrees": 20.0}, "style": {"bone_color": "#000000"}}"##,
        )
        .unwrap();

        let config = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.canvas_size, 300);
        assert_eq!(config.target_fps, 15);
        assert!((config.keyframes.threshold_degrees - 20.0).abs() < f32::EPSILON);
        assert!((config.keyframes.min_displacement - 5.0).abs() < f32::EPSILON);
        assert_eq!(config.style.bone_color, Color::BLACK);
        assert_eq!(config.style.joint_radius, 6);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"padding": 0.7}"#).unwrap();
        assert!(matches!(
            PipelineConfig::from_json_file(&path),
            Err(PipelineError::ConfigError(_))
        ));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            PipelineConfig::from_json_file(&path),
            Err(PipelineError::SerializationError(_))
        ));
    }
}
