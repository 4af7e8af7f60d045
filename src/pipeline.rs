// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Per-exercise pipeline: project, then render raster and vector animations.

use std::fmt;

use clap::ValueEnum;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::io::{OutputLayout, file_size, save_animation, write_json};
use crate::keyframes::optimize_all_joints;
use crate::lottie::create_lottie_animation;
use crate::motion::{Motion, ScreenMotion};
use crate::projection::{Projection, project};
use crate::render::render_frames;

/// Which animations to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Animated raster image only.
    Gif,
    /// Lottie JSON only.
    Lottie,
    /// Both formats.
    #[default]
    All,
}

impl OutputFormat {
    /// Whether a raster animation is produced.
    #[must_use]
    pub const fn raster(self) -> bool {
        matches!(self, Self::Gif | Self::All)
    }

    /// Whether a vector animation is produced.
    #[must_use]
    pub const fn vector(self) -> bool {
        matches!(self, Self::Lottie | Self::All)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gif => "gif",
            Self::Lottie => "lottie",
            Self::All => "all",
        };
        write!(f, "{name}")
    }
}

/// Statistics for one processed exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseReport {
    /// Exercise slug.
    pub slug: String,
    /// Camera angle used, in degrees; `None` when the motion was already projected.
    pub camera_angle: Option<f32>,
    /// Source frame count.
    pub frames: usize,
    /// Frames written to the raster animation.
    pub raster_frames: usize,
    /// Dense keyframe count, `T * 22`.
    pub possible_keyframes: usize,
    /// Keyframes kept in the vector animation.
    pub optimized_keyframes: usize,
    /// Percentage of keyframes removed.
    pub reduction_percent: f64,
    /// Raster file size in bytes.
    pub raster_bytes: u64,
    /// Vector file size in bytes.
    pub vector_bytes: u64,
    /// Whether the bounding box was degenerate in both axes.
    pub fallback_scale: bool,
}

impl ExerciseReport {
    /// Total bytes written for the animations.
    #[must_use]
    pub const fn output_bytes(&self) -> u64 {
        self.raster_bytes + self.vector_bytes
    }
}

/// Whether every requested output for `slug` already exists.
#[must_use]
pub fn outputs_exist(layout: &OutputLayout, slug: &str, format: OutputFormat) -> bool {
    (!format.raster() || layout.raster(slug).exists()) && (!format.vector() || layout.vector(slug).exists())
}

/// Project a motion to screen space using the configured canvas.
///
/// # Errors
///
/// Returns an error if the configuration is rejected by [`project`].
pub fn project_motion(motion: &Motion, angle: f32, config: &PipelineConfig) -> Result<Projection> {
    let projection = project(motion, angle, config.canvas_size, config.padding)?;
    crate::verbose!(
        "  bbox {:.3} x {:.3}, scale {:.1} px/unit",
        projection.bbox.width(),
        projection.bbox.height(),
        projection.scale
    );
    Ok(projection)
}

/// Which stages a batch runs for each exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// 3D motion to projected `.npy` only.
    Project,
    /// Projected `.npy` to animations.
    Render(OutputFormat),
    /// 3D motion to animations, keeping the projected `.npy`.
    Full(OutputFormat),
}

impl From<OutputFormat> for Stage {
    fn from(format: OutputFormat) -> Self {
        Self::Full(format)
    }
}

impl Stage {
    /// Whether every output of this stage already exists for `slug`.
    #[must_use]
    pub fn outputs_exist(self, layout: &OutputLayout, slug: &str) -> bool {
        match self {
            Self::Project => layout.projected(slug).exists(),
            Self::Render(format) | Self::Full(format) => outputs_exist(layout, slug, format),
        }
    }
}

fn empty_report(slug: &str, frames: usize) -> ExerciseReport {
    ExerciseReport {
        slug: slug.to_string(),
        camera_angle: None,
        frames,
        raster_frames: 0,
        possible_keyframes: 0,
        optimized_keyframes: 0,
        reduction_percent: 0.0,
        raster_bytes: 0,
        vector_bytes: 0,
        fallback_scale: false,
    }
}

/// Project a motion and write the screen-space array.
///
/// # Errors
///
/// Returns an error if projection or the write fails.
pub fn project_and_save(
    slug: &str,
    motion: &Motion,
    angle: f32,
    config: &PipelineConfig,
    layout: &OutputLayout,
) -> Result<(Projection, ExerciseReport)> {
    let projection = project_motion(motion, angle, config)?;
    projection.screen.save(layout.projected(slug))?;

    let mut report = empty_report(slug, projection.screen.num_frames());
    report.camera_angle = Some(angle);
    report.fallback_scale = projection.used_fallback_scale();
    Ok((projection, report))
}

/// Render raster and vector animations from a projected motion.
///
/// # Arguments
///
/// * `slug` - Exercise identifier used for output file names.
/// * `screen` - Canvas-space joint positions.
/// * `source_fps` - Frame rate of `screen`.
/// * `config` - Canvas, timing, keyframe and style settings.
/// * `format` - Which animations to write.
/// * `layout` - Output directory layout.
/// * `report` - Report to fill in.
///
/// # Errors
///
/// Returns the first error from keyframe detection, encoding or writing.
pub fn render_screen(
    slug: &str,
    screen: &ScreenMotion,
    source_fps: u32,
    config: &PipelineConfig,
    format: OutputFormat,
    layout: &OutputLayout,
    mut report: ExerciseReport,
) -> Result<ExerciseReport> {
    if format.raster() {
        let sampled = screen.subsample(source_fps, config.target_fps);
        let frames = render_frames(&sampled, config.canvas_size, &config.style);
        let path = layout.raster(slug);
        save_animation(&frames, &path, config.target_fps)?;
        report.raster_frames = frames.len();
        report.raster_bytes = file_size(&path);
        crate::verbose!("  {} frames -> {}", frames.len(), path.display());
    }

    if format.vector() {
        let keyframes = optimize_all_joints(screen, &config.keyframes)?;
        let animation =
            create_lottie_animation(screen, &keyframes, config.canvas_size, config.target_fps, &config.style);
        let path = layout.vector(slug);
        report.vector_bytes = write_json(&path, &animation)?;
        report.possible_keyframes = keyframes.possible_keyframes();
        report.optimized_keyframes = keyframes.total_keyframes();
        report.reduction_percent = keyframes.reduction_percent();
        crate::verbose!(
            "  {} -> {} keyframes ({:.1}% reduction) -> {}",
            report.possible_keyframes,
            report.optimized_keyframes,
            report.reduction_percent,
            path.display()
        );
    }

    Ok(report)
}

/// Render animations from a previously projected motion at the configured source rate.
///
/// # Errors
///
/// Returns an error if keyframe detection, encoding or writing fails.
pub fn render_projected(
    slug: &str,
    screen: &ScreenMotion,
    config: &PipelineConfig,
    format: OutputFormat,
    layout: &OutputLayout,
) -> Result<ExerciseReport> {
    let report = empty_report(slug, screen.num_frames());
    render_screen(slug, screen, config.source_fps, config, format, layout, report)
}

/// Run the full pipeline for one exercise and write its outputs.
///
/// # Arguments
///
/// * `slug` - Exercise identifier used for output file names.
/// * `motion` - 3D joint positions.
/// * `angle` - Camera angle in degrees.
/// * `config` - Canvas, timing, keyframe and style settings.
/// * `format` - Which animations to write.
/// * `layout` - Output directory layout.
///
/// # Errors
///
/// Returns the first error from projection, keyframe detection, rendering or writing.
pub fn process_motion(
    slug: &str,
    motion: &Motion,
    angle: f32,
    config: &PipelineConfig,
    format: OutputFormat,
    layout: &OutputLayout,
) -> Result<ExerciseReport> {
    let (projection, report) = project_and_save(slug, motion, angle, config, layout)?;
    render_screen(slug, &projection.screen, motion.fps(), config, format, layout, report)
}
