// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use clap::{Args, Parser, Subcommand};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::OutputFormat;
use crate::projection::CameraAngle;

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Examples:
    exercise-animation synth --output motion_data
    exercise-animation project --source motion_data --angle three-quarter-front
    exercise-animation render --source output/projected --format lottie
    exercise-animation run --source motion_data --angles angles.json --workers 4
    exercise-animation run -s "motion_data/*.npy" --canvas 512 --threshold 15 --overwrite"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate synthetic exercise motions as .npy files
    Synth(SynthArgs),
    /// Project 3D motions to canvas-space .npy files
    Project(PipelineArgs),
    /// Render projected motions to GIF and Lottie animations
    Render(PipelineArgs),
    /// Run projection and rendering in one pass
    Run(PipelineArgs),
}

/// Arguments for the synth command.
#[derive(Args, Debug)]
pub struct SynthArgs {
    /// Output directory for generated motions
    #[arg(short, long, default_value = "motion_data")]
    pub output: String,

    /// Generate only this exercise (slug)
    #[arg(short, long)]
    pub exercise: Option<String>,

    /// Override the number of frames per exercise
    #[arg(long)]
    pub frames: Option<usize>,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

/// Arguments shared by project, render and run.
#[derive(Args, Debug)]
#[allow(clippy::struct_field_names)]
pub struct PipelineArgs {
    /// Input source (.npy file, directory, or glob like "dir/*.npy")
    #[arg(short, long, default_value = "motion_data")]
    pub source: String,

    /// Output root directory
    #[arg(short, long, default_value = "output")]
    pub output: String,

    /// JSON configuration file; flags override its values
    #[arg(long)]
    pub config: Option<String>,

    /// Camera angle: front, three-quarter-front, side, three-quarter-back, or degrees
    #[arg(long)]
    pub angle: Option<CameraAngle>,

    /// JSON map of per-exercise camera angles in degrees
    #[arg(long)]
    pub angles: Option<String>,

    /// Canvas size in pixels [default: 400]
    #[arg(long)]
    pub canvas: Option<u32>,

    /// Padding fraction per side [default: 0.15]
    #[arg(long)]
    pub padding: Option<f32>,

    /// Output animation frame rate [default: 15]
    #[arg(long)]
    pub fps: Option<u32>,

    /// Frame rate of the input motion [default: 30]
    #[arg(long)]
    pub source_fps: Option<u32>,

    /// Keyframe direction-change threshold in degrees [default: 10]
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Keyframe minimum displacement in pixels [default: 5]
    #[arg(long)]
    pub min_displacement: Option<f32>,

    /// Which animations to write
    #[arg(long, value_enum, default_value_t = OutputFormat::All)]
    pub format: OutputFormat,

    /// Number of worker threads
    #[arg(long, default_value_t = 1)]
    pub workers: usize,

    /// Process at most this many exercises
    #[arg(long)]
    pub limit: Option<usize>,

    /// Regenerate outputs that already exist
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

impl PipelineArgs {
    /// Build the pipeline configuration from the optional file and flag overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the result is invalid.
    pub fn resolve_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(canvas) = self.canvas {
            config = config.with_canvas_size(canvas);
        }
        if let Some(padding) = self.padding {
            config = config.with_padding(padding);
        }
        if let Some(fps) = self.fps {
            config = config.with_target_fps(fps);
        }
        if let Some(fps) = self.source_fps {
            config = config.with_source_fps(fps);
        }
        if let Some(angle) = self.angle {
            config = config.with_camera_angle(angle.degrees());
        }
        if let Some(threshold) = self.threshold {
            config.keyframes = config.keyframes.with_threshold(threshold);
        }
        if let Some(pixels) = self.min_displacement {
            config.keyframes = config.keyframes.with_min_displacement(pixels);
        }

        config.validate()?;
        Ok(config)
    }
}
