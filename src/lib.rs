// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Exercise Animation Pipeline
//!
//! Turns 3D exercise motion capture into lightweight 2D stick-figure animations, written
//! as an animated GIF and a keyframe-optimized [Lottie](https://lottiefiles.github.io/lottie-docs/)
//! document.
//!
//! ## Features
//!
//! - **Stable Framing** - One global bounding box per motion, so the figure never jitters
//! - **Camera Angles** - Front, three-quarter, side, or any angle about the vertical axis
//! - **Keyframe Reduction** - Direction-change detection keeps only the frames that matter
//! - **Batch Processing** - Directories or globs of `.npy` files, with worker threads
//! - **Synthetic Data** - Built-in parametric exercises for smoke tests
//!
//! ## Motion Format
//!
//! Input motions are `(T, 22, 3)` `float32` `.npy` arrays in meters, Y up, following the
//! SMPL-H 22 body-joint order (see [`skeleton::JOINT_NAMES`]).
//!
//! ## Quick Start (Library)
//!
//! ```no_run
//! use exercise_animation::{KeyframeConfig, Motion, optimize_all_joints, project};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let motion = Motion::load("motion_data/bodyweight-squat.npy", 30)?;
//!
//!     // 400px canvas, 15% padding, viewed from 45 degrees
//!     let projection = project(&motion, 45.0, 400, 0.15)?;
//!     println!("scale: {:.1} px/m", projection.scale);
//!
//!     let keyframes = optimize_all_joints(&projection.screen, &KeyframeConfig::default())?;
//!     println!(
//!         "{} -> {} keyframes ({:.1}% reduction)",
//!         keyframes.possible_keyframes(),
//!         keyframes.total_keyframes(),
//!         keyframes.reduction_percent()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Generate the synthetic exercises
//! exercise-animation synth --output motion_data
//!
//! # Full pipeline on a directory
//! exercise-animation run --source motion_data --output output
//!
//! # Per-exercise camera angles and lottie only
//! exercise-animation run -s motion_data --angles angles.json --format lottie
//! ```
//!
//! **CLI Options:**
//!
//! | Option | Description | Default |
//! |--------|-------------|---------|
//! | `--source`, `-s` | `.npy` file, directory, or `dir/*.npy` | `motion_data` |
//! | `--output`, `-o` | Output root | `output` |
//! | `--angle` | Camera angle preset or degrees | `0` |
//! | `--canvas` | Canvas size in pixels | `400` |
//! | `--padding` | Padding fraction per side | `0.15` |
//! | `--fps` | Output frame rate | `15` |
//! | `--threshold` | Keyframe direction threshold (degrees) | `10` |
//! | `--min-displacement` | Keyframe displacement gate (pixels) | `5` |
//! | `--format` | `gif`, `lottie` or `all` | `all` |
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`motion`] | Motion containers ([`Motion`], [`ScreenMotion`]) |
//! | [`projection`] | 3D to 2D projection ([`project`], [`CameraAngle`]) |
//! | [`keyframes`] | Keyframe detection ([`detect_keyframes`], [`KeyframeMap`]) |
//! | [`render`] | Raster stick-figure drawing |
//! | [`lottie`] | Lottie document assembly |
//! | [`batch`] | Multi-exercise driver |
//! | [`error`] | Error types ([`PipelineError`], [`Result`]) |

// Modules
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod keyframes;
pub mod lottie;
pub mod motion;
pub mod pipeline;
pub mod projection;
pub mod render;
pub mod skeleton;
pub mod source;
pub mod synthetic;
pub mod utils;
pub mod visualizer;

// Re-export main types for convenience
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use keyframes::{KeyframeConfig, KeyframeMap, detect_keyframes, optimize_all_joints, union_keyframes};
pub use lottie::{LottieAnimation, create_lottie_animation};
pub use motion::{Motion, ScreenMotion};
pub use pipeline::{ExerciseReport, OutputFormat, process_motion};
pub use projection::{BoundingBox, CameraAngle, Projection, global_bounding_box, project};
pub use render::{RenderStyle, render_frame};
pub use visualizer::Color;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
