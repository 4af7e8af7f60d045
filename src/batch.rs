// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Batch processing module.
//!
//! This module provides the [`BatchProcessor`] struct, which runs the per-exercise
//! pipeline over many motion files. A failure in one exercise is reported and the batch
//! moves on; it never aborts the remaining exercises.

use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc;

use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::io::OutputLayout;
use crate::motion::{Motion, ScreenMotion};
use crate::pipeline::{ExerciseReport, Stage, process_motion, project_and_save, render_projected};
use crate::source::MotionEntry;

/// Per-exercise camera angles keyed by slug, in degrees.
pub type AngleMap = HashMap<String, f32>;

/// Load a `{slug: degrees}` JSON map.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_angle_map<P: AsRef<Path>>(path: P) -> Result<AngleMap> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::IoError(format!("Failed to read angles {}: {e}", path.display()))
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Result of one exercise in a batch.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Outputs were written.
    Processed(ExerciseReport),
    /// Outputs already existed.
    Skipped,
    /// The exercise failed with the given message.
    Failed(String),
}

/// One exercise's outcome, in input order.
#[derive(Debug, Clone)]
pub struct ItemReport {
    /// Position in the batch.
    pub index: usize,
    /// Exercise slug.
    pub slug: String,
    /// What happened.
    pub outcome: Outcome,
}

/// Aggregate statistics for a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    /// Exercises written.
    pub processed: usize,
    /// Exercises skipped because outputs existed.
    pub skipped: usize,
    /// Exercises that failed.
    pub failed: usize,
    /// Dense keyframe count over processed exercises.
    pub keyframes_before: usize,
    /// Kept keyframe count over processed exercises.
    pub keyframes_after: usize,
    /// Bytes written over processed exercises.
    pub output_bytes: u64,
    /// How many projected exercises used each camera angle, sorted by angle.
    pub angle_usage: Vec<(f32, usize)>,
}

impl BatchSummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Processed(report) => {
                self.processed += 1;
                self.keyframes_before += report.possible_keyframes;
                self.keyframes_after += report.optimized_keyframes;
                self.output_bytes += report.output_bytes();
                if let Some(angle) = report.camera_angle {
                    self.record_angle(angle);
                }
            }
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }

    fn record_angle(&mut self, angle: f32) {
        match self.angle_usage.iter_mut().find(|(a, _)| (a - angle).abs() < 1e-3) {
            Some((_, count)) => *count += 1,
            None => {
                self.angle_usage.push((angle, 1));
                self.angle_usage.sort_by(|a, b| a.0.total_cmp(&b.0));
            }
        }
    }

    /// Total exercises seen.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.processed + self.skipped + self.failed
    }

    /// Overall keyframe reduction percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn reduction_percent(&self) -> f64 {
        if self.keyframes_before == 0 {
            return 0.0;
        }
        (1.0 - self.keyframes_after as f64 / self.keyframes_before as f64) * 100.0
    }
}

/// Settings shared by every worker.
struct Context<'a> {
    config: &'a PipelineConfig,
    layout: &'a OutputLayout,
    stage: Stage,
    angles: Option<&'a AngleMap>,
    overwrite: bool,
}

impl Context<'_> {
    fn angle_for(&self, slug: &str) -> f32 {
        match self.angles {
            Some(map) => map.get(slug).copied().unwrap_or_else(|| {
                crate::warn!("No camera angle for '{slug}', using {}°", self.config.camera_angle);
                self.config.camera_angle
            }),
            None => self.config.camera_angle,
        }
    }

    fn run_stage(&self, entry: &MotionEntry) -> Result<ExerciseReport> {
        let slug = entry.slug.as_str();
        match self.stage {
            Stage::Project => {
                let motion = Motion::load(&entry.path, self.config.source_fps)?;
                let (_, report) = project_and_save(slug, &motion, self.angle_for(slug), self.config, self.layout)?;
                Ok(report)
            }
            Stage::Render(format) => {
                let screen = ScreenMotion::load(&entry.path)?;
                render_projected(slug, &screen, self.config, format, self.layout)
            }
            Stage::Full(format) => {
                let motion = Motion::load(&entry.path, self.config.source_fps)?;
                process_motion(slug, &motion, self.angle_for(slug), self.config, format, self.layout)
            }
        }
    }

    fn process_one(&self, entry: &MotionEntry) -> Outcome {
        if !self.overwrite && self.stage.outputs_exist(self.layout, &entry.slug) {
            return Outcome::Skipped;
        }
        crate::verbose!("{}", entry.slug);
        self.run_stage(entry)
            .map_or_else(|e| Outcome::Failed(e.to_string()), Outcome::Processed)
    }

    fn item(&self, index: usize, entry: &MotionEntry) -> ItemReport {
        ItemReport {
            index,
            slug: entry.slug.clone(),
            outcome: self.process_one(entry),
        }
    }
}

/// A processor for running the pipeline over many exercises.
///
/// Items are processed on a pool of `workers` threads and the callback is invoked on the
/// calling thread once per exercise as results arrive.
///
/// # Example
///
/// ```no_run
/// use exercise_animation::batch::BatchProcessor;
/// use exercise_animation::io::OutputLayout;
/// use exercise_animation::source::MotionSource;
/// use exercise_animation::{OutputFormat, PipelineConfig};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let entries = MotionSource::from("motion_data").collect()?;
///     let config = PipelineConfig::default();
///     let layout = OutputLayout::new("output");
///
///     let mut processor = BatchProcessor::new(&config, &layout, OutputFormat::All, |item| {
///         println!("{}: {:?}", item.slug, item.outcome);
///     });
///     let summary = processor.run(&entries);
///     println!("{} processed", summary.processed);
///     Ok(())
/// }
/// ```
pub struct BatchProcessor<'a, F>
where
    F: FnMut(&ItemReport),
{
    config: &'a PipelineConfig,
    layout: &'a OutputLayout,
    stage: Stage,
    angles: Option<AngleMap>,
    overwrite: bool,
    workers: usize,
    callback: F,
}

impl<'a, F> BatchProcessor<'a, F>
where
    F: FnMut(&ItemReport),
{
    /// Create a new `BatchProcessor`.
    ///
    /// # Arguments
    ///
    /// * `config` - Settings shared by every exercise.
    /// * `layout` - Where outputs are written.
    /// * `stage` - Which stages to run; an [`OutputFormat`](crate::OutputFormat) runs the full pipeline.
    /// * `callback` - A closure invoked with each exercise's outcome.
    pub fn new(config: &'a PipelineConfig, layout: &'a OutputLayout, stage: impl Into<Stage>, callback: F) -> Self {
        Self {
            config,
            layout,
            stage: stage.into(),
            angles: None,
            overwrite: false,
            workers: 1,
            callback,
        }
    }

    /// Use per-exercise camera angles.
    #[must_use]
    pub fn with_angles(mut self, angles: AngleMap) -> Self {
        self.angles = Some(angles);
        self
    }

    /// Regenerate outputs that already exist.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Number of worker threads (at least one).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    fn context(&self) -> Context<'_> {
        Context {
            config: self.config,
            layout: self.layout,
            stage: self.stage,
            angles: self.angles.as_ref(),
            overwrite: self.overwrite,
        }
    }

    /// Camera angle for `slug`, falling back to the configured default.
    #[must_use]
    pub fn angle_for(&self, slug: &str) -> f32 {
        self.context().angle_for(slug)
    }

    /// Process every entry and return the aggregate summary.
    ///
    /// The callback sees items in completion order; with one worker that is input order.
    pub fn run(&mut self, entries: &[MotionEntry]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        let workers = self.workers.min(entries.len()).max(1);
        // built field by field so the callback stays mutably borrowable
        let context = Context {
            config: self.config,
            layout: self.layout,
            stage: self.stage,
            angles: self.angles.as_ref(),
            overwrite: self.overwrite,
        };

        let pool = if workers > 1 {
            match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
                Ok(pool) => Some(pool),
                Err(e) => {
                    crate::warn!("Could not start {workers} workers ({e}), running sequentially");
                    None
                }
            }
        } else {
            None
        };

        let Some(pool) = pool else {
            for (index, entry) in entries.iter().enumerate() {
                let item = context.item(index, entry);
                summary.record(&item.outcome);
                (self.callback)(&item);
            }
            return summary;
        };

        // bounded so workers run at most one item ahead of the callback each
        let (sender, receiver) = mpsc::sync_channel(workers);
        let context = &context;
        let callback = &mut self.callback;
        pool.in_place_scope(|scope| {
            scope.spawn(move |_| {
                entries
                    .par_iter()
                    .enumerate()
                    .for_each_with(sender, |sender, (index, entry)| {
                        // the receiver outlives every sender
                        let _ = sender.send(context.item(index, entry));
                    });
            });
            for item in receiver {
                summary.record(&item.outcome);
                callback(&item);
            }
        });
        summary
    }
}
