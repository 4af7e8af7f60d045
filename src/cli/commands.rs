// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::path::Path;

use crate::batch::{BatchProcessor, BatchSummary, ItemReport, Outcome, load_angle_map};
use crate::cli::args::{PipelineArgs, SynthArgs};
use crate::error::Result;
use crate::io::OutputLayout;
use crate::pipeline::Stage;
use crate::source::MotionSource;
use crate::synthetic::{SYNTHETIC_EXERCISES, SyntheticExercise};
use crate::utils::pluralize;
use crate::{VERSION, error, info, section, success, verbose, warn};

/// Write synthetic exercise motions as `.npy` files.
///
/// # Errors
///
/// Returns an error if the exercise name is unknown or a file cannot be written.
pub fn run_synth(args: &SynthArgs) -> Result<()> {
    crate::cli::logging::set_verbose(args.verbose);
    let exercises: Vec<SyntheticExercise> = match &args.exercise {
        Some(slug) => vec![slug.parse()?],
        None => SYNTHETIC_EXERCISES.to_vec(),
    };

    section!("Generating synthetic motion data");
    let output = Path::new(&args.output);
    for exercise in &exercises {
        let motion = match args.frames {
            Some(frames) => exercise.generate_frames(frames)?,
            None => exercise.generate()?,
        };
        let path = output.join(format!("{}.npy", exercise.slug()));
        motion.save(&path)?;
        verbose!(
            "  {exercise}: ({} frames, 22 joints, 3 coords) -> {}",
            motion.num_frames(),
            path.display()
        );
    }
    success!(
        "Generated {} synthetic {} in {}",
        exercises.len(),
        pluralize("motion", exercises.len()),
        output.display()
    );
    Ok(())
}

/// Print one exercise's outcome.
fn report_item(item: &ItemReport) {
    match &item.outcome {
        Outcome::Processed(report) => {
            let mut line = format!("{}: {} frames", item.slug, report.frames);
            if report.raster_frames > 0 {
                line.push_str(&format!(", {} gif frames", report.raster_frames));
            }
            if report.possible_keyframes > 0 {
                line.push_str(&format!(
                    ", keyframes {} -> {} ({:.1}% reduction)",
                    report.possible_keyframes, report.optimized_keyframes, report.reduction_percent
                ));
            }
            if report.output_bytes() > 0 {
                #[allow(clippy::cast_precision_loss)]
                let kb = report.output_bytes() as f64 / 1024.0;
                line.push_str(&format!(", {kb:.1} KB"));
            }
            success!("{line}");
            if report.fallback_scale {
                warn!("{}: motion has no spatial extent, drawn at unit scale", item.slug);
            }
        }
        Outcome::Skipped => verbose!("{}: outputs exist, skipping", item.slug),
        Outcome::Failed(msg) => error!("{}: {msg}", item.slug),
    }
}

/// How often each camera angle was used, e.g. `Camera angles: 0° x3, 45° x2`.
fn angle_usage_line(summary: &BatchSummary) -> Option<String> {
    if summary.angle_usage.is_empty() {
        return None;
    }
    let usage: Vec<String> = summary
        .angle_usage
        .iter()
        .map(|(angle, count)| format!("{angle}° x{count}"))
        .collect();
    Some(format!("Camera angles: {}", usage.join(", ")))
}

/// Print the batch summary.
#[allow(clippy::cast_precision_loss)]
fn report_summary(summary: &BatchSummary, layout: &OutputLayout) {
    section!("Summary");
    info!(
        "{} processed, {} skipped, {} failed",
        summary.processed, summary.skipped, summary.failed
    );
    if summary.keyframes_before > 0 {
        info!(
            "Keyframes: {} -> {} ({:.1}% reduction)",
            summary.keyframes_before,
            summary.keyframes_after,
            summary.reduction_percent()
        );
    }
    if let Some(line) = angle_usage_line(summary) {
        info!("{line}");
    }
    if summary.output_bytes > 0 {
        info!("Output size: {:.1} KB", summary.output_bytes as f64 / 1024.0);
    }
    info!("Results saved to {}", layout.root().display());
}

/// Run one pipeline stage over every discovered motion file.
///
/// # Returns
///
/// The batch summary; failures of individual exercises are counted, not returned.
///
/// # Errors
///
/// Returns an error if configuration, angle map, or source discovery fails.
pub fn run_stage(args: &PipelineArgs, stage: Stage) -> Result<BatchSummary> {
    crate::cli::logging::set_verbose(args.verbose);
    let config = args.resolve_config()?;
    let layout = OutputLayout::new(&args.output);

    let mut entries = MotionSource::from(args.source.as_str()).collect()?;
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }
    if entries.is_empty() {
        warn!("No .npy motion files found in '{}'", args.source);
        return Ok(BatchSummary::default());
    }

    section!("exercise-animation {VERSION}");
    verbose!(
        "{} {} from {}, canvas {}px, padding {}, {} fps",
        entries.len(),
        pluralize("exercise", entries.len()),
        args.source,
        config.canvas_size,
        config.padding,
        config.target_fps
    );

    let mut processor = BatchProcessor::new(&config, &layout, stage, report_item)
        .with_overwrite(args.overwrite)
        .with_workers(args.workers);
    if let Some(path) = &args.angles {
        processor = processor.with_angles(load_angle_map(path)?);
    }

    let summary = processor.run(&entries);
    report_summary(&summary, &layout);
    Ok(summary)
}
