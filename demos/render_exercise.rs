// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Example script demonstrating the pipeline stages from the library.
//!
//! This example covers:
//! 1. Loading a motion file, or generating a synthetic squat when none is given.
//! 2. Projecting it from several camera angles.
//! 3. Saving a preview PNG, an animated GIF, and a Lottie document.

use std::path::Path;

use exercise_animation::io::{save_animation, write_json};
use exercise_animation::render::render_frames;
use exercise_animation::synthetic::SyntheticExercise;
use exercise_animation::{
    CameraAngle, KeyframeConfig, Motion, RenderStyle, Result, create_lottie_animation,
    optimize_all_joints, project, render_frame,
};

fn main() -> Result<()> {
    // 1. Load a motion, falling back to synthetic data
    let motion = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading {path}...");
            Motion::load(path, 30)?
        }
        None => {
            println!("No motion given, generating a synthetic squat");
            SyntheticExercise::BodyweightSquat.generate()?
        }
    };

    let out = Path::new("runs/demo");
    let style = RenderStyle::default();

    // 2. One preview per camera preset
    for angle in [
        CameraAngle::Front,
        CameraAngle::ThreeQuarterFront,
        CameraAngle::Side,
        CameraAngle::ThreeQuarterBack,
    ] {
        let projection = project(&motion, angle.degrees(), 400, 0.15)?;
        let preview = render_frame(projection.screen.frame(0), 400, &style);
        let path = out.join(format!("preview_{}.png", angle.degrees()));
        std::fs::create_dir_all(out)?;
        preview.save(&path)?;
        println!("{angle}: scale {:.1} px/m -> {}", projection.scale, path.display());
    }

    // 3. Animations from the three-quarter view
    let projection = project(&motion, CameraAngle::ThreeQuarterFront.degrees(), 400, 0.15)?;
    let frames = render_frames(&projection.screen.subsample(motion.fps(), 15), 400, &style);
    save_animation(&frames, out.join("animation.gif"), 15)?;

    let keyframes = optimize_all_joints(&projection.screen, &KeyframeConfig::default())?;
    let lottie = create_lottie_animation(&projection.screen, &keyframes, 400, 15, &style);
    let bytes = write_json(out.join("animation.json"), &lottie)?;

    println!(
        "\nKeyframes: {} -> {} ({:.1}% reduction), lottie {bytes} bytes",
        keyframes.possible_keyframes(),
        keyframes.total_keyframes(),
        keyframes.reduction_percent()
    );
    println!("Done! Check {} for saved results.", out.display());
    Ok(())
}
