// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Integration tests for the animation pipeline

use exercise_animation::batch::{BatchProcessor, Outcome};
use exercise_animation::io::OutputLayout;
use exercise_animation::skeleton::{NUM_JOINTS, SKELETON};
use exercise_animation::source::MotionSource;
use exercise_animation::synthetic::{SYNTHETIC_EXERCISES, SyntheticExercise, base_pose};
use exercise_animation::{
    KeyframeConfig, Motion, OutputFormat, PipelineConfig, PipelineError, ScreenMotion,
    create_lottie_animation, detect_keyframes, optimize_all_joints, project, union_keyframes,
};
use ndarray::Array3;

/// 90 frames, every joint oscillating 0.2 m on Y over two cycles.
fn vertical_oscillation() -> Motion {
    let data = Array3::from_shape_fn((90, NUM_JOINTS, 3), |(t, j, c)| {
        let phase = (t as f32 / 90.0 * std::f32::consts::TAU * 2.0).sin();
        match c {
            0 => (j as f32 - 10.0) * 0.05,
            1 => 0.2 * phase + j as f32 * 0.02,
            _ => 0.0,
        }
    });
    Motion::new(data, 30).unwrap()
}

#[test]
fn test_vertical_oscillation_end_to_end() {
    let motion = vertical_oscillation();
    let projection = project(&motion, 0.0, 400, 0.15).unwrap();
    assert_eq!(projection.screen.data().dim(), (90, 22, 2));

    // every point stays inside the padded region
    for &v in projection.screen.data() {
        assert!((60.0 - 1e-3..=340.0 + 1e-3).contains(&v), "{v} outside padding");
    }

    let config = KeyframeConfig::default();
    for joint in 0..NUM_JOINTS {
        let keyframes = detect_keyframes(projection.screen.trajectory(joint), &config).unwrap();
        assert_eq!(keyframes.first(), Some(&0));
        assert_eq!(keyframes.last(), Some(&89));
        assert!(keyframes.len() >= 4, "joint {joint}: {keyframes:?}");
        assert!(keyframes.len() < 90);
        assert!(keyframes.windows(2).all(|w| w[0] < w[1]));
    }
}

/// T-pose held for 90 frames while only the left wrist bobs 0.2 m on Y over two cycles.
fn wrist_oscillation() -> Motion {
    const WRIST: usize = 20;
    let pose = base_pose();
    let data = Array3::from_shape_fn((90, NUM_JOINTS, 3), |(t, j, c)| {
        let offset = if j == WRIST && c == 1 {
            0.2 * (t as f32 / 90.0 * std::f32::consts::TAU * 2.0).sin()
        } else {
            0.0
        };
        pose[[j, c]] + offset
    });
    Motion::new(data, 30).unwrap()
}

#[test]
fn test_single_joint_oscillation() {
    let motion = wrist_oscillation();
    let projection = project(&motion, 0.0, 400, 0.15).unwrap();
    assert_eq!(projection.screen.data().dim(), (90, 22, 2));
    for &v in projection.screen.data() {
        assert!((60.0 - 1e-3..=340.0 + 1e-3).contains(&v), "{v} outside padding");
    }

    let map = optimize_all_joints(&projection.screen, &KeyframeConfig::default()).unwrap();
    // one keyframe per turning point: peaks and troughs at 11.25, 33.75, 56.25, 78.75
    assert_eq!(map.joint(20), [0, 11, 34, 56, 79, 89]);
    for joint in (0..NUM_JOINTS).filter(|&j| j != 20) {
        assert_eq!(map.joint(joint), [0, 89], "joint {joint} never moves");
    }
}

#[test]
fn test_bone_keyframes_cover_both_joints() {
    let motion = SyntheticExercise::BodyweightSquat.generate().unwrap();
    let projection = project(&motion, 45.0, 400, 0.15).unwrap();
    let map = optimize_all_joints(&projection.screen, &KeyframeConfig::default()).unwrap();

    for (&[a, b], bone) in SKELETON.iter().zip(map.bones()) {
        assert_eq!(bone, union_keyframes(map.joint(a), map.joint(b)));
        assert!(map.joint(a).iter().all(|t| bone.contains(t)));
        assert!(map.joint(b).iter().all(|t| bone.contains(t)));
    }
}

#[test]
fn test_every_synthetic_exercise_projects_and_animates() {
    for exercise in SYNTHETIC_EXERCISES {
        let motion = exercise.generate().unwrap();
        for angle in [0.0, 45.0, 90.0, 135.0] {
            let projection = project(&motion, angle, 400, 0.15).unwrap();
            assert!(!projection.used_fallback_scale(), "{exercise} at {angle}");
            let map = optimize_all_joints(&projection.screen, &KeyframeConfig::default()).unwrap();
            assert!(map.total_keyframes() < map.possible_keyframes());

            let doc = create_lottie_animation(&projection.screen, &map, 400, 15, &Default::default());
            assert_eq!(doc.duration_frames(), motion.num_frames());
            assert_eq!(doc.layers().len(), 2);
        }
    }
}

#[test]
fn test_projection_is_deterministic() {
    let motion = SyntheticExercise::CurtsyLunges.generate().unwrap();
    let a = project(&motion, 30.0, 400, 0.15).unwrap();
    let b = project(&motion, 30.0, 400, 0.15).unwrap();
    assert_eq!(a.screen, b.screen);
}

#[test]
fn test_static_motion_falls_back_to_unit_scale() {
    let motion = Motion::new(Array3::zeros((10, NUM_JOINTS, 3)), 30).unwrap();
    let projection = project(&motion, 0.0, 400, 0.15).unwrap();
    assert!(projection.used_fallback_scale());
    assert!((projection.scale - 1.0).abs() < f32::EPSILON);
    for &v in projection.screen.data() {
        assert!((v - 200.0).abs() < 1e-4);
    }

    let map = optimize_all_joints(&projection.screen, &KeyframeConfig::default()).unwrap();
    assert!(map.iter().all(|(_, frames)| frames == [0, 9]));
}

#[test]
fn test_invalid_motion_is_rejected() {
    assert!(matches!(
        Motion::new(Array3::zeros((10, 17, 3)), 30),
        Err(PipelineError::ShapeError(_))
    ));
    assert!(matches!(
        Motion::new(Array3::zeros((0, NUM_JOINTS, 3)), 30),
        Err(PipelineError::EmptyMotionError)
    ));
    let mut data = Array3::zeros((5, NUM_JOINTS, 3));
    data[[2, 4, 1]] = f32::NAN;
    assert!(matches!(Motion::new(data, 30), Err(PipelineError::MalformedTrajectoryError(_))));
}

#[test]
fn test_batch_run_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let motions = dir.path().join("motion_data");
    for exercise in [SyntheticExercise::BenchDips, SyntheticExercise::AbWalkOuts] {
        exercise
            .generate_frames(40)
            .unwrap()
            .save(motions.join(format!("{}.npy", exercise.slug())))
            .unwrap();
    }
    // a malformed array must not stop the batch
    ndarray_npy::write_npy(motions.join("broken.npy"), &Array3::<f32>::zeros((5, 17, 3))).unwrap();

    let entries = MotionSource::from(motions.to_string_lossy().as_ref()).collect().unwrap();
    assert_eq!(entries.len(), 3);

    let config = PipelineConfig::new().with_canvas_size(96);
    let layout = OutputLayout::new(dir.path().join("output"));
    let mut failures = Vec::new();
    let summary = BatchProcessor::new(&config, &layout, OutputFormat::All, |item| {
        if let Outcome::Failed(msg) = &item.outcome {
            failures.push((item.slug.clone(), msg.clone()));
        }
    })
    .with_workers(2)
    .run(&entries);

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "broken");
    assert!(failures[0].1.contains("Shape error"));

    let screen = ScreenMotion::load(layout.projected("bench-dips")).unwrap();
    assert_eq!(screen.num_frames(), 40);
    let lottie: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(layout.vector("ab-walk-outs")).unwrap()).unwrap();
    assert_eq!(lottie["op"], 40);
    assert_eq!(lottie["fr"], 15);
}
