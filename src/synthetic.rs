// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Synthetic exercise motions.
//!
//! Simple parametric animations on a standing T-pose, used to exercise the pipeline end
//! to end without captured data. Coordinates are meters with Y up.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, Array3, Axis, array};

use crate::error::{PipelineError, Result};
use crate::motion::{DEFAULT_SOURCE_FPS, Motion};
use crate::skeleton::NUM_JOINTS;

const SPINE: [usize; 5] = [3, 6, 9, 12, 15];

/// Standing T-pose, `(22, 3)`.
#[must_use]
pub fn base_pose() -> Array2<f32> {
    array![
        [0.0, 0.0, 0.0],     // pelvis
        [-0.1, 0.0, 0.0],    // left_hip
        [0.1, 0.0, 0.0],     // right_hip
        [0.0, 0.2, 0.0],     // spine1
        [-0.1, -0.4, 0.0],   // left_knee
        [0.1, -0.4, 0.0],    // right_knee
        [0.0, 0.4, 0.0],     // spine2
        [-0.1, -0.8, 0.0],   // left_ankle
        [0.1, -0.8, 0.0],    // right_ankle
        [0.0, 0.6, 0.0],     // spine3
        [-0.1, -0.85, 0.1],  // left_foot
        [0.1, -0.85, 0.1],   // right_foot
        [0.0, 0.75, 0.0],    // neck
        [-0.15, 0.6, 0.0],   // left_collar
        [0.15, 0.6, 0.0],    // right_collar
        [0.0, 0.85, 0.0],    // head
        [-0.35, 0.6, 0.0],   // left_shoulder
        [0.35, 0.6, 0.0],    // right_shoulder
        [-0.55, 0.6, 0.0],   // left_elbow
        [0.55, 0.6, 0.0],    // right_elbow
        [-0.75, 0.6, 0.0],   // left_wrist
        [0.75, 0.6, 0.0],    // right_wrist
    ]
}

/// Built-in synthetic exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticExercise {
    BenchDips,
    BodyweightSquat,
    AbBicycles,
    AbWalkOuts,
    CurtsyLunges,
}

/// Every synthetic exercise in generation order.
pub const SYNTHETIC_EXERCISES: [SyntheticExercise; 5] = [
    SyntheticExercise::BenchDips,
    SyntheticExercise::BodyweightSquat,
    SyntheticExercise::AbBicycles,
    SyntheticExercise::AbWalkOuts,
    SyntheticExercise::CurtsyLunges,
];

impl SyntheticExercise {
    /// Output slug.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::BenchDips => "bench-dips",
            Self::BodyweightSquat => "bodyweight-squat",
            Self::AbBicycles => "ab-bicycles",
            Self::AbWalkOuts => "ab-walk-outs",
            Self::CurtsyLunges => "body-weight-curtsy-lunges",
        }
    }

    /// Default number of frames.
    #[must_use]
    pub const fn default_frames(self) -> usize {
        match self {
            Self::AbBicycles | Self::AbWalkOuts => 120,
            _ => 90,
        }
    }

    /// Generate the motion with its default length at 30 fps.
    ///
    /// # Errors
    ///
    /// Returns an error only if the generated array is rejected by [`Motion::new`].
    pub fn generate(self) -> Result<Motion> {
        self.generate_frames(self.default_frames())
    }

    /// Generate the motion with `frames` frames at 30 fps.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyMotionError`] if `frames` is zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn generate_frames(self, frames: usize) -> Result<Motion> {
        let mut data = Array3::zeros((frames, NUM_JOINTS, 3));
        let mut base = base_pose();
        if self == Self::AbBicycles {
            // lying on the ground
            base.column_mut(1).mapv_inplace(|y| y + 0.85);
            base.column_mut(2).mapv_inplace(|z| z - 0.85);
        }

        for (i, mut frame) in data.axis_iter_mut(Axis(0)).enumerate() {
            let t = i as f32 / frames as f32;
            let mut pose = base.clone();
            match self {
                Self::BenchDips => bench_dips(&mut pose, t),
                Self::BodyweightSquat => squat(&mut pose, t),
                Self::AbBicycles => bicycles(&mut pose, t),
                Self::AbWalkOuts => walk_outs(&mut pose, t),
                Self::CurtsyLunges => curtsy_lunges(&mut pose, t),
            }
            frame.assign(&pose);
        }
        Motion::new(data, DEFAULT_SOURCE_FPS)
    }
}

impl fmt::Display for SyntheticExercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for SyntheticExercise {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        SYNTHETIC_EXERCISES
            .into_iter()
            .find(|e| e.slug() == s)
            .ok_or_else(|| PipelineError::ConfigError(format!("unknown synthetic exercise '{s}'")))
    }
}

fn cycles(t: f32, count: f32) -> f32 {
    (t * std::f32::consts::TAU * count).sin()
}

/// Map a phase in `[-1, 1]` onto `[0, 1]`.
fn unit(phase: f32) -> f32 {
    phase.mul_add(0.5, 0.5)
}

fn bench_dips(pose: &mut Array2<f32>, t: f32) {
    let depth = unit(cycles(t, 2.0));
    pose.column_mut(1).mapv_inplace(|y| y - 0.2 * depth);

    let bend = 0.15 * depth;
    for elbow in [18, 19] {
        pose[[elbow, 1]] -= bend;
    }
    for wrist in [20, 21] {
        pose[[wrist, 1]] -= bend * 1.5;
    }
}

fn squat(pose: &mut Array2<f32>, t: f32) {
    let depth = 0.4 * unit(cycles(t, 2.0));
    for joint in [0, 3, 6, 9, 12, 15, 13, 14, 16, 17, 18, 19, 20, 21] {
        pose[[joint, 1]] -= depth;
    }
    for knee in [4, 5] {
        pose[[knee, 1]] -= depth * 0.7;
    }
    for joint in SPINE {
        pose[[joint, 2]] += depth * 0.3;
    }
}

fn bicycles(pose: &mut Array2<f32>, t: f32) {
    let phase = cycles(t, 3.0);
    let (raised, extended) = if phase > 0.0 { (5, 4) } else { (4, 5) };
    pose[[raised, 1]] += 0.3;
    pose[[extended, 1]] -= 0.1;

    for joint in SPINE {
        pose[[joint, 0]] += phase * 0.1;
    }
}

fn walk_outs(pose: &mut Array2<f32>, t: f32) {
    // out, hold the plank, walk back
    let progress = if t < 0.4 {
        t / 0.4
    } else if t < 0.6 {
        1.0
    } else {
        1.0 - (t - 0.6) / 0.4
    };

    let lean = progress * 0.8;
    for joint in SPINE {
        pose[[joint, 2]] += lean;
        pose[[joint, 1]] -= lean * 0.5;
    }
    for elbow in [18, 19] {
        pose[[elbow, 2]] += progress * 0.5;
    }
    for wrist in [20, 21] {
        pose[[wrist, 2]] += progress * 0.8;
    }
}

fn curtsy_lunges(pose: &mut Array2<f32>, t: f32) {
    let depth = 0.3 * unit(cycles(t, 2.0));

    pose[[2, 2]] -= depth * 0.5;
    pose[[2, 0]] -= depth * 0.3;
    pose[[5, 1]] -= depth;
    pose[[5, 2]] -= depth * 0.5;
    pose[[4, 1]] -= depth * 0.3;

    for joint in [0, 3, 6, 9, 12, 15] {
        pose[[joint, 1]] -= depth * 0.5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_pose() {
        let pose = base_pose();
        assert_eq!(pose.dim(), (NUM_JOINTS, 3));
        assert!((pose[[15, 1]] - 0.85).abs() < 1e-6);
        assert!((pose[[20, 0]] + 0.75).abs() < 1e-6);
        assert!((pose[[11, 2]] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_frame_counts() {
        for exercise in SYNTHETIC_EXERCISES {
            let motion = exercise.generate().unwrap();
            assert_eq!(motion.num_frames(), exercise.default_frames());
            assert_eq!(motion.fps(), 30);
        }
    }

    #[test]
    fn test_slug_round_trip() {
        for exercise in SYNTHETIC_EXERCISES {
            assert_eq!(exercise.slug().parse::<SyntheticExercise>().unwrap(), exercise);
        }
        assert!("push-ups".parse::<SyntheticExercise>().is_err());
    }

    #[test]
    fn test_bench_dips_start_at_mid_depth() {
        let motion = SyntheticExercise::BenchDips.generate().unwrap();
        // t = 0 puts the phase at 0, halfway down
        let pelvis_y = motion.data()[[0, 0, 1]];
        assert!((pelvis_y + 0.1).abs() < 1e-6);
        let wrist_y = motion.data()[[0, 20, 1]];
        assert!((wrist_y - (0.6 - 0.1 - 0.075 * 1.5)).abs() < 1e-5);
    }

    #[test]
    fn test_walk_outs_hold_plank() {
        let motion = SyntheticExercise::AbWalkOuts.generate().unwrap();
        // frame 60 of 120 is t = 0.5, inside the hold
        let head = motion.frame(60);
        assert!((head[[15, 2]] - 0.8).abs() < 1e-6);
        assert!((head[[15, 1]] - 0.45).abs() < 1e-6);
        // starts and ends standing
        assert!(motion.data()[[0, 15, 2]].abs() < 1e-6);
    }

    #[test]
    fn test_bicycles_lying_down() {
        let motion = SyntheticExercise::AbBicycles.generate().unwrap();
        assert!((motion.data()[[0, 0, 1]] - 0.85).abs() < 1e-6);
        assert!((motion.data()[[0, 0, 2]] + 0.85).abs() < 1e-6);
    }

    #[test]
    fn test_zero_frames_rejected() {
        assert!(matches!(
            SyntheticExercise::BodyweightSquat.generate_frames(0),
            Err(PipelineError::EmptyMotionError)
        ));
    }
}
