// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Keyframe reduction for vector animation output.
//!
//! Vector renderers pay per keyframe, so joints must not be updated on every frame.
//! [`detect_keyframes`] keeps only the frames where a joint has moved far enough since
//! the last keyframe *and* its direction of travel turns by more than a threshold.
//! Frames in between are reconstructed by interpolation.

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::motion::ScreenMotion;
use crate::skeleton::{NUM_JOINTS, SKELETON, joint_name};
use crate::utils::{angle_between_degrees, distance, norm};

/// Velocities shorter than this are treated as stationary.
pub const STATIONARY_EPSILON: f32 = 1e-8;

/// Thresholds for keyframe detection.
///
/// Displacement gating runs first and suppresses jitter on near-static joints;
/// direction gating then keeps genuine turns in the motion path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyframeConfig {
    /// Minimum change of direction, in degrees, that justifies a new keyframe.
    pub threshold_degrees: f32,
    /// Minimum distance in pixels from the last keyframe before a new one is considered.
    pub min_displacement: f32,
}

impl Default for KeyframeConfig {
    fn default() -> Self {
        Self {
            threshold_degrees: 10.0,
            min_displacement: 5.0,
        }
    }
}

impl KeyframeConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the direction-change threshold in degrees.
    #[must_use]
    pub const fn with_threshold(mut self, degrees: f32) -> Self {
        self.threshold_degrees = degrees;
        self
    }

    /// Set the minimum displacement in pixels.
    #[must_use]
    pub const fn with_min_displacement(mut self, pixels: f32) -> Self {
        self.min_displacement = pixels;
        self
    }

    /// Check that both thresholds are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ConfigError`] describing the offending value.
    pub fn validate(&self) -> Result<()> {
        if !(self.threshold_degrees.is_finite() && self.threshold_degrees >= 0.0) {
            return Err(PipelineError::ConfigError(format!(
                "direction threshold must be a non-negative number of degrees, got {}",
                self.threshold_degrees
            )));
        }
        if !(self.min_displacement.is_finite() && self.min_displacement >= 0.0) {
            return Err(PipelineError::ConfigError(format!(
                "minimum displacement must be a non-negative number of pixels, got {}",
                self.min_displacement
            )));
        }
        Ok(())
    }
}

/// Detect keyframes for a single joint trajectory.
///
/// # Arguments
///
/// * `trajectory` - `(T, 2)` positions across time.
/// * `config` - Direction and displacement thresholds.
///
/// # Returns
///
/// Strictly increasing frame indices that always start with `0` and end with `T - 1`.
///
/// # Errors
///
/// * [`PipelineError::ShapeError`] if points are not 2D.
/// * [`PipelineError::EmptyMotionError`] if the trajectory is empty.
/// * [`PipelineError::MalformedTrajectoryError`] if any value is not finite.
pub fn detect_keyframes(trajectory: ArrayView2<'_, f32>, config: &KeyframeConfig) -> Result<Vec<usize>> {
    let (frames, dims) = trajectory.dim();
    if dims != 2 {
        return Err(PipelineError::ShapeError(format!(
            "expected 2D trajectory points, got {dims} coordinates"
        )));
    }
    if frames == 0 {
        return Err(PipelineError::EmptyMotionError);
    }
    if let Some(((frame, _), _)) = trajectory.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(PipelineError::MalformedTrajectoryError(format!(
            "non-finite position at frame {frame}"
        )));
    }

    let point = |i: usize| [trajectory[[i, 0]], trajectory[[i, 1]]];

    let mut keyframes = vec![0];
    if frames == 1 {
        return Ok(keyframes);
    }

    let mut last_keyframe = 0;
    for i in 1..frames.saturating_sub(1) {
        let current = point(i);
        if distance(current, point(last_keyframe)) < config.min_displacement {
            continue;
        }

        let prev = point(i - 1);
        let next = point(i + 1);
        let v_prev = [current[0] - prev[0], current[1] - prev[1]];
        let v_curr = [next[0] - current[0], next[1] - current[1]];
        if norm(v_prev) < STATIONARY_EPSILON || norm(v_curr) < STATIONARY_EPSILON {
            continue;
        }

        if angle_between_degrees(v_prev, v_curr) > config.threshold_degrees {
            keyframes.push(i);
            last_keyframe = i;
        }
    }

    keyframes.push(frames - 1);
    Ok(keyframes)
}

/// Merge two sorted keyframe lists into their sorted, duplicate-free union.
#[must_use]
pub fn union_keyframes(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() || j < b.len() {
        let next = match (a.get(i), b.get(j)) {
            (Some(&x), Some(&y)) if x < y => {
                i += 1;
                x
            }
            (Some(&x), Some(&y)) if y < x => {
                j += 1;
                y
            }
            (Some(&x), Some(_)) => {
                i += 1;
                j += 1;
                x
            }
            (Some(&x), None) => {
                i += 1;
                x
            }
            (None, Some(&y)) => {
                j += 1;
                y
            }
            (None, None) => break,
        };
        if merged.last() != Some(&next) {
            merged.push(next);
        }
    }
    merged
}

/// Keyframe indices for every joint of one motion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyframeMap {
    joints: Vec<Vec<usize>>,
    num_frames: usize,
}

impl KeyframeMap {
    /// Keyframes of one joint.
    ///
    /// # Panics
    ///
    /// Panics if `joint` is not below [`NUM_JOINTS`].
    #[must_use]
    pub fn joint(&self, joint: usize) -> &[usize] {
        &self.joints[joint]
    }

    /// Keyframes of the bone spanning `a` and `b`.
    ///
    /// A bone must be redrawn whenever either endpoint moves, so it takes the union of
    /// both joints' keyframes.
    #[must_use]
    pub fn bone(&self, a: usize, b: usize) -> Vec<usize> {
        union_keyframes(self.joint(a), self.joint(b))
    }

    /// Iterate `(joint, keyframes)` pairs in joint order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.joints.iter().map(Vec::as_slice).enumerate()
    }

    /// Number of frames in the source motion.
    #[must_use]
    pub const fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Keyframes kept across all joints.
    #[must_use]
    pub fn total_keyframes(&self) -> usize {
        self.joints.iter().map(Vec::len).sum()
    }

    /// Keyframes a dense per-frame schedule would need.
    #[must_use]
    pub fn possible_keyframes(&self) -> usize {
        self.num_frames * self.joints.len()
    }

    /// Percentage of keyframes removed relative to a dense schedule.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn reduction_percent(&self) -> f64 {
        let possible = self.possible_keyframes();
        if possible == 0 {
            return 0.0;
        }
        (1.0 - self.total_keyframes() as f64 / possible as f64) * 100.0
    }

    /// Keyframes for every bone of [`SKELETON`], in table order.
    #[must_use]
    pub fn bones(&self) -> Vec<Vec<usize>> {
        SKELETON.iter().map(|&[a, b]| self.bone(a, b)).collect()
    }
}

/// Run [`detect_keyframes`] independently for each of the 22 joints.
///
/// # Errors
///
/// Returns the first joint's detection error, naming the joint.
pub fn optimize_all_joints(screen: &ScreenMotion, config: &KeyframeConfig) -> Result<KeyframeMap> {
    let joints = (0..NUM_JOINTS)
        .map(|joint| {
            detect_keyframes(screen.trajectory(joint), config).map_err(|e| match e {
                PipelineError::MalformedTrajectoryError(msg) => {
                    PipelineError::MalformedTrajectoryError(format!(
                        "{} (joint {joint}): {msg}",
                        joint_name(joint).unwrap_or("unknown")
                    ))
                }
                other => other,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(KeyframeMap {
        joints,
        num_frames: screen.num_frames(),
    })
}
