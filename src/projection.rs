// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 3D-to-2D projection with stable canvas framing.
//!
//! A whole [`Motion`] is rotated about the vertical axis by one camera angle, projected
//! orthographically, and normalized into a square canvas using a single
//! [`BoundingBox`] computed over every joint of every frame. Because the same box
//! normalizes every frame, the figure never drifts, grows, or shrinks as the motion
//! extremes change from frame to frame.
//!
//! # Example
//!
//! ```rust
//! use exercise_animation::{CameraAngle, Motion, project};
//! use ndarray::Array3;
//!
//! let mut data = Array3::<f32>::zeros((2, 22, 3));
//! data[[0, 15, 1]] = 0.85;
//! data[[1, 7, 1]] = -0.8;
//! let motion = Motion::new(data, 30)?;
//!
//! let projection = project(&motion, CameraAngle::Front.degrees(), 400, 0.15)?;
//! assert_eq!(projection.screen.num_frames(), 2);
//! # Ok::<(), exercise_animation::PipelineError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView2, Axis, array, s};

use crate::error::{PipelineError, Result};
use crate::motion::{Motion, ScreenMotion};
use crate::skeleton::NUM_JOINTS;

/// Camera viewing angle around the vertical axis.
///
/// Presets cover the common framings; any other angle can be given in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraAngle {
    /// 0°, facing the figure.
    Front,
    /// 45°.
    ThreeQuarterFront,
    /// 90°, profile view.
    Side,
    /// 135°.
    ThreeQuarterBack,
    /// Arbitrary angle in degrees.
    Degrees(f32),
}

impl CameraAngle {
    /// Angle in degrees.
    #[must_use]
    pub const fn degrees(self) -> f32 {
        match self {
            Self::Front => 0.0,
            Self::ThreeQuarterFront => 45.0,
            Self::Side => 90.0,
            Self::ThreeQuarterBack => 135.0,
            Self::Degrees(deg) => deg,
        }
    }

    /// Map an angle to its preset when one matches exactly.
    #[must_use]
    pub fn from_degrees(degrees: f32) -> Self {
        [
            Self::Front,
            Self::ThreeQuarterFront,
            Self::Side,
            Self::ThreeQuarterBack,
        ]
        .into_iter()
        .find(|preset| (preset.degrees() - degrees).abs() < f32::EPSILON)
        .unwrap_or(Self::Degrees(degrees))
    }
}

impl Default for CameraAngle {
    fn default() -> Self {
        Self::Front
    }
}

impl fmt::Display for CameraAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => write!(f, "front (0°)"),
            Self::ThreeQuarterFront => write!(f, "3/4 front (45°)"),
            Self::Side => write!(f, "side (90°)"),
            Self::ThreeQuarterBack => write!(f, "3/4 back (135°)"),
            Self::Degrees(deg) => write!(f, "{deg}°"),
        }
    }
}

impl FromStr for CameraAngle {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "front" => Ok(Self::Front),
            "three-quarter-front" | "3/4-front" | "front-3/4" => Ok(Self::ThreeQuarterFront),
            "side" => Ok(Self::Side),
            "three-quarter-back" | "3/4-back" | "back-3/4" => Ok(Self::ThreeQuarterBack),
            other => other
                .trim_end_matches('°')
                .parse::<f32>()
                .ok()
                .filter(|deg| deg.is_finite())
                .map(Self::from_degrees)
                .ok_or_else(|| PipelineError::ConfigError(format!("Invalid camera angle '{s}'"))),
        }
    }
}

/// Min/max extent of every projected point of one motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Smallest projected X.
    pub min_x: f32,
    /// Largest projected X.
    pub max_x: f32,
    /// Smallest projected Y.
    pub min_y: f32,
    /// Largest projected Y.
    pub max_y: f32,
    /// Lowest point reached by any joint (the floor).
    pub y_baseline: f32,
}

impl BoundingBox {
    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Whether the box collapsed along at least one axis.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }
}

/// Single-pass min/max accumulator over 2D points.
#[derive(Debug, Clone, Copy)]
struct BoundsAccumulator {
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
}

impl BoundsAccumulator {
    const fn new() -> Self {
        Self {
            min_x: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            min_y: f32::INFINITY,
            max_y: f32::NEG_INFINITY,
        }
    }

    fn push(&mut self, x: f32, y: f32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    fn finish(self) -> Option<BoundingBox> {
        (self.min_x <= self.max_x && self.min_y <= self.max_y).then_some(BoundingBox {
            min_x: self.min_x,
            max_x: self.max_x,
            min_y: self.min_y,
            max_y: self.max_y,
            y_baseline: self.min_y,
        })
    }
}

/// Output of [`project`].
#[derive(Debug, Clone)]
pub struct Projection {
    /// Canvas-space joint positions, `(T, 22, 2)`.
    pub screen: ScreenMotion,
    /// Global bounding box used to normalize every frame.
    pub bbox: BoundingBox,
    /// Uniform world-to-pixel scale applied to every frame.
    pub scale: f32,
    /// Camera angle the motion was viewed from, in degrees.
    pub camera_angle: f32,
}

impl Projection {
    /// Whether the scale fell back to 1.0 because the motion has no spatial extent.
    #[must_use]
    pub fn used_fallback_scale(&self) -> bool {
        self.bbox.width() == 0.0 && self.bbox.height() == 0.0
    }
}

/// Rotation about the vertical (Y) axis, right-handed.
///
/// 0° is the front view, 90° the side view.
#[must_use]
pub fn rotation_matrix(angle_degrees: f32) -> Array2<f32> {
    let (sin_a, cos_a) = angle_degrees.to_radians().sin_cos();
    array![[cos_a, 0.0, sin_a], [0.0, 1.0, 0.0], [-sin_a, 0.0, cos_a]]
}

/// Rotate `(N, 3)` points by `rotation` and drop depth, returning `(N, 2)` points.
#[must_use]
pub fn orthographic_projection(points: ArrayView2<'_, f32>, rotation: &Array2<f32>) -> Array2<f32> {
    let rotated = points.dot(&rotation.t());
    rotated.slice(s![.., 0..2]).to_owned()
}

/// Bounding box of the whole motion viewed from `angle_degrees`.
///
/// Every joint of every frame contributes; the result is the same box [`project`]
/// uses for normalization.
#[must_use]
pub fn global_bounding_box(motion: &Motion, angle_degrees: f32) -> BoundingBox {
    let projected = project_points(motion, &rotation_matrix(angle_degrees));
    bounds_of(&projected)
}

/// Project a motion into a `canvas_size`×`canvas_size` canvas.
///
/// # Arguments
///
/// * `motion` - Validated 3D motion.
/// * `camera_angle_degrees` - Rotation about the vertical axis (0° front, 90° side).
/// * `canvas_size` - Canvas width and height in pixels.
/// * `padding` - Fraction of the canvas reserved on each side, in `[0, 0.5)`.
///
/// # Errors
///
/// Returns [`PipelineError::ConfigError`] if the canvas size is zero, the padding is out
/// of range, or the angle is not finite.
pub fn project(
    motion: &Motion,
    camera_angle_degrees: f32,
    canvas_size: u32,
    padding: f32,
) -> Result<Projection> {
    if canvas_size == 0 {
        return Err(PipelineError::ConfigError(
            "canvas size must be positive".to_string(),
        ));
    }
    if !(0.0..0.5).contains(&padding) {
        return Err(PipelineError::ConfigError(format!(
            "padding must be in [0, 0.5), got {padding}"
        )));
    }
    if !camera_angle_degrees.is_finite() {
        return Err(PipelineError::ConfigError(format!(
            "camera angle must be finite, got {camera_angle_degrees}"
        )));
    }

    let mut points = project_points(motion, &rotation_matrix(camera_angle_degrees));
    let bbox = bounds_of(&points);

    #[allow(clippy::cast_precision_loss)]
    let canvas = canvas_size as f32;
    let usable = canvas - 2.0 * (canvas * padding);
    let extent = bbox.width().max(bbox.height());
    let scale = if extent > 0.0 {
        usable / extent
    } else {
        crate::warn!("Zero-size bounding box, using default scale");
        1.0
    };
    if extent > 0.0 && bbox.is_degenerate() {
        crate::warn!(
            "Bounding box is flat ({:.3}x{:.3}), motion may be malformed",
            bbox.width(),
            bbox.height()
        );
    }

    let (center_x, center_y) = bbox.center();
    let half = canvas / 2.0;
    for mut point in points.axis_iter_mut(Axis(0)) {
        point[0] = (point[0] - center_x).mul_add(scale, half);
        point[1] = (-(point[1] - center_y)).mul_add(scale, half);
    }

    let screen = points.into_shape_with_order((motion.num_frames(), NUM_JOINTS, 2))?;
    Ok(Projection {
        screen: ScreenMotion::new(screen)?,
        bbox,
        scale,
        camera_angle: camera_angle_degrees,
    })
}

/// All frames as one `(T * 22, 2)` block of projected points.
fn project_points(motion: &Motion, rotation: &Array2<f32>) -> Array2<f32> {
    let data = motion.data();
    let rows = motion.num_frames() * NUM_JOINTS;
    let pooled = Array2::from_shape_fn((rows, 3), |(row, c)| {
        data[[row / NUM_JOINTS, row % NUM_JOINTS, c]]
    });
    orthographic_projection(pooled.view(), rotation)
}

fn bounds_of(points: &Array2<f32>) -> BoundingBox {
    let mut acc = BoundsAccumulator::new();
    for point in points.axis_iter(Axis(0)) {
        acc.push(point[0], point[1]);
    }
    acc.finish().unwrap_or(BoundingBox {
        min_x: 0.0,
        max_x: 0.0,
        min_y: 0.0,
        max_y: 0.0,
        y_baseline: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    /// Two-frame motion where joint 0 moves between `a` and `b` and the rest sit at the origin.
    fn two_frame_motion(a: [f32; 3], b: [f32; 3]) -> Motion {
        let mut data = Array3::zeros((2, NUM_JOINTS, 3));
        for (c, v) in a.iter().enumerate() {
            data[[0, 0, c]] = *v;
        }
        for (c, v) in b.iter().enumerate() {
            data[[1, 0, c]] = *v;
        }
        Motion::new(data, 30).unwrap()
    }

    fn standing_motion(frames: usize) -> Motion {
        let mut data = Array3::zeros((frames, NUM_JOINTS, 3));
        for t in 0..frames {
            let sway = (t as f32 * 0.3).sin() * 0.1;
            for j in 0..NUM_JOINTS {
                data[[t, j, 0]] = (j as f32 - 10.5) * 0.05 + sway;
                data[[t, j, 1]] = j as f32 * 0.08 - 0.8;
                data[[t, j, 2]] = (j % 3) as f32 * 0.1;
            }
        }
        Motion::new(data, 30).unwrap()
    }

    #[test]
    fn test_rotation_matrix_presets() {
        let front = rotation_matrix(0.0);
        assert_eq!(front, Array2::<f32>::eye(3));

        let side = rotation_matrix(90.0);
        let p = ndarray::array![[1.0f32, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let projected = orthographic_projection(p.view(), &side);
        // X collapses to depth, Z becomes the horizontal axis
        assert!(projected[[0, 0]].abs() < 1e-6);
        assert!((projected[[1, 0]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_camera_angle_parse() {
        assert_eq!("front".parse::<CameraAngle>().unwrap(), CameraAngle::Front);
        assert_eq!("side".parse::<CameraAngle>().unwrap(), CameraAngle::Side);
        assert_eq!("45".parse::<CameraAngle>().unwrap(), CameraAngle::ThreeQuarterFront);
        assert_eq!("30°".parse::<CameraAngle>().unwrap(), CameraAngle::Degrees(30.0));
        assert!("upside".parse::<CameraAngle>().is_err());
        assert!("NaN".parse::<CameraAngle>().is_err());
    }

    #[test]
    fn test_global_bbox_spans_all_frames() {
        let motion = two_frame_motion([-1.0, 2.0, 0.0], [3.0, -4.0, 0.0]);
        let bbox = global_bounding_box(&motion, 0.0);
        assert!((bbox.min_x + 1.0).abs() < 1e-6);
        assert!((bbox.max_x - 3.0).abs() < 1e-6);
        assert!((bbox.min_y + 4.0).abs() < 1e-6);
        assert!((bbox.max_y - 2.0).abs() < 1e-6);
        assert!((bbox.y_baseline - bbox.min_y).abs() < f32::EPSILON);
    }

    #[test]
    fn test_projection_uses_same_bbox_for_every_frame() {
        let motion = standing_motion(30);
        let projection = project(&motion, 45.0, 400, 0.15).unwrap();
        assert_eq!(projection.bbox, global_bounding_box(&motion, 45.0));

        // Re-deriving each frame from the global box reproduces the output exactly
        let (cx, cy) = projection.bbox.center();
        let rotation = rotation_matrix(45.0);
        for t in [0, 7, 29] {
            let raw = orthographic_projection(motion.frame(t), &rotation);
            let screen = projection.screen.frame(t);
            for j in 0..NUM_JOINTS {
                let x = (raw[[j, 0]] - cx).mul_add(projection.scale, 200.0);
                let y = (-(raw[[j, 1]] - cy)).mul_add(projection.scale, 200.0);
                assert!((screen[[j, 0]] - x).abs() < 1e-3);
                assert!((screen[[j, 1]] - y).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_projection_is_deterministic() {
        let motion = standing_motion(20);
        let a = project(&motion, 135.0, 400, 0.15).unwrap();
        let b = project(&motion, 135.0, 400, 0.15).unwrap();
        assert_eq!(a.screen, b.screen);
        assert_eq!(a.bbox, b.bbox);
    }

    #[test]
    fn test_projection_stays_on_canvas() {
        let motion = standing_motion(40);
        for angle in [0.0, 45.0, 90.0, 135.0, 200.0] {
            let projection = project(&motion, angle, 400, 0.15).unwrap();
            for v in projection.screen.data() {
                assert!((-1e-3..=400.001).contains(v), "{v} off canvas at {angle}°");
            }
        }
    }

    #[test]
    fn test_longest_axis_fills_usable_area() {
        let motion = two_frame_motion([0.0, 1.0, 0.0], [0.0, -1.0, 0.0]);
        let projection = project(&motion, 0.0, 400, 0.15).unwrap();
        let ys: Vec<f32> = projection.screen.data().iter().skip(1).step_by(2).copied().collect();
        let min = ys.iter().copied().fold(f32::INFINITY, f32::min);
        let max = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        // 400 - 2 * 60 px of padding
        assert!((max - min - 280.0).abs() < 1e-3);
        assert!((min - 60.0).abs() < 1e-3);
        assert!((max - 340.0).abs() < 1e-3);
    }

    #[test]
    fn test_y_axis_is_flipped() {
        let motion = two_frame_motion([0.0, 1.0, 0.0], [0.0, -1.0, 0.0]);
        for angle in [0.0, 180.0] {
            let projection = project(&motion, angle, 400, 0.1).unwrap();
            let high = projection.screen.frame(0)[[0, 1]];
            let low = projection.screen.frame(1)[[0, 1]];
            assert!(high < low, "higher joint must be nearer the top at {angle}°");
        }
    }

    #[test]
    fn test_degenerate_motion_falls_back_to_unit_scale() {
        let motion = Motion::new(Array3::from_elem((3, NUM_JOINTS, 3), 0.4), 30).unwrap();
        let projection = project(&motion, 0.0, 400, 0.15).unwrap();
        assert!(projection.bbox.is_degenerate());
        assert!(projection.used_fallback_scale());
        assert!((projection.scale - 1.0).abs() < f32::EPSILON);
        for v in projection.screen.data() {
            assert!((v - 200.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_flat_motion_still_scales() {
        // Vertical line: zero width, non-zero height
        let motion = two_frame_motion([0.0, 0.5, 0.0], [0.0, -0.5, 0.0]);
        let projection = project(&motion, 0.0, 400, 0.0).unwrap();
        assert!(projection.bbox.is_degenerate());
        assert!(!projection.used_fallback_scale());
        assert!((projection.scale - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_parameters() {
        let motion = standing_motion(2);
        assert!(matches!(
            project(&motion, 0.0, 0, 0.15),
            Err(PipelineError::ConfigError(_))
        ));
        assert!(matches!(
            project(&motion, 0.0, 400, 0.5),
            Err(PipelineError::ConfigError(_))
        ));
        assert!(matches!(
            project(&motion, 0.0, 400, -0.1),
            Err(PipelineError::ConfigError(_))
        ));
        assert!(matches!(
            project(&motion, f32::NAN, 400, 0.1),
            Err(PipelineError::ConfigError(_))
        ));
    }
}
