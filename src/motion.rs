// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Motion data containers.
//!
//! [`Motion`] holds a validated `(T, 22, 3)` sequence of 3D joint positions in meters, as
//! produced by the motion source. [`ScreenMotion`] holds the `(T, 22, 2)` canvas-space
//! sequence produced by the projector and consumed by the renderers.

use std::path::Path;

use ndarray::{Array3, ArrayView2, ArrayView3, Axis, s};
use ndarray_npy::{read_npy, write_npy};

use crate::error::{PipelineError, Result};
use crate::io::ensure_parent_dir;
use crate::skeleton::NUM_JOINTS;

/// Default sampling rate of motion sources.
pub const DEFAULT_SOURCE_FPS: u32 = 30;

/// A validated 3D motion sequence for one exercise.
///
/// Immutable once constructed. Every frame holds exactly [`NUM_JOINTS`] finite
/// `(x, y, z)` positions.
#[derive(Debug, Clone)]
pub struct Motion {
    data: Array3<f32>,
    fps: u32,
}

impl Motion {
    /// Create a motion from a `(T, 22, 3)` array.
    ///
    /// # Errors
    ///
    /// * [`PipelineError::ShapeError`] if the joint count is not 22 or the
    ///   coordinate dimensionality is not 3.
    /// * [`PipelineError::EmptyMotionError`] if the array has no frames.
    /// * [`PipelineError::MalformedTrajectoryError`] if any coordinate is not finite.
    pub fn new(data: Array3<f32>, fps: u32) -> Result<Self> {
        check_shape(data.view(), 3)?;
        if let Some((frame, joint)) = first_non_finite(data.view()) {
            return Err(PipelineError::MalformedTrajectoryError(format!(
                "non-finite coordinate at frame {frame}, joint {joint}"
            )));
        }
        Ok(Self { data, fps })
    }

    /// Load a motion from a `.npy` file.
    ///
    /// Accepts both `float32` and `float64` arrays; the latter are narrowed to `f32`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the array violates the motion contract.
    pub fn load<P: AsRef<Path>>(path: P, fps: u32) -> Result<Self> {
        Self::new(read_f32_array(path.as_ref())?, fps)
    }

    /// Save the motion as a `float32` `.npy` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        ensure_parent_dir(path.as_ref())?;
        write_npy(path, &self.data)?;
        Ok(())
    }

    /// Number of frames.
    #[must_use]
    pub fn num_frames(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Source sampling rate in frames per second.
    #[must_use]
    pub const fn fps(&self) -> u32 {
        self.fps
    }

    /// View of the whole `(T, 22, 3)` array.
    #[must_use]
    pub fn data(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }

    /// View of one `(22, 3)` pose.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn frame(&self, index: usize) -> ArrayView2<'_, f32> {
        self.data.index_axis(Axis(0), index)
    }
}

/// A projected `(T, 22, 2)` sequence in canvas pixel coordinates.
///
/// Origin is the top-left corner of the canvas and Y grows downward.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenMotion {
    data: Array3<f32>,
}

impl ScreenMotion {
    /// Wrap a `(T, 22, 2)` array.
    ///
    /// # Errors
    ///
    /// * [`PipelineError::ShapeError`] if the joint count is not 22 or points are not 2D.
    /// * [`PipelineError::EmptyMotionError`] if the array has no frames.
    pub fn new(data: Array3<f32>) -> Result<Self> {
        check_shape(data.view(), 2)?;
        Ok(Self { data })
    }

    /// Load a projected sequence from a `.npy` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the array has the wrong shape.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(read_f32_array(path.as_ref())?)
    }

    /// Save the sequence as a `float32` `.npy` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        ensure_parent_dir(path.as_ref())?;
        write_npy(path, &self.data)?;
        Ok(())
    }

    /// Number of frames.
    #[must_use]
    pub fn num_frames(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// View of the whole `(T, 22, 2)` array.
    #[must_use]
    pub fn data(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }

    /// View of one `(22, 2)` screen pose.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn frame(&self, index: usize) -> ArrayView2<'_, f32> {
        self.data.index_axis(Axis(0), index)
    }

    /// `(T, 2)` trajectory of a single joint across all frames.
    ///
    /// # Panics
    ///
    /// Panics if `joint` is not below [`NUM_JOINTS`].
    #[must_use]
    pub fn trajectory(&self, joint: usize) -> ArrayView2<'_, f32> {
        self.data.index_axis(Axis(1), joint)
    }

    /// Drop frames to approximate `target_fps` from `source_fps`.
    ///
    /// Keeps every `source_fps / target_fps`-th frame starting with the first one.
    /// Returns a copy unchanged when the rates match or the target is faster.
    #[must_use]
    pub fn subsample(&self, source_fps: u32, target_fps: u32) -> Self {
        if source_fps == target_fps || target_fps == 0 {
            return self.clone();
        }
        #[allow(clippy::cast_possible_wrap)]
        let stride = (source_fps / target_fps).max(1) as isize;
        Self {
            data: self.data.slice(s![..;stride, .., ..]).to_owned(),
        }
    }

    /// Consume the wrapper and return the raw array.
    #[must_use]
    pub fn into_inner(self) -> Array3<f32> {
        self.data
    }
}

fn check_shape(data: ArrayView3<'_, f32>, dims: usize) -> Result<()> {
    let (frames, joints, coords) = data.dim();
    if coords != dims {
        return Err(PipelineError::ShapeError(format!(
            "expected {dims} coordinates per joint, got {coords}"
        )));
    }
    if joints != NUM_JOINTS {
        return Err(PipelineError::ShapeError(format!(
            "expected {NUM_JOINTS} joints, got {joints}"
        )));
    }
    if frames == 0 {
        return Err(PipelineError::EmptyMotionError);
    }
    Ok(())
}

fn first_non_finite(data: ArrayView3<'_, f32>) -> Option<(usize, usize)> {
    data.indexed_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|((frame, joint, _), _)| (frame, joint))
}

fn read_f32_array(path: &Path) -> Result<Array3<f32>> {
    if !path.exists() {
        return Err(PipelineError::IoError(format!(
            "File not found: {}",
            path.display()
        )));
    }
    match read_npy::<_, Array3<f32>>(path) {
        Ok(data) => Ok(data),
        Err(f32_err) => match read_npy::<_, Array3<f64>>(path) {
            #[allow(clippy::cast_possible_truncation)]
            Ok(data) => Ok(data.mapv(|v| v as f32)),
            Err(_) => Err(f32_err.into()),
        },
    }
}
