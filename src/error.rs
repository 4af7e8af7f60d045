// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the animation pipeline.

use std::fmt;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for the animation pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// Motion array has the wrong joint count or coordinate dimensionality.
    ShapeError(String),
    /// Motion contains no frames.
    EmptyMotionError,
    /// Trajectory or motion contains NaN or infinite values.
    MalformedTrajectoryError(String),
    /// Invalid configuration provided.
    ConfigError(String),
    /// Error drawing or encoding images.
    ImageError(String),
    /// Error reading or writing `.npy` arrays.
    NpyError(String),
    /// Error serializing or parsing JSON documents.
    SerializationError(String),
    /// IO error (file not found, permission denied, etc.).
    IoError(String),
    /// Wrapped `std::io::Error`
    Io(std::io::Error),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeError(msg) => write!(f, "Shape error: {msg}"),
            Self::EmptyMotionError => write!(f, "Empty motion: sequence has no frames"),
            Self::MalformedTrajectoryError(msg) => write!(f, "Malformed trajectory: {msg}"),
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::ImageError(msg) => write!(f, "Image error: {msg}"),
            Self::NpyError(msg) => write!(f, "NPY error: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for PipelineError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageError(err.to_string())
    }
}

impl From<ndarray_npy::ReadNpyError> for PipelineError {
    fn from(err: ndarray_npy::ReadNpyError) -> Self {
        Self::NpyError(err.to_string())
    }
}

impl From<ndarray_npy::WriteNpyError> for PipelineError {
    fn from(err: ndarray_npy::WriteNpyError) -> Self {
        Self::NpyError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PipelineError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::ShapeError(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
