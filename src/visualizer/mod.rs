// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Styling primitives shared by the raster and vector renderers.

/// Color definitions.
pub mod color;

pub use color::Color;
