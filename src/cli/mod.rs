// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for the animation pipeline.
//!
//! This module contains the command-line interface logic, including argument parsing,
//! console logging and the command implementations.

// Modules
/// CLI arguments.
pub mod args;

/// Command implementations.
pub mod commands;

/// Logging macros and verbosity control.
pub mod logging;
