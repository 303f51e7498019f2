//! mediaconv - single-job media file conversion via ffmpeg
//!
//! This library crate exposes the core functionality for integration testing.

pub mod convert;
pub mod engine;
pub mod error;
pub mod format;
pub mod quality;

pub use error::{Error, Result};
