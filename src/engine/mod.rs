//! External media engine contract.
//!
//! The transcoding engine is an opaque dependency. The orchestrator only
//! sees a path-bound read source with container auto-detection, a path-bound
//! write target, and a conversion plan that performs feasibility analysis at
//! initialization, streams fractional progress to a single observer slot,
//! and runs to completion. The ffmpeg-backed implementation lives in
//! [`ffmpeg`]; tests drive the orchestrator with a mock.

pub mod command;
pub mod ffmpeg;
pub mod probe;
pub mod tools;

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;
use crate::format::{AudioCodec, FormatPolicy};

/// Video handling for one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoOptions {
    /// Keep video, scaling down to fit within `height` when set.
    Contain { height: Option<u32> },
    /// Audio-only target: no video stream is retained.
    Discard,
}

/// Audio handling for one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioOptions {
    pub codec: AudioCodec,
    /// Target bitrate in bits per second, absent when the quality hint did
    /// not carry one.
    pub bitrate: Option<u64>,
}

/// Fully resolved options for one conversion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub video: VideoOptions,
    pub audio: AudioOptions,
}

/// Single-slot progress observer, invoked with a fraction in `[0, 1]` zero
/// or more times while the plan executes.
pub type ProgressObserver = Box<dyn FnMut(f64) + Send>;

/// A read source bound to an input path.
#[async_trait]
pub trait InputHandle: Send {
    fn path(&self) -> &Path;

    /// Release resources bound to the source. Called on every exit path once
    /// the handle has been opened.
    async fn dispose(&mut self) -> Result<()>;
}

/// A write target bound to an output path.
#[async_trait]
pub trait OutputHandle: Send {
    fn path(&self) -> &Path;

    /// Flush container trailers and index structures after a successful run.
    async fn finalize(&mut self) -> Result<()>;
}

/// A conversion plan produced by [`MediaEngine::init_plan`].
#[async_trait]
pub trait ConversionPlan: Send {
    /// Result of the feasibility analysis performed during initialization.
    fn is_valid(&self) -> bool;

    /// Human-readable reason when the plan is invalid.
    fn invalid_reason(&self) -> Option<&str>;

    /// Install the progress observer. The slot holds at most one observer;
    /// a later call replaces an earlier one.
    fn set_observer(&mut self, observer: ProgressObserver);

    /// Run the transcode to completion, blocking the caller until done or
    /// failed. Must only be called on a valid plan.
    async fn execute(&mut self) -> Result<()>;
}

/// The external transcoding engine.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    type Input: InputHandle;
    type Output: OutputHandle;
    type Plan: ConversionPlan;

    /// Bind a read source to `path` with format auto-detection across all
    /// known container formats.
    fn open_input(&self, path: &Path) -> Result<Self::Input>;

    /// Bind a write target to `path` using the container from `policy`.
    fn open_output(&self, path: &Path, policy: FormatPolicy) -> Result<Self::Output>;

    /// Construct a conversion plan and run feasibility analysis. No output
    /// bytes are durably committed before this returns.
    async fn init_plan(
        &self,
        input: &Self::Input,
        output: &Self::Output,
        options: ResolvedOptions,
    ) -> Result<Self::Plan>;
}
