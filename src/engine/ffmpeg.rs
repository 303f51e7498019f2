//! ffmpeg-backed implementation of the engine contract.
//!
//! Feasibility analysis happens at plan initialization: the input is probed
//! with ffprobe (container auto-detection included) and the resolved options
//! are checked against the streams actually present. Execution shells out to
//! ffmpeg with `-progress pipe:2 -nostats` and turns the progress blocks into
//! fractional callbacks against the probed duration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::engine::command::ToolCommand;
use crate::engine::probe::{self, ProbeInfo};
use crate::engine::tools::ToolRegistry;
use crate::engine::{
    ConversionPlan, InputHandle, MediaEngine, OutputHandle, ProgressObserver, ResolvedOptions,
    VideoOptions,
};
use crate::error::{Error, Result};
use crate::format::FormatPolicy;

/// Transcode ceiling. Generous enough to never cut a real job short; the
/// orchestrator itself enforces no timeout.
const TRANSCODE_TIMEOUT: Duration = Duration::from_secs(86400);

/// The ffmpeg/ffprobe pair as a [`MediaEngine`].
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    tools: ToolRegistry,
}

impl FfmpegEngine {
    pub fn new(tools: ToolRegistry) -> Self {
        Self { tools }
    }

    /// Engine using tools discovered on `PATH`. Missing tools surface as
    /// [`Error::Tool`] when a plan first needs them.
    pub fn discover() -> Self {
        Self::new(ToolRegistry::discover())
    }
}

/// Read source bound to an input path.
#[derive(Debug)]
pub struct FfmpegInput {
    path: PathBuf,
}

#[async_trait]
impl InputHandle for FfmpegInput {
    fn path(&self) -> &Path {
        &self.path
    }

    async fn dispose(&mut self) -> Result<()> {
        // ffmpeg holds no long-lived handle on the source between
        // invocations; releasing the binding is enough.
        tracing::debug!("disposed input handle for {}", self.path.display());
        Ok(())
    }
}

/// Write target bound to an output path and container muxer.
#[derive(Debug)]
pub struct FfmpegOutput {
    path: PathBuf,
    muxer: &'static str,
}

#[async_trait]
impl OutputHandle for FfmpegOutput {
    fn path(&self) -> &Path {
        &self.path
    }

    async fn finalize(&mut self) -> Result<()> {
        // The muxer writes trailers and index structures before ffmpeg
        // exits; finalization verifies the container actually materialized.
        if !self.path.exists() {
            return Err(Error::tool(
                "ffmpeg",
                format!("output file was not written: {}", self.path.display()),
            ));
        }
        tracing::debug!(
            "finalized {} container at {}",
            self.muxer,
            self.path.display()
        );
        Ok(())
    }
}

/// A feasibility-checked ffmpeg invocation.
pub struct FfmpegPlan {
    ffmpeg: PathBuf,
    args: Vec<String>,
    duration_secs: Option<f64>,
    invalid_reason: Option<String>,
    observer: Option<ProgressObserver>,
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    type Input = FfmpegInput;
    type Output = FfmpegOutput;
    type Plan = FfmpegPlan;

    fn open_input(&self, path: &Path) -> Result<Self::Input> {
        Ok(FfmpegInput {
            path: path.to_path_buf(),
        })
    }

    fn open_output(&self, path: &Path, policy: FormatPolicy) -> Result<Self::Output> {
        Ok(FfmpegOutput {
            path: path.to_path_buf(),
            muxer: policy.muxer,
        })
    }

    async fn init_plan(
        &self,
        input: &Self::Input,
        output: &Self::Output,
        options: ResolvedOptions,
    ) -> Result<Self::Plan> {
        let ffprobe = self.tools.require("ffprobe")?;
        let ffmpeg = self.tools.require("ffmpeg")?;

        let (info, invalid_reason) = match probe::probe(&ffprobe.path, input.path()).await {
            Ok(info) => {
                tracing::debug!(?info, "probed {}", input.path().display());
                let verdict = feasibility(&options, &info);
                (info, verdict)
            }
            // An input ffprobe cannot parse is an infeasible conversion,
            // not a crash: the plan is created invalid.
            Err(Error::Tool { message, .. }) | Err(Error::Probe(message)) => {
                tracing::debug!("probe rejected {}: {message}", input.path().display());
                (
                    ProbeInfo::default(),
                    Some("input could not be parsed as a media file".to_string()),
                )
            }
            Err(e) => return Err(e),
        };

        let args = build_args(input.path(), output.path(), output.muxer, &options, &info);

        Ok(FfmpegPlan {
            ffmpeg: ffmpeg.path.clone(),
            args,
            duration_secs: info.duration_secs,
            invalid_reason,
            observer: None,
        })
    }
}

#[async_trait]
impl ConversionPlan for FfmpegPlan {
    fn is_valid(&self) -> bool {
        self.invalid_reason.is_none()
    }

    fn invalid_reason(&self) -> Option<&str> {
        self.invalid_reason.as_deref()
    }

    fn set_observer(&mut self, observer: ProgressObserver) {
        self.observer = Some(observer);
    }

    async fn execute(&mut self) -> Result<()> {
        if let Some(reason) = &self.invalid_reason {
            return Err(Error::InvalidConversion(reason.clone()));
        }

        let mut observer = self.observer.take();
        let mut parser = ProgressParser::new(self.duration_secs);

        tracing::debug!("ffmpeg args: {:?}", self.args);

        let mut cmd = ToolCommand::new(self.ffmpeg.clone());
        cmd.args(self.args.iter().cloned());
        cmd.timeout(TRANSCODE_TIMEOUT);

        cmd.execute_with_stderr_lines(|line| {
            if let Some(fraction) = parser.feed(line) {
                if let Some(cb) = observer.as_mut() {
                    cb(fraction);
                }
            }
        })
        .await
    }
}

/// Check the resolved options against the probed streams. Returns the reason
/// the plan is infeasible, or `None` when it can run.
fn feasibility(options: &ResolvedOptions, info: &ProbeInfo) -> Option<String> {
    if !info.has_audio && !info.has_video {
        return Some("source has no decodable audio or video streams".to_string());
    }

    if matches!(options.video, VideoOptions::Discard) && !info.has_audio {
        return Some("audio-only target but source has no audio stream".to_string());
    }

    None
}

/// Build the ffmpeg argument list for one conversion.
fn build_args(
    input: &Path,
    output: &Path,
    muxer: &str,
    options: &ResolvedOptions,
    info: &ProbeInfo,
) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-y".into(),
        "-progress".into(),
        "pipe:2".into(),
        "-nostats".into(),
        "-i".into(),
        input.to_string_lossy().into_owned(),
    ];

    match options.video {
        VideoOptions::Discard => args.push("-vn".into()),
        VideoOptions::Contain {
            height: Some(height),
        } if info.has_video => {
            // Contain fit: cap the height, keep aspect, never upscale.
            args.push("-vf".into());
            args.push(format!("scale=-2:'min({height},ih)'"));
        }
        VideoOptions::Contain { .. } => {}
    }

    // The video encoder is left to the muxer's default, which is the
    // engine's own per-container choice.
    if info.has_audio {
        args.push("-c:a".into());
        args.push(options.audio.codec.ffmpeg_name().into());
        if let Some(bps) = options.audio.bitrate {
            if options.audio.codec.accepts_bitrate() {
                args.push("-b:a".into());
                args.push(bps.to_string());
            }
        }
    }

    args.push("-f".into());
    args.push(muxer.into());
    args.push(output.to_string_lossy().into_owned());

    args
}

/// Incremental parser for ffmpeg `-progress` key/value blocks.
///
/// Each block ends with a `progress=continue` or `progress=end` line; a
/// fraction is reported once per completed block.
struct ProgressParser {
    duration_secs: Option<f64>,
    last_out_time_us: Option<i64>,
}

impl ProgressParser {
    fn new(duration_secs: Option<f64>) -> Self {
        Self {
            duration_secs,
            last_out_time_us: None,
        }
    }

    fn feed(&mut self, line: &str) -> Option<f64> {
        if let Some(val) = line.strip_prefix("out_time_us=") {
            self.last_out_time_us = val.trim().parse::<i64>().ok();
            return None;
        }

        if let Some(state) = line.strip_prefix("progress=") {
            if state.trim() == "end" {
                return Some(1.0);
            }
            if let (Some(out_us), Some(duration)) = (self.last_out_time_us, self.duration_secs) {
                let elapsed_secs = out_us as f64 / 1_000_000.0;
                return Some((elapsed_secs / duration).clamp(0.0, 1.0));
            }
        }

        None
    }
}
