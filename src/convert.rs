//! Single-job conversion orchestration.
//!
//! Drives one write-once job through its lifecycle: created, validated,
//! executing, finalized or failed. Each step is a failure boundary; there is
//! no retry, no rollback of a partially written output, and no reuse of a
//! job. The destination is cleared before feasibility is known, so a job
//! rejected as invalid leaves neither the original destination file nor a
//! replacement behind. That ordering is deliberate and preserved.

use std::path::{Path, PathBuf};

use crate::engine::{
    AudioOptions, ConversionPlan, InputHandle, MediaEngine, OutputHandle, ResolvedOptions,
    VideoOptions,
};
use crate::error::{Error, Result};
use crate::format::{FormatPolicy, TargetKind};
use crate::quality::Quality;

/// One requested conversion, resolved from the CLI.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub policy: FormatPolicy,
    /// Raw quality hint; interpretation depends on the target kind.
    pub quality: String,
}

/// Merge the format policy and quality hint into engine options.
pub fn resolve_options(policy: FormatPolicy, quality: &str) -> ResolvedOptions {
    let quality = Quality::resolve(quality, policy.kind);

    let video = match policy.kind {
        TargetKind::Video => VideoOptions::Contain {
            height: quality.video_height(),
        },
        TargetKind::Audio => VideoOptions::Discard,
    };

    ResolvedOptions {
        video,
        audio: AudioOptions {
            codec: policy.audio_codec,
            bitrate: quality.audio_bitrate(),
        },
    }
}

/// Whole-percent progress deduplication.
///
/// [`update`](Self::update) returns the rounded percent only when it differs
/// from the previously emitted value; the first observation always emits.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    last: Option<u32>,
}

impl ProgressTracker {
    pub fn update(&mut self, fraction: f64) -> Option<u32> {
        let percent = (fraction.clamp(0.0, 1.0) * 100.0).round() as u32;
        if self.last == Some(percent) {
            None
        } else {
            self.last = Some(percent);
            Some(percent)
        }
    }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Run one conversion job to completion.
pub async fn run_conversion<E: MediaEngine>(engine: &E, request: &ConversionRequest) -> Result<()> {
    // 1. Validate input existence.
    if !request.input.exists() {
        return Err(Error::input_not_found(&request.input));
    }

    // 2. Resolve absolute paths.
    let input_path = absolutize(&request.input)?;
    let output_path = absolutize(&request.output)?;

    // 3. Clear the destination. This happens before feasibility is known;
    // see the module docs for why the ordering stays this way.
    if output_path.exists() {
        tracing::debug!("removing existing destination {}", output_path.display());
        std::fs::remove_file(&output_path)?;
    }

    // 4. Open handles.
    let mut input = engine.open_input(&input_path)?;
    let mut output = engine.open_output(&output_path, request.policy)?;

    // 5. Build options.
    let options = resolve_options(request.policy, &request.quality);
    tracing::debug!(?options, "resolved conversion options");

    // 6. Initialize the plan; the engine runs feasibility analysis here.
    let mut plan = engine.init_plan(&input, &output, options).await?;

    // 7. Reject invalid plans. The destination was already cleared in
    // step 3 and is not restored.
    if !plan.is_valid() {
        let reason = plan
            .invalid_reason()
            .unwrap_or("the requested codec/format combination is not supported")
            .to_string();
        if let Err(err) = input.dispose().await {
            tracing::warn!("failed to dispose input handle: {err}");
        }
        return Err(Error::InvalidConversion(reason));
    }

    // 8. Execute with a deduplicated whole-percent progress stream on stdout.
    let mut tracker = ProgressTracker::default();
    plan.set_observer(Box::new(move |fraction| {
        if let Some(percent) = tracker.update(fraction) {
            println!("Progress: {percent}%");
        }
    }));
    plan.execute().await?;

    // 9. Finalize and clean up.
    output.finalize().await?;
    input.dispose().await?;

    tracing::info!(
        "converted {} -> {}",
        input_path.display(),
        output_path.display()
    );
    Ok(())
}
