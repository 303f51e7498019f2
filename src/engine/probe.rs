//! ffprobe-backed input inspection.
//!
//! Shells out to `ffprobe -v quiet -print_format json -show_format
//! -show_streams` and reduces the JSON to what feasibility analysis and
//! progress reporting need: stream presence and total duration. ffprobe
//! auto-detects the container format, so any input it can parse is covered.

use std::path::Path;

use serde::Deserialize;

use crate::engine::command::ToolCommand;
use crate::error::{Error, Result};

/// What the probe learned about an input file.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProbeInfo {
    /// Total duration in seconds, when the container reports one.
    pub duration_secs: Option<f64>,
    pub has_video: bool,
    pub has_audio: bool,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
}

/// Probe `input` using the ffprobe binary at `ffprobe_path`.
pub async fn probe(ffprobe_path: &Path, input: &Path) -> Result<ProbeInfo> {
    let mut cmd = ToolCommand::new(ffprobe_path.to_path_buf());
    cmd.args([
        "-v",
        "quiet",
        "-print_format",
        "json",
        "-show_format",
        "-show_streams",
    ]);
    cmd.arg(input.to_string_lossy().as_ref());

    let output = cmd.execute().await?;
    let parsed: FfprobeOutput = serde_json::from_str(&output.stdout)
        .map_err(|e| Error::Probe(format!("ffprobe JSON parse error: {e}")))?;

    Ok(reduce(parsed))
}

fn reduce(output: FfprobeOutput) -> ProbeInfo {
    let duration_secs = output
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| *d > 0.0);

    let mut info = ProbeInfo {
        duration_secs,
        ..Default::default()
    };

    for stream in &output.streams {
        match stream.codec_type.as_deref() {
            Some("video") => info.has_video = true,
            Some("audio") => info.has_audio = true,
            _ => {}
        }
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ProbeInfo {
        reduce(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn reduces_video_with_audio() {
        let info = parse(
            r#"{
                "format": {"duration": "12.480000"},
                "streams": [
                    {"codec_type": "video", "codec_name": "h264"},
                    {"codec_type": "audio", "codec_name": "aac"}
                ]
            }"#,
        );
        assert!(info.has_video);
        assert!(info.has_audio);
        assert_eq!(info.duration_secs, Some(12.48));
    }

    #[test]
    fn reduces_audio_only() {
        let info = parse(
            r#"{
                "format": {"duration": "3.1"},
                "streams": [{"codec_type": "audio"}]
            }"#,
        );
        assert!(!info.has_video);
        assert!(info.has_audio);
    }

    #[test]
    fn missing_duration_is_absent() {
        let info = parse(r#"{"format": {}, "streams": [{"codec_type": "video"}]}"#);
        assert_eq!(info.duration_secs, None);
    }

    #[test]
    fn empty_output_has_no_streams() {
        let info = parse(r#"{"streams": []}"#);
        assert!(!info.has_video);
        assert!(!info.has_audio);
        assert_eq!(info.duration_secs, None);
    }

    #[test]
    fn unknown_stream_types_ignored() {
        let info = parse(
            r#"{"streams": [{"codec_type": "subtitle"}, {"codec_type": "data"}]}"#,
        );
        assert!(!info.has_video);
        assert!(!info.has_audio);
    }
}
