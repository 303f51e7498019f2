//! Quality hint normalization.
//!
//! A free-form `--quality` string is interpreted either as an audio bitrate
//! (`<digits>[k|kbps]`) or as a vertical resolution (`<digits>p`), never both.
//! Which interpretation applies depends on the target kind: audio-only targets
//! only accept a bitrate; video targets try a height first and fall back to a
//! bitrate for the muxed audio track. Anything else means "no value" and the
//! caller treats the hint as absent, not as zero.

use crate::format::TargetKind;

/// Parse a bitrate hint into bits per second.
///
/// A trailing `k` or `kbps` (case-insensitive) multiplies the numeric part by
/// 1000; a bare number is used directly.
pub fn parse_bitrate(value: &str) -> Option<u64> {
    let normalized = value.trim().to_ascii_lowercase();
    let (digits, kilo) = if let Some(rest) = normalized.strip_suffix("kbps") {
        (rest, true)
    } else if let Some(rest) = normalized.strip_suffix('k') {
        (rest, true)
    } else {
        (normalized.as_str(), false)
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let base: u64 = digits.parse().ok()?;
    Some(if kilo { base * 1000 } else { base })
}

/// Parse a resolution hint like `720p` into a target output height.
pub fn parse_video_height(value: &str) -> Option<u32> {
    let normalized = value.trim().to_ascii_lowercase();
    let digits = normalized.strip_suffix('p')?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}

/// A normalized quality hint, tagged by how the target kind interpreted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    /// Audio bitrate in bits per second.
    AudioBitrate(u64),
    /// Target output height in pixels.
    VideoHeight(u32),
    /// The hint did not match any accepted pattern.
    Unset,
}

impl Quality {
    /// Interpret `raw` for the given target kind.
    ///
    /// Video targets accept a height, or failing that a bitrate for the muxed
    /// audio track (the default hint `"192k"` lands here). Audio-only targets
    /// accept a bitrate only.
    pub fn resolve(raw: &str, kind: TargetKind) -> Self {
        match kind {
            TargetKind::Video => {
                if let Some(height) = parse_video_height(raw) {
                    Quality::VideoHeight(height)
                } else if let Some(bitrate) = parse_bitrate(raw) {
                    Quality::AudioBitrate(bitrate)
                } else {
                    Quality::Unset
                }
            }
            TargetKind::Audio => match parse_bitrate(raw) {
                Some(bitrate) => Quality::AudioBitrate(bitrate),
                None => Quality::Unset,
            },
        }
    }

    /// The bitrate in bits per second, when this hint carries one.
    pub fn audio_bitrate(&self) -> Option<u64> {
        match self {
            Quality::AudioBitrate(bps) => Some(*bps),
            _ => None,
        }
    }

    /// The target height in pixels, when this hint carries one.
    pub fn video_height(&self) -> Option<u32> {
        match self {
            Quality::VideoHeight(height) => Some(*height),
            _ => None,
        }
    }
}
