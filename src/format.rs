//! Static format resolution table.
//!
//! Maps a requested output format token to the ffmpeg muxer that builds the
//! container and to the default audio codec for that target. The table is
//! immutable, constructed once at process start, and passed explicitly into
//! the orchestrator.

use std::collections::HashMap;
use std::fmt;

/// Audio codecs the resolution table can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCodec {
    Aac,
    Mp3,
    PcmS16,
    Flac,
    Vorbis,
    Opus,
}

impl AudioCodec {
    /// The ffmpeg encoder name.
    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            AudioCodec::Aac => "aac",
            AudioCodec::Mp3 => "libmp3lame",
            AudioCodec::PcmS16 => "pcm_s16le",
            AudioCodec::Flac => "flac",
            AudioCodec::Vorbis => "libvorbis",
            AudioCodec::Opus => "libopus",
        }
    }

    /// Whether a bitrate target makes sense for this codec.
    ///
    /// PCM and FLAC are (near-)lossless; ffmpeg ignores or warns on `-b:a`
    /// for them, so the plan builder skips the flag.
    pub fn accepts_bitrate(&self) -> bool {
        !matches!(self, AudioCodec::PcmS16 | AudioCodec::Flac)
    }
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aac => write!(f, "aac"),
            Self::Mp3 => write!(f, "mp3"),
            Self::PcmS16 => write!(f, "pcm-s16"),
            Self::Flac => write!(f, "flac"),
            Self::Vorbis => write!(f, "vorbis"),
            Self::Opus => write!(f, "opus"),
        }
    }
}

/// Whether a target format carries video or is audio-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Audio,
    Video,
}

/// Resolution result for one supported format token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatPolicy {
    /// ffmpeg muxer name selecting the output container.
    pub muxer: &'static str,
    /// Audio-only or video-capable target.
    pub kind: TargetKind,
    /// Default audio codec: the encoded stream for audio-only targets, the
    /// muxed track inside the container for video targets.
    pub audio_codec: AudioCodec,
}

/// Immutable mapping from format token to [`FormatPolicy`].
#[derive(Debug)]
pub struct FormatTable {
    entries: HashMap<&'static str, FormatPolicy>,
}

impl FormatTable {
    /// Build the table of supported targets.
    pub fn new() -> Self {
        use AudioCodec::*;
        use TargetKind::*;

        let mut entries = HashMap::new();
        let mut insert = |token, muxer, kind, audio_codec| {
            entries.insert(
                token,
                FormatPolicy {
                    muxer,
                    kind,
                    audio_codec,
                },
            );
        };

        insert("mp4", "mp4", Video, Aac);
        insert("mov", "mov", Video, Aac);
        insert("mkv", "matroska", Video, Aac);
        insert("webm", "webm", Video, Opus);
        insert("m4v", "mp4", Video, Aac);
        insert("mp3", "mp3", Audio, Mp3);
        insert("wav", "wav", Audio, PcmS16);
        insert("flac", "flac", Audio, Flac);
        insert("ogg", "ogg", Audio, Vorbis);
        insert("aac", "adts", Audio, Aac);
        insert("m4a", "mp4", Audio, Aac);

        Self { entries }
    }

    /// Look up the policy for a format token (case-insensitive).
    pub fn resolve(&self, token: &str) -> Option<FormatPolicy> {
        self.entries
            .get(token.to_ascii_lowercase().as_str())
            .copied()
    }

    /// Supported format tokens, sorted, for usage output.
    pub fn supported_tokens(&self) -> Vec<&'static str> {
        let mut tokens: Vec<&'static str> = self.entries.keys().copied().collect();
        tokens.sort_unstable();
        tokens
    }
}

impl Default for FormatTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TOKENS: &[&str] = &[
        "mp4", "mov", "mkv", "webm", "m4v", "mp3", "wav", "flac", "ogg", "aac", "m4a",
    ];

    #[test]
    fn every_token_resolves_with_muxer_and_codec() {
        let table = FormatTable::new();
        for token in ALL_TOKENS {
            let policy = table.resolve(token).unwrap_or_else(|| {
                panic!("{token} should resolve");
            });
            assert!(!policy.muxer.is_empty());
            assert!(!policy.audio_codec.ffmpeg_name().is_empty());
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let table = FormatTable::new();
        assert!(table.resolve("MP4").is_some());
        assert!(table.resolve("WebM").is_some());
    }

    #[test]
    fn unknown_token_misses() {
        let table = FormatTable::new();
        assert!(table.resolve("xyz").is_none());
        assert!(table.resolve("").is_none());
    }

    #[test]
    fn wav_always_resolves_pcm() {
        let table = FormatTable::new();
        let policy = table.resolve("wav").unwrap();
        assert_eq!(policy.kind, TargetKind::Audio);
        assert_eq!(policy.audio_codec, AudioCodec::PcmS16);
        assert_eq!(policy.audio_codec.to_string(), "pcm-s16");
    }

    #[test]
    fn video_targets_pick_muxed_audio_codec() {
        let table = FormatTable::new();
        assert_eq!(table.resolve("webm").unwrap().audio_codec, AudioCodec::Opus);
        assert_eq!(table.resolve("mp4").unwrap().audio_codec, AudioCodec::Aac);
        assert_eq!(table.resolve("mkv").unwrap().audio_codec, AudioCodec::Aac);
    }

    #[test]
    fn audio_targets_pick_default_codec() {
        let table = FormatTable::new();
        assert_eq!(table.resolve("mp3").unwrap().audio_codec, AudioCodec::Mp3);
        assert_eq!(table.resolve("ogg").unwrap().audio_codec, AudioCodec::Vorbis);
        assert_eq!(table.resolve("m4a").unwrap().audio_codec, AudioCodec::Aac);
        assert_eq!(table.resolve("aac").unwrap().audio_codec, AudioCodec::Aac);
    }

    #[test]
    fn ffmpeg_encoder_names() {
        assert_eq!(AudioCodec::Mp3.ffmpeg_name(), "libmp3lame");
        assert_eq!(AudioCodec::Vorbis.ffmpeg_name(), "libvorbis");
        assert_eq!(AudioCodec::Opus.ffmpeg_name(), "libopus");
        assert_eq!(AudioCodec::PcmS16.ffmpeg_name(), "pcm_s16le");
    }

    #[test]
    fn lossless_codecs_reject_bitrate() {
        assert!(!AudioCodec::PcmS16.accepts_bitrate());
        assert!(!AudioCodec::Flac.accepts_bitrate());
        assert!(AudioCodec::Aac.accepts_bitrate());
        assert!(AudioCodec::Mp3.accepts_bitrate());
    }

    #[test]
    fn supported_tokens_sorted() {
        let table = FormatTable::new();
        let tokens = table.supported_tokens();
        assert_eq!(tokens.len(), 11);
        let mut sorted = tokens.clone();
        sorted.sort_unstable();
        assert_eq!(tokens, sorted);
    }
}
