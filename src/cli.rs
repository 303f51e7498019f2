use clap::Parser;
use std::path::PathBuf;

// `--input`, `--output` and `--format` are all required, but modeled as
// optional so a missing flag produces the tool's own usage error and exit
// code instead of clap's.
#[derive(Debug, Parser)]
#[command(name = "mediaconv")]
#[command(author, version, about = "Convert a media file to a target format using ffmpeg")]
pub struct Cli {
    /// Source media file
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Destination file (overwritten if it already exists)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Target format (mp4, mov, mkv, webm, m4v, mp3, wav, flac, ogg, aac, m4a)
    #[arg(long)]
    pub format: Option<String>,

    /// Quality hint: "<digits>[k|kbps]" bitrate for audio targets,
    /// "<digits>p" height for video targets
    #[arg(long, default_value = "192k")]
    pub quality: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn parses_full_invocation() {
        let cli = parse(&[
            "mediaconv",
            "--input",
            "a.wav",
            "--output",
            "b.mp3",
            "--format",
            "mp3",
            "--quality",
            "128k",
        ]);
        assert_eq!(cli.input.unwrap(), PathBuf::from("a.wav"));
        assert_eq!(cli.output.unwrap(), PathBuf::from("b.mp3"));
        assert_eq!(cli.format.unwrap(), "mp3");
        assert_eq!(cli.quality, "128k");
    }

    #[test]
    fn quality_defaults_to_192k() {
        let cli = parse(&["mediaconv", "--input", "a", "--output", "b", "--format", "mp4"]);
        assert_eq!(cli.quality, "192k");
    }

    #[test]
    fn missing_flags_still_parse() {
        // Required-flag validation happens in main, not in clap.
        let cli = parse(&["mediaconv"]);
        assert!(cli.input.is_none());
        assert!(cli.output.is_none());
        assert!(cli.format.is_none());
    }

    #[test]
    fn rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["mediaconv", "input.wav"]).is_err());
    }
}
