mod cli;

use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use cli::Cli;
use mediaconv::convert::{run_conversion, ConversionRequest};
use mediaconv::engine::ffmpeg::FfmpegEngine;
use mediaconv::error::Error;
use mediaconv::format::FormatTable;

fn print_usage(table: &FormatTable) {
    eprintln!("{}", Cli::command().render_usage());
    eprintln!("Supported formats: {}", table.supported_tokens().join(", "));
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    // Respect RUST_LOG if set, otherwise use defaults based on the verbose
    // flag. Diagnostics go to stderr so stdout carries only progress lines
    // and the final success line.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mediaconv=debug".to_string()
        } else {
            "mediaconv=info".to_string()
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let table = FormatTable::new();

    let (input, output, format) = match (cli.input, cli.output, cli.format) {
        (Some(input), Some(output), Some(format)) => (input, output, format),
        _ => {
            let err = Error::usage("--input, --output and --format are required");
            eprintln!("{err}");
            print_usage(&table);
            return ExitCode::FAILURE;
        }
    };

    // Resolve the format before touching the filesystem: an unsupported
    // token must not delete an existing destination.
    let policy = match table.resolve(&format) {
        Some(policy) => policy,
        None => {
            let err = Error::unsupported_format(&format);
            eprintln!("{err}");
            print_usage(&table);
            return ExitCode::FAILURE;
        }
    };

    let engine = FfmpegEngine::discover();
    let request = ConversionRequest {
        input,
        output,
        policy,
        quality: cli.quality,
    };

    match run_conversion(&engine, &request).await {
        Ok(()) => {
            println!("Conversion completed.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
