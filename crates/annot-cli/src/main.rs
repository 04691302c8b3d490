//! `annot` binary: offline audio-annotation pipeline entry points.

mod cli;
mod commands;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Command};

#[tokio::main]
async fn main() {
    // Default to info for our own crates, quiet elsewhere; RUST_LOG overrides
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("warn,annot_cli=info,annot_segments=info,annot_media=info")
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(true)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Filter(args) => commands::filter(args),
        Command::MatchSpeakers(args) => commands::match_speakers_cmd(args),
        Command::Extract(args) => commands::extract(args).await,
        Command::DetectSilence(args) => commands::detect_silence_cmd(args).await,
    }
}
