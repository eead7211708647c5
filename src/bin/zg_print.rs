use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use zengarden_listener::{AppConfig, Transcript, ZenGardenAdapter, ZenGardenListener};

#[derive(Parser, Debug)]
#[command(
    name = "zg_print",
    about = "Drive the default ZenGarden listener against the process streams"
)]
struct Cli {
    /// JSON config file (defaults are used if missing or invalid)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log diagnostics to stderr
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Deliver a message through the standard-output notification
    Std { message: String },
    /// Deliver a message through the error-output notification
    Err { message: String },
    /// Replay a recorded JSON transcript through the adapter
    Replay { transcript: PathBuf },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = cli
        .config
        .as_ref()
        .map(AppConfig::load_from_file)
        .unwrap_or_default();
    let adapter = ZenGardenAdapter::from_config(&config.listener);

    match cli.command {
        Commands::Std { message } => adapter.on_print_std(&message),
        Commands::Err { message } => adapter.on_print_err(&message),
        Commands::Replay { transcript } => {
            let transcript = Transcript::load(&transcript)
                .with_context(|| format!("loading transcript {}", transcript.display()))?;
            transcript.replay(&adapter);
        }
    }

    Ok(())
}
