// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! ForkFit CLI - the callable nutrition, exercise and coaching functions.
//!
//! # Examples
//!
//! ```bash
//! # Food search as a signed-in caller
//! forkfit --caller uid-1 foods search "greek yogurt"
//!
//! # Barcode lookup
//! forkfit --caller uid-1 foods barcode "0 41196 91021 3" --region US
//!
//! # Exercise search
//! FORKFIT_CALLER_ID=uid-1 forkfit exercises --muscle biceps
//!
//! # Coaching chat turn
//! forkfit --caller uid-1 chat --contents-file turn.json --pretty
//!
//! # Effective configuration
//! forkfit config show
//! ```

mod commands;
mod facade;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{chat, config, exercises, foods};
use output::{ErrorEnvelope, JsonFormatter};

// ============================================================================
// CLI Definition
// ============================================================================

/// ForkFit CLI - nutrition, exercise and coaching functions.
#[derive(Parser)]
#[command(name = "forkfit")]
#[command(about = "Nutrition, exercise and coaching functions")]
#[command(long_about = r#"
ForkFit fronts three upstream APIs:
  • FatSecret (foods)            OAuth2 with OAuth1 fallback
  • API Ninjas (exercises)       API key
  • Google Gemini (chat)         API key, fallback model on overload

Every function requires a caller id (--caller or FORKFIT_CALLER_ID).
Results are printed as JSON on stdout.

Examples:
  forkfit --caller uid-1 foods search apple
  forkfit --caller uid-1 foods details 33691
  forkfit --caller uid-1 exercises --muscle biceps
  forkfit config show
"#)]
#[command(version)]
#[command(author = "ForkFit Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Id of the signed-in caller.
    #[arg(long, env = "FORKFIT_CALLER_ID", global = true)]
    pub caller: Option<String>,

    /// Config file (defaults to the user config dir).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Send one conversation turn to the coaching model.
    Chat(chat::ChatArgs),

    /// Search the exercise database.
    #[command(visible_alias = "x")]
    Exercises(exercises::ExercisesArgs),

    /// Food search, autocomplete, details and barcode lookup.
    #[command(visible_alias = "f")]
    Foods(foods::FoodsArgs),

    /// Inspect configuration.
    Config(config::ConfigArgs),
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// Any failed command.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("forkfit=debug,info")
    } else {
        EnvFilter::new("forkfit=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Chat(args) => chat::run(args, &cli).await,
        Commands::Exercises(args) => exercises::run(args, &cli).await,
        Commands::Foods(args) => foods::run(args, &cli).await,
        Commands::Config(args) => config::run(args, &cli).await,
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "Command failed");
        let envelope = ErrorEnvelope::from_error(&e);
        match JsonFormatter::new(cli.pretty).format(&envelope) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("Error: {e}"),
        }
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}
