//! Config command - inspect configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use forkfit_store::{ConfigSummary, default_config_path};
use serde::Serialize;

use super::load_config;
use crate::Cli;
use crate::output::JsonFormatter;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration without secrets.
    Show,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigOutput {
    config_file: String,
    #[serde(flatten)]
    summary: ConfigSummary,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;
    let path = cli.config.clone().unwrap_or_else(default_config_path);

    let output = ConfigOutput {
        config_file: path.display().to_string(),
        summary: config.summary(),
    };
    JsonFormatter::new(cli.pretty).print(&output)
}
