//! Chat command - one generative model turn.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use forkfit_core::ChatRequest;
use serde_json::Value;

use super::prepare;
use crate::Cli;
use crate::facade::chat_request_from_json;
use crate::output::JsonFormatter;

/// Arguments for the chat command.
#[derive(Args)]
pub struct ChatArgs {
    /// JSON file holding the `contents` array (or an object with `contents`).
    #[arg(long, value_name = "FILE")]
    pub contents_file: PathBuf,

    /// Primary model.
    #[arg(long)]
    pub model: Option<String>,

    /// Model retried when the primary one is overloaded.
    #[arg(long)]
    pub fallback_model: Option<String>,

    /// System instruction replacing the built-in coaching prompt.
    #[arg(long)]
    pub system: Option<String>,
}

/// Runs the chat command.
pub async fn run(args: &ChatArgs, cli: &Cli) -> Result<()> {
    let (functions, ctx) = prepare(cli).await?;
    // Anonymous callers are rejected before their input is looked at.
    ctx.require_caller()?;

    let raw = tokio::fs::read_to_string(&args.contents_file)
        .await
        .with_context(|| format!("reading {}", args.contents_file.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", args.contents_file.display()))?;

    let request = apply_overrides(chat_request_from_json(value)?, args);
    let reply = functions.gemini_chat(&ctx, &request).await?;

    JsonFormatter::new(cli.pretty).print(&reply)
}

/// Command-line flags win over the file.
fn apply_overrides(mut request: ChatRequest, args: &ChatArgs) -> ChatRequest {
    if let Some(model) = &args.model {
        request.model = Some(model.clone());
    }
    if let Some(model) = &args.fallback_model {
        request.fallback_model = Some(model.clone());
    }
    if let Some(system) = &args.system {
        request.system_instruction = Some(system.clone());
    }
    request
}
