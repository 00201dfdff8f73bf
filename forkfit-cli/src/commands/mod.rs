//! CLI commands.

pub mod chat;
pub mod config;
pub mod exercises;
pub mod foods;

use anyhow::Result;
use forkfit_core::{CallContext, CallerIdentity, CoreError};
use forkfit_store::FacadeConfig;

use crate::Cli;
use crate::facade::Functions;

/// Loads configuration honouring `--config`.
pub async fn load_config(cli: &Cli) -> Result<FacadeConfig> {
    let config = FacadeConfig::load(cli.config.as_deref())
        .await
        .map_err(|e| CoreError::Configuration(e.to_string()))?;
    Ok(config)
}

/// Builds the function surface and the caller context for one invocation.
pub async fn prepare(cli: &Cli) -> Result<(Functions, CallContext)> {
    let config = load_config(cli).await?;
    let functions = Functions::from_config(&config)?;
    Ok((functions, caller_context(cli.caller.as_deref())))
}

/// Context for the `--caller` value; blank or missing means anonymous.
pub fn caller_context(caller: Option<&str>) -> CallContext {
    caller
        .and_then(CallerIdentity::new)
        .map_or_else(CallContext::anonymous, CallContext::authenticated)
}
