//! Commands of the `hc` binary. Each one is a [`Module`].

pub mod api;
pub mod config;
pub mod explore;
pub mod log;

use crate::infrastructure::config::AppContext;
use anyhow::Result;
use async_trait::async_trait;

/// Capabilities shared by every command
#[async_trait]
pub trait Module: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn logo(&self) -> &'static str;
    fn usage(&self) -> String;

    /// Runs the command. Failures of the command itself are reported to the
    /// console; `Err` is reserved for broken setup.
    async fn execute(&self, ctx: &AppContext, args: &[String]) -> Result<()>;
}

/// Runs `module` with start and finish log lines around it.
pub async fn run_module(module: &dyn Module, ctx: &AppContext, args: &[String]) -> Result<()> {
    tracing::info!(module = module.name(), args = %args.join(", "), "executing module");
    let result = module.execute(ctx, args).await;
    tracing::info!(module = module.name(), ok = result.is_ok(), "module execution complete");
    result
}
