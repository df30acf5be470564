//! Lifecycle subcommands: start, stop, kill, uninstall.
//!
//! Every operation already triggers a refresh inside the service; the
//! handlers wait for that refresh and print the post-mutation state so
//! the user sees what actually happened.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::presentation::print_inventory;

pub async fn handle_start(ctx: &CliContext, name: &str) -> Result<()> {
    let pid = ctx.lifecycle.start(name).await?;
    println!("Started '{name}' (pid {pid}).\n");
    print_refreshed(ctx).await
}

pub async fn handle_stop(ctx: &CliContext, name: &str) -> Result<()> {
    ctx.lifecycle.stop(name).await?;
    println!("Stopped '{name}'.\n");
    print_refreshed(ctx).await
}

pub async fn handle_kill(ctx: &CliContext, pid: u32) -> Result<()> {
    ctx.lifecycle.kill(pid).await?;
    println!("Killed pid {pid}.\n");
    print_refreshed(ctx).await
}

pub async fn handle_uninstall(ctx: &CliContext, name: &str) -> Result<()> {
    ctx.lifecycle.uninstall(name).await?;
    println!("Uninstalled '{name}'.\n");
    print_refreshed(ctx).await
}

async fn print_refreshed(ctx: &CliContext) -> Result<()> {
    let inventory = ctx.coordinator.refresh_now().await;
    print_inventory(&inventory);
    Ok(())
}
