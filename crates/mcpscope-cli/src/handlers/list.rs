//! `mcpscope list` - refresh and print the inventory.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::presentation::print_inventory;

/// Run one reconciliation and print the result.
pub async fn handle_list(ctx: &CliContext) -> Result<()> {
    let inventory = ctx.coordinator.refresh_now().await;
    print_inventory(&inventory);
    Ok(())
}
