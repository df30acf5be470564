//! `mcpscope watch` - reprint the inventory on a polling interval.

use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::presentation::print_inventory;

/// Poll through the refresh coordinator until interrupted.
///
/// All timing goes through the coordinator, so a manual refresh or a
/// mutation landing mid-interval coalesces instead of racing.
pub async fn handle_watch(ctx: &CliContext, interval_secs: u64) -> Result<()> {
    let mut completed = ctx.coordinator.completed();
    let poller = ctx
        .coordinator
        .start_polling(Duration::from_secs(interval_secs.max(1)));

    loop {
        if completed.changed().await.is_err() {
            break;
        }
        let cycle = *completed.borrow_and_update();
        debug!(cycle, "watch observed completed refresh");
        let inventory = ctx.coordinator.current().await;
        println!("\x1B[2J\x1B[H"); // clear screen between frames
        print_inventory(&inventory);
        println!("\n(refreshing every {interval_secs}s, ctrl-c to exit)");
    }

    poller.abort();
    Ok(())
}
