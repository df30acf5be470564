//! `mcpscope info <pid>` - inspect one process.

use anyhow::Result;

use crate::bootstrap::CliContext;

pub async fn handle_info(ctx: &CliContext, pid: u32) -> Result<()> {
    match ctx.snapshot.process_info(pid).await? {
        Some(record) => {
            println!("pid:     {}", record.pid);
            println!("command: {}", record.command);
            if !record.args.is_empty() {
                println!("args:    {}", record.args.join(" "));
            }
        }
        None => println!("No process with pid {pid}."),
    }
    Ok(())
}
