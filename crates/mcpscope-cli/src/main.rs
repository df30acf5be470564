//! CLI entry point - parses arguments, wires the context, dispatches.

use clap::Parser;

use mcpscope_cli::{Cli, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; --verbose lowers the default level, and
    // RUST_LOG still wins when set.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if cli.verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let ctx = bootstrap()?;

    // No subcommand behaves like `list`.
    match cli.command.unwrap_or(Commands::List) {
        Commands::List => handlers::list::handle_list(&ctx).await,
        Commands::Start { name } => handlers::lifecycle::handle_start(&ctx, &name).await,
        Commands::Stop { name } => handlers::lifecycle::handle_stop(&ctx, &name).await,
        Commands::Kill { pid } => handlers::lifecycle::handle_kill(&ctx, pid).await,
        Commands::Uninstall { name } => handlers::lifecycle::handle_uninstall(&ctx, &name).await,
        Commands::Info { pid } => handlers::info::handle_info(&ctx, pid).await,
        Commands::Watch { interval } => handlers::watch::handle_watch(&ctx, interval).await,
    }
}
