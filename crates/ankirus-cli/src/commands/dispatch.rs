use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Probe => commands::probe::handle(ctx, flags).await,
        Commands::Sanitize(args) => commands::sanitize::handle(&args, ctx, flags).await,
        Commands::Worker { action } => commands::worker::handle(&action, ctx, flags).await,
        Commands::Cache { action } => commands::cache::handle(&action, ctx, flags).await,
    }
}
