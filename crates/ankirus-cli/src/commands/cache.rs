use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CacheCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct StatsResponse {
    path: String,
    entries: u64,
    unchanged: u64,
}

#[derive(Debug, Serialize)]
struct CleanResponse {
    path: String,
    removed: u64,
}

/// Handle `ankirus cache`.
pub async fn handle(
    action: &CacheCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let store = ctx.sanitize_store().await?;
    let path = ctx.config.sanitizer.cache_db.clone();

    match action {
        CacheCommands::Stats => {
            let stats = store.stats().await?;
            output(
                &StatsResponse {
                    path,
                    entries: stats.entries,
                    unchanged: stats.unchanged,
                },
                flags.format,
            )
        }
        CacheCommands::Clean => {
            let removed = store.clear().await?;
            tracing::info!(removed, "sanitize cache cleared");
            output(&CleanResponse { path, removed }, flags.format)
        }
    }
}
