use ankirus_reader::ReaderOptions;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `ankirus probe`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let source = ctx.config.require_source()?;
    let probe = ReaderOptions::from_config(source).probe().await;
    if probe.last_modified.is_none() {
        tracing::warn!(source = %probe.source.display(), "source collection not found");
    }
    output(&probe, flags.format)
}
