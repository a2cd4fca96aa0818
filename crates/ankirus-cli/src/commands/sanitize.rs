use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SanitizeArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SanitizeResponse {
    input: String,
    output: String,
}

/// Handle `ankirus sanitize`.
pub async fn handle(args: &SanitizeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let sanitizer = ctx.enricher().await?;
    if sanitizer.is_none() {
        tracing::info!("sanitizer disabled, texts are echoed unchanged");
    }

    let mut results = Vec::with_capacity(args.texts.len());
    for text in &args.texts {
        let sanitized = match &sanitizer {
            Some(sanitizer) => sanitizer.sanitize(text).await?,
            None => text.clone(),
        };
        results.push(SanitizeResponse {
            input: text.clone(),
            output: sanitized,
        });
    }

    output(&results, flags.format)
}
