use anyhow::Context;
use serde::Serialize;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::WorkerCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct PingResponse {
    sent: String,
    received: String,
}

/// Handle `ankirus worker`.
pub async fn handle(
    action: &WorkerCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        WorkerCommands::Call { method, args } => {
            let args = parse_args(args);
            let result = ctx
                .bridge
                .call(method, args)
                .await
                .with_context(|| format!("worker call '{method}' failed"))?;
            output(&result, flags.format)
        }
        WorkerCommands::Ping { text } => {
            let received = ctx.bridge.echo(text).await.context("worker ping failed")?;
            output(
                &PingResponse {
                    sent: text.clone(),
                    received,
                },
                flags.format,
            )
        }
    }
}

/// JSON when it parses, otherwise the text itself as a JSON string.
fn parse_args(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
