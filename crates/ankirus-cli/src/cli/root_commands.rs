use clap::{Args, Subcommand};

use crate::cli::subcommands::{CacheCommands, WorkerCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Show the source collection, its side-file and temporary copy paths.
    Probe,
    /// Sanitize text through the worker and the banned word list.
    Sanitize(SanitizeArgs),
    /// Talk to the worker process directly.
    Worker {
        #[command(subcommand)]
        action: WorkerCommands,
    },
    /// Sanitize cache maintenance.
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
}

/// Arguments for `ankirus sanitize`.
#[derive(Clone, Debug, Args)]
pub struct SanitizeArgs {
    /// Texts to sanitize, each on its own.
    #[arg(required = true)]
    pub texts: Vec<String>,
}
