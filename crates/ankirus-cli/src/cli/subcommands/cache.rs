use clap::Subcommand;

/// Sanitize cache management.
#[derive(Clone, Debug, Subcommand)]
pub enum CacheCommands {
    /// Show cache statistics.
    Stats,
    /// Delete every cached entry.
    Clean,
}
