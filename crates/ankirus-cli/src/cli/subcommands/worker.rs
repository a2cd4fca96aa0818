use clap::Subcommand;

/// Direct worker calls.
#[derive(Clone, Debug, Subcommand)]
pub enum WorkerCommands {
    /// Invoke a worker method with a JSON argument.
    Call {
        /// Method name, e.g. `purify` or `mathjax`.
        method: String,
        /// Argument as JSON; bare text that is not valid JSON is sent as a string.
        #[arg(default_value = "null")]
        args: String,
    },
    /// Round-trip a string through the worker's `test` method.
    Ping {
        #[arg(default_value = "ping")]
        text: String,
    },
}
