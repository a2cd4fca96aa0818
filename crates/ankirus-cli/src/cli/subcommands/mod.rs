mod cache;
mod worker;

pub use cache::CacheCommands;
pub use worker::WorkerCommands;
