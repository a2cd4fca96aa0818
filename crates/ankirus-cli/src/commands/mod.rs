pub mod cache;
pub mod dispatch;
pub mod probe;
pub mod sanitize;
pub mod worker;
