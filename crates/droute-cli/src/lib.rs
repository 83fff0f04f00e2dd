//! DashRoute extraction CLI internals.

pub mod config;
pub mod processor;

pub use config::RunConfig;
pub use processor::process_video;
