//! CLI command implementations.

mod ask;
mod chunks;
mod config;
mod context;
mod doctor;
mod serve;

pub use ask::run_ask;
pub use chunks::run_chunks;
pub use config::run_config;
pub use context::run_context;
pub use doctor::run_doctor;
pub use serve::run_serve;
