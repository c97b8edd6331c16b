//! Startup concerns: configuration and tracing.

pub mod config;
pub mod telemetry;

pub use config::*;
pub use telemetry::*;
