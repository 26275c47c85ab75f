//! Configuration: server-wide defaults for the wait-k controller and the
//! realtime evaluation thresholds, loadable from a TOML file.

pub mod server;

pub use server::{ServerConfig, ServerConfigError};
