//! Configuration for the voxa world engine.
//!
//! Settings persist to disk as `config.ron`; every section falls back to
//! defaults for missing fields, and command-line arguments override what was
//! loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, MeshingConfig, StreamingConfig, WorkerConfig, WorldConfig,
};
pub use error::ConfigError;
