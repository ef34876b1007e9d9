//! Error types for the campsite crate

use thiserror::Error;

/// Main error type for the crate
///
/// Behaviors never fail at runtime; this only covers configuration loading
/// and the binary's setup path.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
