//! Error Types
//!
//! Configuration errors fail fast at startup; store errors surface missing
//! agents and I/O problems to the caller. Choosing not to express is never an error.

use thiserror::Error;

/// Errors that can occur while loading or validating tuning.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Errors raised by agent repositories and archive sinks.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("agent not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors that abort a simulation run.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("simulation cancelled after {completed_ticks} ticks")]
    Cancelled { completed_ticks: u64 },
}
