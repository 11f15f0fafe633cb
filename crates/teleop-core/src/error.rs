use thiserror::Error;

/// Unified error type for the entire teleop runtime.
#[derive(Error, Debug)]
pub enum TeleopError {
    // ── Transport errors ───────────────────────────────────────
    #[error("transport error: {0}")]
    Transport(String),

    // ── Policy errors ──────────────────────────────────────────
    #[error("policy error: {0}")]
    Policy(String),

    // ── Environment errors ─────────────────────────────────────
    #[error("environment error: {0}")]
    Environment(String),

    // ── Subscriber errors ──────────────────────────────────────
    #[error("subscriber error: {name}: {reason}")]
    Subscriber { name: String, reason: String },

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    #[error("config validation failed: {field}: {reason}")]
    ConfigValidation { field: String, reason: String },

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TeleopError>;
