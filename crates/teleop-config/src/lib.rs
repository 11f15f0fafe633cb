//! # teleop-config
//!
//! Configuration for the teleop runtime (`teleop.toml`): serde schema with
//! defaults, loader with environment-variable overrides and validation.
//! Everything here is fixed at runtime construction — there is no hot reload
//! because nothing in the control loop can consume one mid-run.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{
    LoggingSection, PolicySection, RecordingSection, RuntimeSection, TeleopConfig,
};
