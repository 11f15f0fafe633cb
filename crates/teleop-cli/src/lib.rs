//! # teleop-cli
//!
//! Command-line interface for the teleop runtime.
//!
//! ## Commands
//!
//! - `teleop run` — Connect to the inference service and run episodes
//! - `teleop config` — Show the effective configuration
//! - `teleop version` — Show version info

pub mod commands;

pub use commands::Cli;
