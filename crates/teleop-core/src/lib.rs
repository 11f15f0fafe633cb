//! # teleop-core
//!
//! Core types, traits, and primitives for the teleop episodic control runtime.
//! This crate defines the shared vocabulary used by every other crate in the
//! workspace: the observation/action data model, the environment and
//! subscriber capability traits, and the unified error type.

pub mod env;
pub mod error;
pub mod record;
pub mod subscriber;

pub use env::Environment;
pub use error::{Result, TeleopError};
pub use record::{Action, ActionChunk, Observation, Value};
pub use subscriber::Subscriber;
