use async_trait::async_trait;

use crate::error::Result;
use crate::record::{Action, Observation};

/// The environment boundary: a local collaborator that produces observations
/// and absorbs actions. Physics, rendering, and task definition live behind
/// this trait and are invisible to the runtime.
#[async_trait]
pub trait Environment: Send {
    /// Human-readable name for log attribution.
    fn name(&self) -> &str;

    /// Begin a new episode deterministically from `seed` and return its
    /// initial observation.
    async fn reset(&mut self, seed: u64) -> Result<Observation>;

    /// Apply one action. Returns the resulting observation and whether the
    /// episode has reached a terminal condition. A `true` done flag is
    /// authoritative: the episode ends even below the configured step ceiling.
    async fn step(&mut self, action: &Action) -> Result<(Observation, bool)>;
}
