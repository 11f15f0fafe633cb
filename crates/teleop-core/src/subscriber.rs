use async_trait::async_trait;

use crate::error::Result;
use crate::record::{Action, Observation};

/// A passive observer of episode lifecycle and step events.
///
/// The runtime invokes the three hooks in registration order at every
/// notification point. Per episode each subscriber moves Idle → Active on
/// `on_episode_start` and back to Idle on `on_episode_end`; `on_step` fires
/// once per step while Active, carrying the observation the action was
/// computed from (not the one it produced).
///
/// Implementations perform side effects only — they must not mutate the
/// observation or action, which the shared borrows enforce. A hook error
/// aborts the whole run; later subscribers at that notification point are
/// not invoked.
#[async_trait]
pub trait Subscriber: Send {
    /// Name used for log and error attribution.
    fn name(&self) -> &str;

    async fn on_episode_start(&mut self) -> Result<()>;

    async fn on_step(&mut self, observation: &Observation, action: &Action) -> Result<()>;

    async fn on_episode_end(&mut self) -> Result<()>;
}
