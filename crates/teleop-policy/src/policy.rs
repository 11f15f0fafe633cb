use async_trait::async_trait;

use teleop_core::{ActionChunk, Observation, Result};

/// A policy that is expensive to call and answers with a batch of future
/// actions. Implemented by the remote client and by test doubles.
#[async_trait]
pub trait Policy: Send {
    /// Human-readable name, e.g. "remote", "mock".
    fn name(&self) -> &str;

    /// Run one inference. Blocks (awaits) until a complete chunk arrives or
    /// the call fails; never returns a partial chunk.
    async fn infer(&mut self, observation: &Observation) -> Result<ActionChunk>;
}
