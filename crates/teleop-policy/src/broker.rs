use tracing::debug;

use teleop_core::{Action, ActionChunk, Observation, Result, TeleopError};

use crate::policy::Policy;

/// Turns a chunk-returning policy into a one-action-per-call stream.
///
/// A fresh chunk is requested when no chunk is active or when the cursor
/// reaches `action_horizon` — which may be smaller than the chunk length,
/// discarding the stale tail for freshness. At most one inference call is
/// made per `action_horizon` invocations of [`act`](Self::act).
///
/// Strictly sequential: one owner, one call at a time.
pub struct ActionChunkBroker<P: Policy> {
    policy: P,
    action_horizon: usize,
    chunk: Option<ActionChunk>,
    cursor: usize,
}

impl<P: Policy> ActionChunkBroker<P> {
    pub fn new(policy: P, action_horizon: usize) -> Result<Self> {
        if action_horizon == 0 {
            return Err(TeleopError::ConfigValidation {
                field: "action_horizon".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(Self {
            policy,
            action_horizon,
            chunk: None,
            cursor: 0,
        })
    }

    /// Serve the next action, querying the wrapped policy only when the
    /// buffer is exhausted. An inference failure propagates uncaught; no
    /// retry, no substitute action.
    pub async fn act(&mut self, observation: &Observation) -> Result<Action> {
        if self.chunk.is_none() || self.cursor >= self.action_horizon {
            let chunk = self.policy.infer(observation).await?;
            if chunk.len() < self.action_horizon {
                // Contract breach by the policy service: the horizon must be
                // coverable by every chunk. Reject at receipt rather than
                // failing at index time steps later.
                return Err(TeleopError::Policy(format!(
                    "policy {:?} returned a chunk of {} actions, shorter than the action horizon {}",
                    self.policy.name(),
                    chunk.len(),
                    self.action_horizon
                )));
            }
            debug!(
                policy = self.policy.name(),
                chunk_len = chunk.len(),
                horizon = self.action_horizon,
                "refreshed action chunk"
            );
            self.chunk = Some(chunk);
            self.cursor = 0;
        }

        let action = self
            .chunk
            .as_ref()
            .and_then(|chunk| chunk.get(self.cursor))
            .cloned()
            .ok_or_else(|| {
                TeleopError::Policy(format!(
                    "action chunk cursor {} out of range",
                    self.cursor
                ))
            })?;
        self.cursor += 1;
        Ok(action)
    }

    /// Next-unused index into the active chunk. Always in `[0, horizon]`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn action_horizon(&self) -> usize {
        self.action_horizon
    }
}
