use async_trait::async_trait;

use teleop_core::{Action, Observation, Result};

use crate::broker::ActionChunkBroker;
use crate::policy::Policy;

/// The runtime's view of "something that maps an observation to an action".
///
/// The runtime never sees broker internals through this seam, so agents with
/// different buffering or pre/post-processing strategies slot in without
/// touching the loop.
#[async_trait]
pub trait Agent: Send {
    async fn get_action(&mut self, observation: &Observation) -> Result<Action>;
}

/// The standard agent: a pure pass-through to an [`ActionChunkBroker`].
pub struct PolicyAgent<P: Policy> {
    broker: ActionChunkBroker<P>,
}

impl<P: Policy> PolicyAgent<P> {
    pub fn new(broker: ActionChunkBroker<P>) -> Self {
        Self { broker }
    }
}

#[async_trait]
impl<P: Policy> Agent for PolicyAgent<P> {
    async fn get_action(&mut self, observation: &Observation) -> Result<Action> {
        self.broker.act(observation).await
    }
}
