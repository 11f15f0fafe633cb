//! Mock policy for deterministic testing.
//!
//! Returns pre-configured chunks without opening any connection.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use teleop_core::{Action, ActionChunk, Observation, Result, TeleopError, Value};

use crate::policy::Policy;

/// One queued reply from the mock.
#[derive(Clone)]
pub enum MockReply {
    Chunk(ActionChunk),
    Error(String),
}

/// A mock policy that serves queued replies, falling back to an optional
/// default chunk once the queue is empty. Records every observation it was
/// asked about for assertions in tests.
pub struct MockPolicy {
    name: String,
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    default_chunk: Option<ActionChunk>,
    observations: Arc<Mutex<Vec<Observation>>>,
}

impl MockPolicy {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replies: Arc::new(Mutex::new(VecDeque::new())),
            default_chunk: None,
            observations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a chunk reply.
    pub fn with_chunk(self, actions: Vec<Action>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Chunk(ActionChunk::new(actions)));
        self
    }

    /// Queue an error reply.
    pub fn with_error(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Error(message.to_string()));
        self
    }

    /// Chunk served whenever the reply queue is empty.
    pub fn with_default_chunk(mut self, actions: Vec<Action>) -> Self {
        self.default_chunk = Some(ActionChunk::new(actions));
        self
    }

    /// A default chunk of `len` actions whose single `"index"` field counts
    /// up from 0, handy for cursor assertions.
    pub fn with_counting_chunk(self, len: usize) -> Self {
        let actions = (0..len)
            .map(|i| Action::single("index", Value::scalar(i as f64)))
            .collect();
        self.with_default_chunk(actions)
    }

    /// Number of inference calls made so far.
    pub fn call_count(&self) -> usize {
        self.observations.lock().unwrap().len()
    }

    /// Handle for asserting on recorded observations after the mock has been
    /// moved into a broker.
    pub fn recorded_observations(&self) -> Arc<Mutex<Vec<Observation>>> {
        Arc::clone(&self.observations)
    }
}

#[async_trait]
impl Policy for MockPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn infer(&mut self, observation: &Observation) -> Result<ActionChunk> {
        self.observations.lock().unwrap().push(observation.clone());

        let queued = self.replies.lock().unwrap().pop_front();
        match queued {
            Some(MockReply::Chunk(chunk)) => Ok(chunk),
            Some(MockReply::Error(message)) => Err(TeleopError::Transport(message)),
            None => match &self.default_chunk {
                Some(chunk) => Ok(chunk.clone()),
                None => Err(TeleopError::Policy(format!(
                    "mock policy {:?} has no reply queued",
                    self.name
                ))),
            },
        }
    }
}
