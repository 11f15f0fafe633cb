use serde::{Deserialize, Serialize};

use teleop_core::{Action, Observation};

/// Frames exchanged with the inference service over the WebSocket.
///
/// One `Infer` request is answered by exactly one `Chunk` or one `Error`;
/// there is no streaming and no partial chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WireMessage {
    /// Client → server: run inference on this observation.
    Infer { observation: Observation },
    /// Server → client: the complete predicted action chunk.
    Chunk { actions: Vec<Action> },
    /// Server → client: inference failed.
    Error { message: String },
}
