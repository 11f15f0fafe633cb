use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info};
use url::Url;

use teleop_core::{ActionChunk, Observation, Result, TeleopError};

use crate::policy::Policy;
use crate::wire::WireMessage;

/// WebSocket client for a remote inference service.
///
/// One connection, one in-flight request: `infer` sends a single JSON
/// `infer` frame and awaits the matching `chunk` or `error` frame. Failures
/// are terminal — there is no reconnect, retry, or timeout here; a hung
/// service hangs the caller.
pub struct RemotePolicyClient {
    endpoint: String,
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl RemotePolicyClient {
    /// Connect to `ws://host:port`. Fails fast on an unreachable service.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let endpoint = format!("ws://{host}:{port}");
        let url = Url::parse(&endpoint)
            .map_err(|e| TeleopError::Transport(format!("invalid endpoint {endpoint}: {e}")))?;

        let (stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| TeleopError::Transport(format!("connect {endpoint}: {e}")))?;

        info!(endpoint = %endpoint, "connected to inference service");
        Ok(Self { endpoint, stream })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Policy for RemotePolicyClient {
    fn name(&self) -> &str {
        "remote"
    }

    async fn infer(&mut self, observation: &Observation) -> Result<ActionChunk> {
        let request = WireMessage::Infer {
            observation: observation.clone(),
        };
        let payload = serde_json::to_string(&request)?;
        self.stream
            .send(Message::text(payload))
            .await
            .map_err(|e| TeleopError::Transport(format!("send to {}: {e}", self.endpoint)))?;

        // Skip control frames until the reply arrives.
        while let Some(frame) = self.stream.next().await {
            let frame = frame
                .map_err(|e| TeleopError::Transport(format!("recv from {}: {e}", self.endpoint)))?;
            match frame {
                Message::Text(text) => {
                    let reply: WireMessage = serde_json::from_str(&text).map_err(|e| {
                        TeleopError::Transport(format!("malformed reply from {}: {e}", self.endpoint))
                    })?;
                    return match reply {
                        WireMessage::Chunk { actions } => {
                            debug!(len = actions.len(), "received action chunk");
                            Ok(ActionChunk::new(actions))
                        }
                        WireMessage::Error { message } => Err(TeleopError::Policy(message)),
                        WireMessage::Infer { .. } => Err(TeleopError::Transport(
                            "unexpected infer frame from server".into(),
                        )),
                    };
                }
                Message::Ping(_) | Message::Pong(_) => continue,
                Message::Close(_) => {
                    return Err(TeleopError::Transport(format!(
                        "{} closed the connection mid-inference",
                        self.endpoint
                    )));
                }
                other => {
                    return Err(TeleopError::Transport(format!(
                        "unexpected frame from {}: {other:?}",
                        self.endpoint
                    )));
                }
            }
        }

        Err(TeleopError::Transport(format!(
            "{} disconnected before replying",
            self.endpoint
        )))
    }
}
