//! # teleop-policy
//!
//! The policy side of the control loop: the [`Policy`] inference capability,
//! a WebSocket client for a remote inference service, the
//! [`ActionChunkBroker`] that turns occasional multi-step predictions into a
//! one-action-per-call stream, and the [`Agent`] seam the runtime consumes.
//!
//! ```text
//!   Runtime ──get_action──▶ PolicyAgent ──act──▶ ActionChunkBroker
//!                                                      │ (buffer empty?)
//!                                                      ▼
//!                                              RemotePolicyClient
//!                                                      │ ws://host:port
//!                                                      ▼
//!                                              inference service
//! ```

pub mod agent;
pub mod broker;
pub mod client;
pub mod mock;
pub mod policy;
pub mod wire;

pub use agent::{Agent, PolicyAgent};
pub use broker::ActionChunkBroker;
pub use client::RemotePolicyClient;
pub use mock::{MockPolicy, MockReply};
pub use policy::Policy;
pub use wire::WireMessage;
