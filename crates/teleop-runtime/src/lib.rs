//! # teleop-runtime
//!
//! The orchestrator: an episode/step loop that drives an environment with an
//! agent's actions, paces itself to a frequency ceiling, and fans every
//! lifecycle event out to an ordered set of subscribers.
//!
//! ```text
//!              ┌─────────────┐
//!              │   Runtime    │
//!              │              │
//!              │  per episode:│
//!              │  1. reset    │ ← Environment
//!              │  2. start    │ → subscribers, in order
//!              │  per step:   │
//!              │  3. act      │ ← Agent (chunk broker behind it)
//!              │  4. step     │ ← Environment
//!              │  5. notify   │ → subscribers, in order
//!              │  6. pace     │ ← frequency ceiling
//!              │  7. end      │ → subscribers, in order
//!              └──────────────┘
//! ```
//!
//! One logical task drives everything; a step completes fully before the
//! next begins, and any error anywhere aborts the whole run.

pub mod runtime;
pub mod scripted;
pub mod subscribers;

pub use runtime::{Runtime, RuntimeConfig};
pub use scripted::ScriptedEnv;
pub use subscribers::{ActionLogSubscriber, EpisodeRecorder};
