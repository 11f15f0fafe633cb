use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration — maps to `teleop.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleopConfig {
    pub runtime: RuntimeSection,
    pub policy: PolicySection,
    pub recording: RecordingSection,
    pub logging: LoggingSection,
}

// ── Runtime ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSection {
    /// Number of episode iterations per run.
    pub num_episodes: usize,
    /// Per-episode step ceiling; the environment's done flag can end an
    /// episode earlier.
    pub max_episode_steps: usize,
    /// Pacing ceiling in steps per second. A ceiling, not a guarantee: slow
    /// inference or environment steps push the actual rate below it.
    pub max_hz: f64,
    /// Base seed. Episode `e` resets the environment with `seed + e`.
    pub seed: u64,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            num_episodes: 5,
            max_episode_steps: 500,
            max_hz: 50.0,
            seed: 0,
        }
    }
}

// ── Policy ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySection {
    /// Host of the remote inference service.
    pub host: String,
    /// Port of the remote inference service.
    pub port: u16,
    /// Actions consumed from each chunk before a fresh inference call.
    /// May be smaller than the chunk length to trade staleness for latency.
    pub action_horizon: usize,
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            action_horizon: 10,
        }
    }
}

// ── Recording ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingSection {
    /// Whether the episode recorder subscriber is registered.
    pub enabled: bool,
    /// Directory receiving one JSONL file per episode.
    pub out_dir: PathBuf,
}

impl Default for RecordingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            out_dir: PathBuf::from("data/teleop/episodes"),
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level filter (trace, debug, info, warn, error).
    pub level: String,
    /// Output format: "pretty" or "json".
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

impl TeleopConfig {
    /// Validate the configuration. Returns warnings on success, an error
    /// message on a configuration the runtime cannot honor.
    pub fn validate(&self) -> Result<Vec<String>, String> {
        if self.runtime.num_episodes == 0 {
            return Err("runtime.num_episodes must be at least 1".into());
        }
        if self.runtime.max_episode_steps == 0 {
            return Err("runtime.max_episode_steps must be at least 1".into());
        }
        if !(self.runtime.max_hz > 0.0) {
            return Err("runtime.max_hz must be positive".into());
        }
        if self.policy.action_horizon == 0 {
            return Err("policy.action_horizon must be at least 1".into());
        }
        if self.policy.host.is_empty() {
            return Err("policy.host must not be empty".into());
        }
        if self.logging.format != "pretty" && self.logging.format != "json" {
            return Err(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            ));
        }

        let mut warnings = Vec::new();
        if self.policy.action_horizon > self.runtime.max_episode_steps {
            warnings.push(format!(
                "policy.action_horizon ({}) exceeds runtime.max_episode_steps ({}): \
                 every episode ends on its first chunk",
                self.policy.action_horizon, self.runtime.max_episode_steps
            ));
        }
        if self.runtime.max_hz > 1000.0 {
            warnings.push(format!(
                "runtime.max_hz ({}) is unusually high for a control loop",
                self.runtime.max_hz
            ));
        }
        Ok(warnings)
    }
}
