use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::schema::TeleopConfig;

/// Loads the teleop configuration from disk, applying environment-variable
/// overrides and validating the result.
pub struct ConfigLoader {
    config: Arc<RwLock<TeleopConfig>>,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > TELEOP_CONFIG env >
    /// ~/.teleop/teleop.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("TELEOP_CONFIG") {
            return PathBuf::from(p);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".teleop")
            .join("teleop.toml")
    }

    /// Load the config from disk, falling back to defaults when the file is
    /// absent.
    pub fn load(path: Option<&Path>) -> teleop_core::Result<Self> {
        let config_path = Self::resolve_path(path);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(&config_path)?;
            toml::from_str::<TeleopConfig>(&raw).map_err(|e| {
                teleop_core::TeleopError::Config(format!(
                    "failed to parse {}: {}",
                    config_path.display(),
                    e
                ))
            })?
        } else {
            warn!(?config_path, "config file not found, using defaults");
            TeleopConfig::default()
        };

        let config = apply_overrides(config, |name| std::env::var(name).ok());

        // Validate — log warnings, fail on errors
        match config.validate() {
            Ok(warnings) => {
                for w in &warnings {
                    warn!("{}", w);
                }
            }
            Err(e) => {
                return Err(teleop_core::TeleopError::Config(e));
            }
        }

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
        })
    }

    /// Get a read snapshot of the current config.
    pub fn get(&self) -> TeleopConfig {
        self.config.read().clone()
    }

    /// Path the config was loaded from (or would have been).
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

/// Apply overrides from a variable lookup (TELEOP_POLICY_HOST, ...).
/// Factored over a closure so tests can drive it without touching the
/// process environment.
pub fn apply_overrides(
    mut config: TeleopConfig,
    get: impl Fn(&str) -> Option<String>,
) -> TeleopConfig {
    if let Some(v) = get("TELEOP_POLICY_HOST") {
        config.policy.host = v;
    }
    if let Some(v) = get("TELEOP_POLICY_PORT") {
        match v.parse::<u16>() {
            Ok(port) => config.policy.port = port,
            Err(_) => warn!(value = %v, "ignoring non-numeric TELEOP_POLICY_PORT"),
        }
    }
    if let Some(v) = get("TELEOP_ACTION_HORIZON") {
        match v.parse::<usize>() {
            Ok(h) => config.policy.action_horizon = h,
            Err(_) => warn!(value = %v, "ignoring non-numeric TELEOP_ACTION_HORIZON"),
        }
    }
    if let Some(v) = get("TELEOP_NUM_EPISODES") {
        match v.parse::<usize>() {
            Ok(n) => config.runtime.num_episodes = n,
            Err(_) => warn!(value = %v, "ignoring non-numeric TELEOP_NUM_EPISODES"),
        }
    }
    if let Some(v) = get("TELEOP_MAX_HZ") {
        match v.parse::<f64>() {
            Ok(hz) => config.runtime.max_hz = hz,
            Err(_) => warn!(value = %v, "ignoring non-numeric TELEOP_MAX_HZ"),
        }
    }
    if let Some(v) = get("TELEOP_LOG_LEVEL") {
        config.logging.level = v;
    }
    if let Some(v) = get("TELEOP_OUT_DIR") {
        config.recording.out_dir = PathBuf::from(v);
    }
    config
}
