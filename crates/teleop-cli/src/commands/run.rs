use std::path::PathBuf;
use tracing::{info, warn};

use teleop_config::TeleopConfig;
use teleop_core::{Result, Subscriber, TeleopError};
use teleop_policy::{ActionChunkBroker, PolicyAgent, RemotePolicyClient};
use teleop_runtime::{ActionLogSubscriber, EpisodeRecorder, Runtime, RuntimeConfig, ScriptedEnv};

/// Flag-level overrides for `teleop run`, applied on top of the loaded
/// config.
pub struct RunOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub num_episodes: Option<usize>,
    pub max_episode_steps: Option<usize>,
    pub max_hz: Option<f64>,
    pub action_horizon: Option<usize>,
    pub seed: Option<u64>,
    pub out_dir: Option<PathBuf>,
    pub no_record: bool,
}

impl RunOverrides {
    fn apply(self, mut config: TeleopConfig) -> TeleopConfig {
        if let Some(v) = self.host {
            config.policy.host = v;
        }
        if let Some(v) = self.port {
            config.policy.port = v;
        }
        if let Some(v) = self.num_episodes {
            config.runtime.num_episodes = v;
        }
        if let Some(v) = self.max_episode_steps {
            config.runtime.max_episode_steps = v;
        }
        if let Some(v) = self.max_hz {
            config.runtime.max_hz = v;
        }
        if let Some(v) = self.action_horizon {
            config.policy.action_horizon = v;
        }
        if let Some(v) = self.seed {
            config.runtime.seed = v;
        }
        if let Some(v) = self.out_dir {
            config.recording.out_dir = v;
        }
        if self.no_record {
            config.recording.enabled = false;
        }
        config
    }
}

pub async fn cmd_run(config: TeleopConfig, overrides: RunOverrides) -> Result<()> {
    let config = overrides.apply(config);
    // Flags may have invalidated the loaded config; re-check before connecting.
    match config.validate() {
        Ok(warnings) => {
            for w in &warnings {
                warn!("{}", w);
            }
        }
        Err(e) => return Err(TeleopError::Config(e)),
    }

    let client = RemotePolicyClient::connect(&config.policy.host, config.policy.port).await?;
    let broker = ActionChunkBroker::new(client, config.policy.action_horizon)?;
    let agent = PolicyAgent::new(broker);

    let mut subscribers: Vec<Box<dyn Subscriber>> = Vec::new();
    if config.recording.enabled {
        subscribers.push(Box::new(EpisodeRecorder::new(&config.recording.out_dir)));
    }
    subscribers.push(Box::new(ActionLogSubscriber::new()));

    info!(
        host = %config.policy.host,
        port = config.policy.port,
        action_horizon = config.policy.action_horizon,
        num_episodes = config.runtime.num_episodes,
        "starting teleop run"
    );

    let mut runtime = Runtime::new(
        Box::new(ScriptedEnv::new(None)),
        Box::new(agent),
        subscribers,
        RuntimeConfig {
            num_episodes: config.runtime.num_episodes,
            max_episode_steps: config.runtime.max_episode_steps,
            max_hz: config.runtime.max_hz,
            seed: config.runtime.seed,
        },
    )?;
    runtime.run().await
}
