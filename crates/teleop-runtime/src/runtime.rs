use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use teleop_core::{Environment, Result, Subscriber, TeleopError};
use teleop_policy::Agent;

/// Loop parameters, fixed at construction.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub num_episodes: usize,
    pub max_episode_steps: usize,
    /// Pacing ceiling in steps per second.
    pub max_hz: f64,
    /// Base seed; episode `e` resets the environment with `seed + e`.
    pub seed: u64,
}

/// Per-episode counters, reset on every episode start.
struct EpisodeState {
    episode: usize,
    step: usize,
    done: bool,
}

/// The orchestrator that owns the episode/step loop.
///
/// Everything is strictly sequential: one step fully completes
/// (observation → action → environment update → subscriber fan-out) before
/// the next begins, and subscribers are notified in registration order at
/// every notification point. The only legitimately slow awaits are remote
/// inference inside the agent and subscriber I/O; both stay inline.
pub struct Runtime {
    environment: Box<dyn Environment>,
    agent: Box<dyn Agent>,
    subscribers: Vec<Box<dyn Subscriber>>,
    config: RuntimeConfig,
}

impl Runtime {
    pub fn new(
        environment: Box<dyn Environment>,
        agent: Box<dyn Agent>,
        subscribers: Vec<Box<dyn Subscriber>>,
        config: RuntimeConfig,
    ) -> Result<Self> {
        // The pacer period is 1 / max_hz; a non-positive or NaN ceiling has
        // no meaningful period. Rejected here so callers constructing a
        // RuntimeConfig directly hit the same wall as the config layer.
        if !(config.max_hz > 0.0 && config.max_hz.is_finite()) {
            return Err(TeleopError::ConfigValidation {
                field: "max_hz".into(),
                reason: format!("must be a positive frequency, got {}", config.max_hz),
            });
        }
        Ok(Self {
            environment,
            agent,
            subscribers,
            config,
        })
    }

    /// Run every configured episode to completion. Any error — inference,
    /// environment, or subscriber — aborts immediately; there is no
    /// partial-episode recovery.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            environment = self.environment.name(),
            num_episodes = self.config.num_episodes,
            max_episode_steps = self.config.max_episode_steps,
            max_hz = self.config.max_hz,
            "starting run"
        );
        for episode in 0..self.config.num_episodes {
            self.run_episode(episode).await?;
        }
        info!(num_episodes = self.config.num_episodes, "run complete");
        Ok(())
    }

    async fn run_episode(&mut self, episode: usize) -> Result<()> {
        let seed = self.config.seed + episode as u64;
        let mut observation = self.environment.reset(seed).await?;
        info!(episode, seed, "episode start");

        let mut state = EpisodeState {
            episode,
            step: 0,
            done: false,
        };

        for subscriber in &mut self.subscribers {
            let name = subscriber.name().to_string();
            subscriber
                .on_episode_start()
                .await
                .map_err(|e| attribute(&name, e))?;
        }

        // The first tick of a tokio interval resolves immediately; consume
        // it so pacing only delays between steps. Delayed missed-tick
        // behavior keeps this a ceiling: a slow step never earns burst
        // catch-up ticks.
        let period = Duration::from_secs_f64(1.0 / self.config.max_hz);
        let mut pacer = tokio::time::interval(period);
        pacer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        pacer.tick().await;

        loop {
            let action = self.agent.get_action(&observation).await?;
            let (next_observation, done) = self.environment.step(&action).await?;
            state.done = done;

            // Subscribers observe the pre-step observation: the (state,
            // action) pair, not (next_state, action).
            for subscriber in &mut self.subscribers {
                let name = subscriber.name().to_string();
                subscriber
                    .on_step(&observation, &action)
                    .await
                    .map_err(|e| attribute(&name, e))?;
            }

            state.step += 1;
            if state.done || state.step >= self.config.max_episode_steps {
                debug!(
                    episode = state.episode,
                    steps = state.step,
                    done = state.done,
                    "episode loop terminated"
                );
                break;
            }

            pacer.tick().await;
            observation = next_observation;
        }

        for subscriber in &mut self.subscribers {
            let name = subscriber.name().to_string();
            subscriber
                .on_episode_end()
                .await
                .map_err(|e| attribute(&name, e))?;
        }
        info!(episode, steps = state.step, done = state.done, "episode end");
        Ok(())
    }
}

/// Tag a hook failure with the subscriber it came from, unless it already
/// carries an attribution.
fn attribute(name: &str, err: TeleopError) -> TeleopError {
    match err {
        err @ TeleopError::Subscriber { .. } => err,
        other => TeleopError::Subscriber {
            name: name.to_string(),
            reason: other.to_string(),
        },
    }
}
