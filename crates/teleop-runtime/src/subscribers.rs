use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use teleop_core::{Action, Observation, Result, Subscriber, TeleopError};

// ── Action log ─────────────────────────────────────────────────

/// Logs every dispatched action through `tracing`.
pub struct ActionLogSubscriber {
    step: usize,
}

impl ActionLogSubscriber {
    pub fn new() -> Self {
        Self { step: 0 }
    }
}

impl Default for ActionLogSubscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Subscriber for ActionLogSubscriber {
    fn name(&self) -> &str {
        "action_log"
    }

    async fn on_episode_start(&mut self) -> Result<()> {
        self.step = 0;
        info!("action log: new episode");
        Ok(())
    }

    async fn on_step(&mut self, _observation: &Observation, action: &Action) -> Result<()> {
        let fields: Vec<&str> = action.field_names().collect();
        info!(step = self.step, action_fields = ?fields, "action dispatched");
        self.step += 1;
        Ok(())
    }

    async fn on_episode_end(&mut self) -> Result<()> {
        info!(steps = self.step, "action log: episode over");
        Ok(())
    }
}

// ── Episode recorder ───────────────────────────────────────────

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EpisodeRecord<'a> {
    Meta {
        episode: usize,
        started_at: String,
    },
    Step {
        step: usize,
        observation: &'a Observation,
        action: &'a Action,
    },
}

/// Persists each episode as a JSONL file under `out_dir`: one `meta` line
/// followed by one `step` line per step.
///
/// The output directory is created lazily on the first episode start, and
/// the per-episode file is closed on episode end. Dropping the recorder
/// mid-episode (an aborted run) flushes whatever was written, so no step
/// that was notified is lost.
pub struct EpisodeRecorder {
    out_dir: PathBuf,
    episode: usize,
    step: usize,
    writer: Option<BufWriter<File>>,
}

impl EpisodeRecorder {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            episode: 0,
            step: 0,
            writer: None,
        }
    }

    fn write_record(&mut self, record: &EpisodeRecord<'_>) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| TeleopError::Subscriber {
            name: "episode_recorder".into(),
            reason: "on_step outside an episode".into(),
        })?;
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

#[async_trait]
impl Subscriber for EpisodeRecorder {
    fn name(&self) -> &str {
        "episode_recorder"
    }

    async fn on_episode_start(&mut self) -> Result<()> {
        std::fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(format!("episode_{:04}.jsonl", self.episode));
        debug!(path = %path.display(), "recording episode");

        self.writer = Some(BufWriter::new(File::create(&path)?));
        self.step = 0;
        self.write_record(&EpisodeRecord::Meta {
            episode: self.episode,
            started_at: Utc::now().to_rfc3339(),
        })
    }

    async fn on_step(&mut self, observation: &Observation, action: &Action) -> Result<()> {
        let record = EpisodeRecord::Step {
            step: self.step,
            observation,
            action,
        };
        self.write_record(&record)?;
        self.step += 1;
        Ok(())
    }

    async fn on_episode_end(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        info!(episode = self.episode, steps = self.step, "episode recorded");
        self.episode += 1;
        Ok(())
    }
}

impl Drop for EpisodeRecorder {
    fn drop(&mut self) {
        // Scoped release on every exit path, including an aborted run.
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
