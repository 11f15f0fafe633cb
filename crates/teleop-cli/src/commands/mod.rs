use clap::{Parser, Subcommand};
use std::path::PathBuf;

use teleop_config::ConfigLoader;

mod run;

/// teleop — episodic robot-control runtime driven by a remote action-chunk policy
#[derive(Parser)]
#[command(name = "teleop", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to teleop.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the inference service and run episodes
    Run {
        /// Inference service host
        #[arg(long)]
        host: Option<String>,

        /// Inference service port
        #[arg(long)]
        port: Option<u16>,

        /// Number of episodes to run
        #[arg(short = 'n', long)]
        num_episodes: Option<usize>,

        /// Per-episode step ceiling
        #[arg(long)]
        max_episode_steps: Option<usize>,

        /// Pacing ceiling in steps per second
        #[arg(long)]
        max_hz: Option<f64>,

        /// Actions consumed per chunk before re-querying
        #[arg(long)]
        action_horizon: Option<usize>,

        /// Base seed (episode e uses seed + e)
        #[arg(long)]
        seed: Option<u64>,

        /// Directory for recorded episodes
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Disable the episode recorder
        #[arg(long)]
        no_record: bool,
    },
    /// Show the effective configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show version and build info
    Version,
}

impl Cli {
    pub async fn run(self) -> teleop_core::Result<()> {
        let config_loader = ConfigLoader::load(self.config.as_deref())?;
        let config = config_loader.get();

        // Resolve log level: --verbose/--quiet > --log-level > config
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level.as_deref().unwrap_or(&config.logging.level)
        };

        // Initialize tracing with the configured format
        if config.logging.format == "json" {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
                )
                .json()
                .with_target(true)
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
                )
                .with_target(false)
                .init();
        }

        match self.command {
            Commands::Run {
                host,
                port,
                num_episodes,
                max_episode_steps,
                max_hz,
                action_horizon,
                seed,
                out_dir,
                no_record,
            } => {
                let overrides = run::RunOverrides {
                    host,
                    port,
                    num_episodes,
                    max_episode_steps,
                    max_hz,
                    action_horizon,
                    seed,
                    out_dir,
                    no_record,
                };
                run::cmd_run(config, overrides).await
            }
            Commands::Config { json } => Self::cmd_config(config, json),
            Commands::Version => Self::cmd_version(),
        }
    }

    fn cmd_config(config: teleop_config::TeleopConfig, json: bool) -> teleop_core::Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| teleop_core::TeleopError::Config(e.to_string()))?;
            println!("{rendered}");
        }
        Ok(())
    }

    fn cmd_version() -> teleop_core::Result<()> {
        println!("teleop {}", env!("CARGO_PKG_VERSION"));
        Ok(())
    }
}
