use crate::policy::FidelityChoice;
use anyhow::{Context, Result};
use clap::Parser;
use mfgym::envs::GRID_WORLD_ID;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Roll out random episodes on multi-fidelity MDP environments")]
pub struct Args {
    /// JSON run configuration; flags below override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Environment id
    #[arg(long)]
    pub env: Option<String>,

    /// Seed for the environment and the policy
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of episodes to play
    #[arg(long)]
    pub episodes: Option<usize>,

    /// Truncate episodes after this many steps
    #[arg(long)]
    pub max_episode_steps: Option<usize>,

    /// Fidelity level per step: a level, 'highest' or 'random'
    #[arg(long)]
    pub fidelity: Option<FidelityChoice>,

    /// Write the played episodes as JSON to this file
    #[arg(long)]
    pub dump: Option<PathBuf>,

    /// List the bundled environment ids and exit
    #[arg(long)]
    pub list: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub env_id: String,
    pub seed: Option<u64>,
    pub episodes: usize,
    pub max_episode_steps: usize,
    pub fidelity: FidelityChoice,
    pub dump: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            env_id: GRID_WORLD_ID.to_string(),
            seed: None,
            episodes: 10,
            max_episode_steps: 150,
            fidelity: FidelityChoice::default(),
            dump: None,
        }
    }
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open config {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn load(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(args);

        Ok(config)
    }

    fn apply(&mut self, args: &Args) {
        if let Some(env) = &args.env {
            self.env_id = env.clone();
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if let Some(episodes) = args.episodes {
            self.episodes = episodes;
        }
        if let Some(steps) = args.max_episode_steps {
            self.max_episode_steps = steps;
        }
        if let Some(fidelity) = args.fidelity {
            self.fidelity = fidelity;
        }
        if args.dump.is_some() {
            self.dump = args.dump.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfgym::envs::TAXI_ID;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: RunConfig =
            serde_json::from_str(r#"{ "env_id": "MultiFidelityTaxi-v0", "fidelity": { "fixed": 1 } }"#)
                .unwrap();
        assert_eq!(config.env_id, TAXI_ID);
        assert_eq!(config.fidelity, FidelityChoice::Fixed(1));
        assert_eq!(config.max_episode_steps, 150);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "mfgym-rl",
            "--env",
            TAXI_ID,
            "--seed",
            "42",
            "--fidelity",
            "random",
            "--max-episode-steps",
            "200",
        ]);
        let config = RunConfig::load(&args).unwrap();
        assert_eq!(
            config,
            RunConfig {
                env_id: TAXI_ID.to_string(),
                seed: Some(42),
                max_episode_steps: 200,
                fidelity: FidelityChoice::Random,
                ..Default::default()
            }
        );
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = RunConfig::from_file(Path::new("/nonexistent/run.json")).unwrap_err();
        assert!(err.to_string().contains("failed to open config"));
    }
}
