mod config;
mod episodes;
mod policy;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Args, RunConfig};
use episodes::{EpisodeGenerator, Rollout};
use mfgym::DiscreteEnv;
use policy::RandomPolicy;
use std::fs::File;
use std::io::BufWriter;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    if args.list {
        for id in mfgym::envs::ids() {
            println!("{id}");
        }
        return Ok(());
    }

    let config = RunConfig::load(&args)?;
    let problem = mfgym::envs::problem(&config.env_id)
        .with_context(|| format!("failed to create {}", config.env_id))?;
    let mut env = DiscreteEnv::from_problem(problem.as_ref(), config.seed)
        .with_context(|| format!("failed to build the model of {}", config.env_id))?;
    let seed = env.current_seed();
    let actions: Vec<_> = (0..env.n_a()).filter_map(|a| problem.action_name(a)).collect();
    info!(
        env = env.name(),
        seed,
        n_s = env.n_s(),
        n_a = env.n_a(),
        n_f = env.n_f(),
        ?actions,
        "created environment"
    );

    let policy = RandomPolicy::new(env.n_a(), env.n_f(), config.fidelity, seed.wrapping_add(1))?;
    let episodes =
        Rollout::new(&mut env, policy, config.max_episode_steps).generate(config.episodes, None)?;

    let mut total = 0.;
    let mut finished = 0;
    for (i, ep) in episodes.iter().enumerate() {
        info!(
            episode = i,
            steps = ep.len(),
            reward = ep.total_reward(),
            terminated = ep.terminated,
            truncated = ep.truncated,
            "finished episode"
        );
        total += ep.total_reward();
        finished += ep.terminated as usize;
    }
    info!(
        episodes = episodes.len(),
        terminated = finished,
        mean_reward = total / episodes.len().max(1) as f64,
        "done"
    );

    if let Some(path) = &config.dump {
        let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &episodes)
            .with_context(|| format!("failed to write episodes to {}", path.display()))?;
        info!(path = %path.display(), "wrote episodes");
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Ignore error if already set (e.g., during tests).
    let _ = fmt().with_env_filter(env_filter).try_init();
}
