use crate::policy::Policy;
use mfgym::{Continous, DiscreteEnv, EpisodeEvent, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub events: Vec<EpisodeEvent>,
    pub terminated: bool,
    pub truncated: bool,
}

impl Episode {
    /// Number of steps taken.
    pub fn len(&self) -> usize {
        self.events.len() - 1
    }

    pub fn total_reward(&self) -> Continous {
        self.events.iter().map(|e| e.r).sum()
    }
}

pub trait EpisodeGenerator {
    fn generate(&mut self, n: usize, seed: Option<u64>) -> Result<Vec<Episode>>;
}

/// Plays a policy against an environment. Episodes that have not terminated
/// after `max_episode_steps` steps are truncated.
pub struct Rollout<'a, P: Policy> {
    env: &'a mut DiscreteEnv,
    policy: P,
    max_episode_steps: usize,
}

impl<'a, P: Policy> Rollout<'a, P> {
    pub fn new(env: &'a mut DiscreteEnv, policy: P, max_episode_steps: usize) -> Self {
        Self {
            env,
            policy,
            max_episode_steps,
        }
    }

    fn episode(&mut self) -> Result<Episode> {
        let mut s = self.env.reset();
        let mut events = vec![EpisodeEvent {
            s: Some(s),
            a: None,
            f: None,
            r: 0.,
        }];

        for _ in 0..self.max_episode_steps {
            let (a, f) = self.policy.policy(s);
            let si = self.env.step(a, f)?;
            events.push(EpisodeEvent {
                s: si.observation,
                a: Some(a),
                f: Some(f),
                r: si.reward,
            });

            match si.observation {
                Some(next) if !si.terminated => s = next,
                _ => {
                    return Ok(Episode {
                        events,
                        terminated: true,
                        truncated: false,
                    })
                }
            }
        }

        Ok(Episode {
            events,
            terminated: false,
            truncated: true,
        })
    }
}

impl<P: Policy> EpisodeGenerator for Rollout<'_, P> {
    fn generate(&mut self, n: usize, seed: Option<u64>) -> Result<Vec<Episode>> {
        if seed.is_some() {
            self.env.seed(seed);
        }

        (0..n).map(|_| self.episode()).collect()
    }
}
