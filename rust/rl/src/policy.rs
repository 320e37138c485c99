use mfgym::{Discrete, Error, Fidelity};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a policy picks the fidelity level of each step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FidelityChoice {
    Fixed(Fidelity),
    #[default]
    Highest,
    Random,
}

impl FromStr for FidelityChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "highest" => Ok(Self::Highest),
            "random" => Ok(Self::Random),
            n => n
                .parse::<Fidelity>()
                .map(Self::Fixed)
                .map_err(|_| format!("expected a level, 'highest' or 'random', got '{n}'")),
        }
    }
}

pub trait Policy {
    fn policy(&mut self, s: Discrete) -> (Discrete, Fidelity);
}

/// Uniformly random actions, drawn from a generator separate from the
/// environment's so the environment's stream stays replayable.
pub struct RandomPolicy {
    n_a: usize,
    n_f: usize,
    fidelity: FidelityChoice,
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(n_a: usize, n_f: usize, fidelity: FidelityChoice, seed: u64) -> Result<Self, Error> {
        if let FidelityChoice::Fixed(f) = fidelity {
            if f >= n_f {
                return Err(Error::FidelityOutOfRange { fidelity: f, n_f });
            }
        }

        Ok(Self {
            n_a,
            n_f,
            fidelity,
            rng: StdRng::seed_from_u64(seed),
        })
    }
}

impl Policy for RandomPolicy {
    fn policy(&mut self, _s: Discrete) -> (Discrete, Fidelity) {
        let a = self.rng.gen_range(0..self.n_a);
        let f = match self.fidelity {
            FidelityChoice::Fixed(f) => f,
            FidelityChoice::Highest => self.n_f - 1,
            FidelityChoice::Random => self.rng.gen_range(0..self.n_f),
        };

        (a, f)
    }
}
