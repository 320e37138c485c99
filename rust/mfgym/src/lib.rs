extern crate rand;
extern crate serde;

pub mod encoder;
pub mod env;
pub mod envs;
pub mod error;
pub mod sampler;
pub mod transitions;

pub use encoder::StateEncoder;
pub use env::{DiscreteEnv, Phase, Session, StepDetails, StepInfo};
pub use envs::{make, Problem};
pub use error::{Error, Result};
pub use sampler::{categorical_sample, RandomSource, StdRandomSource, Weighted};
pub use transitions::{
    FidelityGate, InitialStateDistribution, Outcome, Reward, TransitionKey, TransitionModel,
};

use serde::{Deserialize, Serialize};

pub type Discrete = usize;
pub type Continous = f64;
pub type Fidelity = usize;

/// Cardinality of a discrete observation or action space.
/// Refer: https://www.gymlibrary.dev/api/spaces/#discrete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteSpace {
    pub n: Discrete,
}

impl DiscreteSpace {
    pub fn contains(&self, x: Discrete) -> bool {
        x < self.n
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeEvent {
    pub s: Option<Discrete>,
    pub a: Option<Discrete>,
    pub f: Option<Fidelity>,
    pub r: Continous,
}
