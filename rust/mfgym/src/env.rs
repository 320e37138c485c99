use crate::envs::Problem;
use crate::sampler::{categorical_sample, RandomSource, StdRandomSource};
use crate::transitions::{InitialStateDistribution, TransitionModel};
use crate::{Continous, Discrete, DiscreteSpace, Error, Fidelity, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Uninitialized,
    Ready,
    Terminal,
}

/// Mutable part of an environment, readable by renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub current_state: Option<Discrete>,
    pub last_action: Option<Discrete>,
    pub last_fidelity: Option<Fidelity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepDetails {
    pub prob: Continous,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub observation: Option<Discrete>,
    pub reward: Continous,
    pub terminated: bool,
    pub info: StepDetails,
}

/// Discrete multi-fidelity MDP simulator.
///
/// Holds an immutable transition model and initial state distribution, and
/// realizes them stochastically with its own random source: `reset` samples a
/// start state, `step` samples one outcome of `(fidelity, state, action)` and
/// resolves its reward.
#[derive(Debug, Clone)]
pub struct DiscreteEnv<R: RandomSource = StdRandomSource> {
    name: String,
    model: TransitionModel,
    isd: InitialStateDistribution,
    rng: R,
    seed: u64,
    phase: Phase,
    session: Session,
}

impl DiscreteEnv<StdRandomSource> {
    pub fn new(
        name: &str,
        model: TransitionModel,
        isd: InitialStateDistribution,
        seed: Option<u64>,
    ) -> Result<Self> {
        Self::with_random_source(name, model, isd, StdRandomSource::default(), seed)
    }

    /// Generate the model and start distribution of `problem` and wrap them.
    pub fn from_problem<P: Problem + ?Sized>(problem: &P, seed: Option<u64>) -> Result<Self> {
        let n_s = problem.encoder().n_s();
        let model =
            TransitionModel::build(problem.n_f(), n_s, problem.n_a(), |key| problem.outcomes(key))?;
        let isd = InitialStateDistribution::from_predicate(n_s, |s| problem.is_start(s))?;

        Self::new(problem.name(), model, isd, seed)
    }
}

impl<R: RandomSource> DiscreteEnv<R> {
    pub fn with_random_source(
        name: &str,
        model: TransitionModel,
        isd: InitialStateDistribution,
        mut rng: R,
        seed: Option<u64>,
    ) -> Result<Self> {
        if isd.len() != model.n_s() {
            return Err(Error::InitialDistributionSize {
                expected: model.n_s(),
                actual: isd.len(),
            });
        }

        let seed = rng.seed(seed);
        tracing::debug!(
            name,
            n_s = model.n_s(),
            n_a = model.n_a(),
            n_f = model.n_f(),
            seed,
            "created environment"
        );

        Ok(Self {
            name: name.to_string(),
            model,
            isd,
            rng,
            seed,
            phase: Phase::Uninitialized,
            session: Session::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn n_s(&self) -> usize {
        self.model.n_s()
    }

    pub fn n_a(&self) -> usize {
        self.model.n_a()
    }

    /// Number of fidelity levels.
    pub fn n_f(&self) -> usize {
        self.model.n_f()
    }

    pub fn observation_space(&self) -> DiscreteSpace {
        DiscreteSpace { n: self.n_s() }
    }

    pub fn action_space(&self) -> DiscreteSpace {
        DiscreteSpace { n: self.n_a() }
    }

    pub fn model(&self) -> &TransitionModel {
        &self.model
    }

    pub fn initial_state_distribution(&self) -> &InitialStateDistribution {
        &self.isd
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_seed(&self) -> u64 {
        self.seed
    }

    /// Reseed the owned random source; returns the seed actually used.
    pub fn seed(&mut self, seed: Option<u64>) -> u64 {
        self.seed = self.rng.seed(seed);
        tracing::debug!(name = %self.name, seed = self.seed, "reseeded");
        self.seed
    }

    pub fn reset(&mut self) -> Discrete {
        let s = categorical_sample(self.isd.probabilities(), &mut self.rng);
        self.session = Session {
            current_state: Some(s),
            last_action: None,
            last_fidelity: None,
        };
        self.phase = Phase::Ready;
        tracing::trace!(state = s, "reset");

        s
    }

    pub fn step(&mut self, action: Discrete, fidelity: Fidelity) -> Result<StepInfo> {
        if fidelity >= self.n_f() {
            return Err(Error::FidelityOutOfRange {
                fidelity,
                n_f: self.n_f(),
            });
        }
        if !self.action_space().contains(action) {
            return Err(Error::ActionOutOfRange {
                action,
                n_a: self.n_a(),
            });
        }
        let state = match (self.phase, self.session.current_state) {
            (Phase::Ready, Some(s)) => s,
            (Phase::Terminal, _) => return Err(Error::EpisodeTerminated),
            _ => return Err(Error::NotReset),
        };

        let ts = self.model.outcomes(fidelity, state, action)?;
        let t = ts[categorical_sample(ts, &mut self.rng)];
        let reward = t.reward.sample(&mut self.rng);

        self.session = Session {
            current_state: t.next_state,
            last_action: Some(action),
            last_fidelity: Some(fidelity),
        };
        if t.done {
            self.phase = Phase::Terminal;
        }
        tracing::trace!(
            state,
            action,
            fidelity,
            next_state = ?t.next_state,
            reward,
            done = t.done,
            "step"
        );

        Ok(StepInfo {
            observation: t.next_state,
            reward,
            terminated: t.done,
            info: StepDetails {
                prob: t.probability,
            },
        })
    }
}
