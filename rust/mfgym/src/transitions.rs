use crate::sampler::{RandomSource, Weighted};
use crate::{Continous, Discrete, Error, Fidelity, Result};
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome probabilities of one entry must sum to 1 within this tolerance.
pub const PROBABILITY_TOLERANCE: Continous = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionKey {
    pub fidelity: Fidelity,
    pub state: Discrete,
    pub action: Discrete,
}

impl fmt::Display for TransitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(fidelity {}, state {}, action {})",
            self.fidelity, self.state, self.action
        )
    }
}

/// How the reward of an outcome is produced. Stochastic rewards are drawn from
/// the engine's own random source each time the outcome is realized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reward {
    Constant(Continous),
    UniformRange { low: Continous, high: Continous },
}

impl Reward {
    pub fn uniform(low: Continous, high: Continous) -> Self {
        Self::UniformRange { low, high }
    }

    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Continous {
        match *self {
            Reward::Constant(r) => r,
            Reward::UniformRange { low, high } => low + (high - low) * rng.draw(),
        }
    }

    pub fn is_stochastic(&self) -> bool {
        matches!(self, Reward::UniformRange { .. })
    }

    fn check(&self) -> std::result::Result<(), String> {
        match *self {
            Reward::Constant(r) if !r.is_finite() => Err(format!("constant {r} is not finite")),
            Reward::UniformRange { low, high } if !(low.is_finite() && high.is_finite()) => {
                Err(format!("range [{low}, {high}] is not finite"))
            }
            Reward::UniformRange { low, high } if low > high => {
                Err(format!("range [{low}, {high}] is empty"))
            }
            _ => Ok(()),
        }
    }
}

/// One weighted result of taking an action. Terminal outcomes carry no next
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub probability: Continous,
    pub next_state: Option<Discrete>,
    pub reward: Reward,
    pub done: bool,
}

impl Outcome {
    /// Certain move to `next_state`.
    pub fn to(next_state: Discrete, reward: Reward) -> Self {
        Self {
            probability: 1.,
            next_state: Some(next_state),
            reward,
            done: false,
        }
    }

    /// Certain episode end.
    pub fn terminal(reward: Reward) -> Self {
        Self {
            probability: 1.,
            next_state: None,
            reward,
            done: true,
        }
    }

    pub fn with_probability(self, probability: Continous) -> Self {
        Self {
            probability,
            ..self
        }
    }
}

impl Weighted for Outcome {
    fn p(&self) -> Continous {
        self.probability
    }
}

/// Which fidelity levels switch a check or a noise zone on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FidelityGate {
    Always,
    Never,
    AtLeast(Fidelity),
}

impl FidelityGate {
    pub fn is_active(&self, fidelity: Fidelity) -> bool {
        match *self {
            FidelityGate::Always => true,
            FidelityGate::Never => false,
            FidelityGate::AtLeast(f) => fidelity >= f,
        }
    }
}

/// Outcome lists for every `(fidelity, state, action)`, stored flat.
///
/// `offsets[k]..offsets[k + 1]` delimits the outcomes of the k-th key in
/// fidelity-major, then state, then action order. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionModel {
    n_f: usize,
    n_s: usize,
    n_a: usize,
    offsets: Vec<usize>,
    outcomes: Vec<Outcome>,
}

impl TransitionModel {
    /// Build the model by asking `generate` for the outcomes of every key.
    /// Each list is validated as it is produced; the first violation aborts the
    /// build.
    pub fn build<F>(n_f: usize, n_s: usize, n_a: usize, mut generate: F) -> Result<Self>
    where
        F: FnMut(TransitionKey) -> Result<Vec<Outcome>>,
    {
        if n_f == 0 || n_s == 0 || n_a == 0 {
            return Err(Error::EmptyModel);
        }

        let too_large = Error::ModelSizeOverflow { n_f, n_s, n_a };
        let n_keys = n_f
            .checked_mul(n_s)
            .and_then(|n| n.checked_mul(n_a))
            .filter(|&n| n < usize::MAX)
            .ok_or_else(|| too_large.clone())?;

        let mut offsets: Vec<usize> = Vec::new();
        let mut outcomes: Vec<Outcome> = Vec::new();
        offsets
            .try_reserve_exact(n_keys + 1)
            .and_then(|_| outcomes.try_reserve(n_keys))
            .map_err(|_| too_large)?;
        offsets.push(0);

        for (fidelity, state, action) in iproduct!(0..n_f, 0..n_s, 0..n_a) {
            let key = TransitionKey {
                fidelity,
                state,
                action,
            };
            let ts = generate(key)?;
            validate(key, &ts, n_s)?;
            outcomes.extend(ts);
            offsets.push(outcomes.len());
        }

        tracing::debug!(
            n_f,
            n_s,
            n_a,
            n_outcomes = outcomes.len(),
            n_stochastic = outcomes.iter().filter(|t| t.reward.is_stochastic()).count(),
            "built transition model"
        );

        Ok(Self {
            n_f,
            n_s,
            n_a,
            offsets,
            outcomes,
        })
    }

    pub fn n_f(&self) -> usize {
        self.n_f
    }

    pub fn n_s(&self) -> usize {
        self.n_s
    }

    pub fn n_a(&self) -> usize {
        self.n_a
    }

    /// Total number of outcomes across all keys.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcomes(&self, fidelity: Fidelity, state: Discrete, action: Discrete) -> Result<&[Outcome]> {
        if fidelity >= self.n_f {
            return Err(Error::FidelityOutOfRange {
                fidelity,
                n_f: self.n_f,
            });
        }
        if state >= self.n_s {
            return Err(Error::StateOutOfRange {
                state,
                n_s: self.n_s,
            });
        }
        if action >= self.n_a {
            return Err(Error::ActionOutOfRange {
                action,
                n_a: self.n_a,
            });
        }

        let k = (fidelity * self.n_s + state) * self.n_a + action;
        Ok(&self.outcomes[self.offsets[k]..self.offsets[k + 1]])
    }

    pub fn iter(&self) -> impl Iterator<Item = (TransitionKey, &[Outcome])> + '_ {
        iproduct!(0..self.n_f, 0..self.n_s, 0..self.n_a)
            .zip(self.offsets.windows(2))
            .map(move |((fidelity, state, action), w)| {
                (
                    TransitionKey {
                        fidelity,
                        state,
                        action,
                    },
                    &self.outcomes[w[0]..w[1]],
                )
            })
    }
}

fn validate(key: TransitionKey, ts: &[Outcome], n_s: usize) -> Result<()> {
    if ts.is_empty() {
        return Err(Error::EmptyOutcomes { key });
    }

    let mut sum = 0.;
    for t in ts {
        if !(0. ..=1.).contains(&t.probability) {
            return Err(Error::InvalidProbability {
                key,
                probability: t.probability,
            });
        }
        sum += t.probability;

        match (t.done, t.next_state) {
            (true, Some(next_state)) => {
                return Err(Error::TerminalWithNextState { key, next_state })
            }
            (false, None) => return Err(Error::MissingNextState { key }),
            (false, Some(next_state)) if next_state >= n_s => {
                return Err(Error::NextStateOutOfRange {
                    key,
                    next_state,
                    n_s,
                })
            }
            _ => {}
        }

        t.reward
            .check()
            .map_err(|reason| Error::InvalidReward { key, reason })?;
    }

    if (sum - 1.).abs() > PROBABILITY_TOLERANCE {
        return Err(Error::ProbabilitySum { key, sum });
    }

    Ok(())
}

/// Probability of starting an episode in each state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitialStateDistribution {
    probs: Vec<Continous>,
}

impl InitialStateDistribution {
    /// Normalize per-state counts of legitimate start configurations.
    pub fn from_counts(counts: &[Continous]) -> Result<Self> {
        for (state, &weight) in counts.iter().enumerate() {
            if !weight.is_finite() || weight < 0. {
                return Err(Error::InvalidInitialWeight { state, weight });
            }
        }

        let total: Continous = counts.iter().sum();
        if total <= 0. {
            return Err(Error::EmptyInitialDistribution);
        }

        Ok(Self {
            probs: counts.iter().map(|c| c / total).collect(),
        })
    }

    /// Uniform over the states accepted by `is_start`.
    pub fn from_predicate<F>(n_s: usize, mut is_start: F) -> Result<Self>
    where
        F: FnMut(Discrete) -> Result<bool>,
    {
        let mut counts = vec![0.; n_s];
        for (s, c) in counts.iter_mut().enumerate() {
            if is_start(s)? {
                *c += 1.;
            }
        }

        Self::from_counts(&counts)
    }

    pub fn probabilities(&self) -> &[Continous] {
        &self.probs
    }

    pub fn probability(&self, state: Discrete) -> Continous {
        self.probs.get(state).copied().unwrap_or(0.)
    }

    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// States with strictly positive start probability.
    pub fn support(&self) -> impl Iterator<Item = Discrete> + '_ {
        self.probs
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p > 0.)
            .map(|(s, _)| s)
    }
}
