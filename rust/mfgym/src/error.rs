use crate::{transitions::TransitionKey, Continous, Discrete, Fidelity};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by the simulation engine and the problem generators.
///
/// Stepping errors never leave a partially mutated session behind. Model errors
/// are raised while an environment is being constructed and abort construction.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Fidelity level {fidelity} not supported, environment has {n_f} levels")]
    FidelityOutOfRange { fidelity: Fidelity, n_f: usize },

    #[error("Action {action} not in action space of size {n_a}")]
    ActionOutOfRange { action: Discrete, n_a: usize },

    #[error("State {state} not in observation space of size {n_s}")]
    StateOutOfRange { state: Discrete, n_s: usize },

    #[error("Environment must be reset before stepping")]
    NotReset,

    #[error("Episode has terminated, reset before stepping again")]
    EpisodeTerminated,

    #[error("Component {index} is {value}, must be below radix {radix}")]
    ComponentOutOfRange {
        index: usize,
        value: usize,
        radix: usize,
    },

    #[error("Expected {expected} state components, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("Radix {index} must be positive")]
    InvalidRadix { index: usize },

    #[error("State space needs at least one component")]
    NoComponents,

    #[error("State space size overflows usize")]
    StateSpaceOverflow,

    #[error("Transition model needs at least one fidelity level, state and action")]
    EmptyModel,

    #[error("Transition model with {n_f} fidelity levels, {n_s} states and {n_a} actions is too large")]
    ModelSizeOverflow { n_f: usize, n_s: usize, n_a: usize },

    #[error("No outcomes for {key}")]
    EmptyOutcomes { key: TransitionKey },

    #[error("Outcome probabilities for {key} sum to {sum}")]
    ProbabilitySum { key: TransitionKey, sum: Continous },

    #[error("Outcome probability {probability} for {key} is not in [0, 1]")]
    InvalidProbability {
        key: TransitionKey,
        probability: Continous,
    },

    #[error("Terminal outcome for {key} leads to state {next_state}")]
    TerminalWithNextState {
        key: TransitionKey,
        next_state: Discrete,
    },

    #[error("Non-terminal outcome for {key} has no next state")]
    MissingNextState { key: TransitionKey },

    #[error("Outcome for {key} leads to state {next_state} outside [0, {n_s})")]
    NextStateOutOfRange {
        key: TransitionKey,
        next_state: Discrete,
        n_s: usize,
    },

    #[error("Reward for {key} is malformed: {reason}")]
    InvalidReward { key: TransitionKey, reason: String },

    #[error("Initial state distribution has {actual} entries, expected {expected}")]
    InitialDistributionSize { expected: usize, actual: usize },

    #[error("Initial state distribution has no legitimate start state")]
    EmptyInitialDistribution,

    #[error("Initial state weight {weight} for state {state} is not a finite non-negative number")]
    InvalidInitialWeight { state: Discrete, weight: Continous },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unrecognized environment id: {0}")]
    UnknownEnvironment(String),
}
