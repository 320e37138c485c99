pub mod grid_world;
pub mod taxi;

pub use grid_world::{GridWorld, GridWorldConfig};
pub use taxi::{Taxi, TaxiConfig};

use crate::env::DiscreteEnv;
use crate::transitions::{Outcome, TransitionKey};
use crate::{Discrete, Error, Result, StateEncoder};

/// A concrete benchmark problem: everything needed to generate a transition
/// model and an initial state distribution.
///
/// `outcomes` is asked once per `(fidelity, state, action)` and must return a
/// list whose probabilities sum to 1. Terminal outcomes carry no next state.
pub trait Problem {
    fn name(&self) -> &str;

    /// Number of fidelity levels.
    fn n_f(&self) -> usize;

    fn n_a(&self) -> usize;

    fn encoder(&self) -> &StateEncoder;

    fn outcomes(&self, key: TransitionKey) -> Result<Vec<Outcome>>;

    /// Whether `state` is a legitimate start configuration.
    fn is_start(&self, state: Discrete) -> Result<bool>;

    fn action_name(&self, action: Discrete) -> Option<&'static str>;
}

pub const GRID_WORLD_ID: &str = "MultiFidelityGridWorld-v0";
pub const TAXI_ID: &str = "MultiFidelityTaxi-v0";

pub fn ids() -> [&'static str; 2] {
    [GRID_WORLD_ID, TAXI_ID]
}

/// One of the bundled problems with its default configuration.
pub fn problem(id: &str) -> Result<Box<dyn Problem>> {
    match id {
        GRID_WORLD_ID => Ok(Box::new(GridWorld::new()?)),
        TAXI_ID => Ok(Box::new(Taxi::new()?)),
        _ => Err(Error::UnknownEnvironment(id.to_string())),
    }
}

/// Create one of the bundled environments with its default configuration.
pub fn make(id: &str, seed: Option<u64>) -> Result<DiscreteEnv> {
    DiscreteEnv::from_problem(problem(id)?.as_ref(), seed)
}
