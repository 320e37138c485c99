use super::{Problem, TAXI_ID};
use crate::transitions::{FidelityGate, Outcome, Reward, TransitionKey};
use crate::{Continous, Discrete, Error, Result, StateEncoder};
use serde::{Deserialize, Serialize};

pub const SOUTH: Discrete = 0;
pub const NORTH: Discrete = 1;
pub const EAST: Discrete = 2;
pub const WEST: Discrete = 3;
pub const PICKUP: Discrete = 4;
pub const DROPOFF: Discrete = 5;

const ACTION_NAMES: [&str; 6] = ["South", "North", "East", "West", "Pickup", "Dropoff"];

/// Cells sit at odd columns, the characters between them are either ':' (open)
/// or '|' (wall). 'X' is always noisy, 'x' only where the soft noise gate is on.
pub const MAP: [&str; 7] = [
    "+---------+",
    "|R: | : :G|",
    "| : : :x: |",
    "| :X: : : |",
    "| | : | : |",
    "|Y| : |B: |",
    "+---------+",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxiConfig {
    pub map: Vec<String>,
    /// Landmarks where passengers wait and get delivered (R, G, Y, B).
    pub locs: Vec<(usize, usize)>,
    /// Number of fidelity levels.
    pub n_f: usize,
    pub step_reward: Continous,
    pub delivery_reward: Continous,
    pub illegal_reward: Continous,
    pub noise_low: Continous,
    pub noise_high: Continous,
    /// Levels at which '|' blocks east/west moves.
    pub wall_gate: FidelityGate,
    /// Levels at which 'x' cells are noisy.
    pub soft_noise_gate: FidelityGate,
    /// Levels at which a pickup without a passenger is penalized.
    pub pickup_penalty_gate: FidelityGate,
    /// Levels at which a dropoff away from a landmark or without passenger is penalized.
    pub dropoff_penalty_gate: FidelityGate,
}

impl Default for TaxiConfig {
    fn default() -> Self {
        Self {
            map: MAP.iter().map(|row| row.to_string()).collect(),
            locs: vec![(0, 0), (0, 4), (4, 0), (4, 3)],
            n_f: 3,
            step_reward: -1.,
            delivery_reward: 20.,
            illegal_reward: -10.,
            noise_low: -2.,
            noise_high: 0.,
            wall_gate: FidelityGate::AtLeast(1),
            soft_noise_gate: FidelityGate::AtLeast(1),
            pickup_penalty_gate: FidelityGate::AtLeast(2),
            dropoff_penalty_gate: FidelityGate::Always,
        }
    }
}

/// The taxi problem.
/// Refer: "Hierarchical Reinforcement Learning with the MAXQ Value Function Decomposition", T. Dietterich.
///
/// A taxi picks up a passenger waiting at one landmark and drops them off at
/// the destination landmark, which ends the episode. States are encoded as
/// `(taxi_row, taxi_col, passenger, destination)` where `passenger ==
/// locs.len()` means the passenger rides in the taxi.
///
/// Cheaper fidelities relax the simulator: the lowest level ignores interior
/// walls and 'x' cells, and only the highest penalizes an illegal pickup.
#[derive(Debug, Clone)]
pub struct Taxi {
    config: TaxiConfig,
    desc: Vec<Vec<u8>>,
    rows: usize,
    cols: usize,
    encoder: StateEncoder,
}

impl Taxi {
    pub fn new() -> Result<Self> {
        Self::with_config(TaxiConfig::default())
    }

    pub fn with_config(config: TaxiConfig) -> Result<Self> {
        let desc = config
            .map
            .iter()
            .map(|row| row.as_bytes().to_vec())
            .collect::<Vec<_>>();

        let width = desc.first().map_or(0, |row| row.len());
        if desc.len() < 3 || width < 3 || width % 2 == 0 || desc.iter().any(|r| r.len() != width) {
            return Err(Error::InvalidConfig(
                "taxi map must be a bordered rectangle with an odd width".into(),
            ));
        }
        let rows = desc.len() - 2;
        let cols = (width - 1) / 2;

        if config.locs.is_empty() {
            return Err(Error::InvalidConfig("taxi needs at least one landmark".into()));
        }
        for (i, &(r, c)) in config.locs.iter().enumerate() {
            if r >= rows || c >= cols {
                return Err(Error::InvalidConfig(format!(
                    "landmark {i} at ({r}, {c}) outside the {rows}x{cols} grid"
                )));
            }
            if config.locs[..i].contains(&(r, c)) {
                return Err(Error::InvalidConfig(format!(
                    "landmark {i} at ({r}, {c}) is duplicated"
                )));
            }
        }
        if config.n_f == 0 {
            return Err(Error::InvalidConfig("taxi needs at least one fidelity level".into()));
        }

        let n_locs = config.locs.len();
        let encoder = StateEncoder::new(&[rows, cols, n_locs + 1, n_locs])?;

        Ok(Self {
            config,
            desc,
            rows,
            cols,
            encoder,
        })
    }

    /// Passenger index meaning "riding in the taxi".
    pub fn in_taxi(&self) -> usize {
        self.config.locs.len()
    }

    pub fn encode(&self, row: usize, col: usize, pass: usize, dest: usize) -> Result<Discrete> {
        self.encoder.encode(&[row, col, pass, dest])
    }

    pub fn decode(&self, s: Discrete) -> Result<(usize, usize, usize, usize)> {
        let c = self.encoder.decode(s)?;
        Ok((c[0], c[1], c[2], c[3]))
    }

    fn cell(&self, row: usize, col: usize) -> u8 {
        self.desc[1 + row][2 * col + 1]
    }

    fn is_open(&self, row: usize, col: usize, action: Discrete) -> bool {
        let x = if action == EAST { 2 * col + 2 } else { 2 * col };
        self.desc[1 + row][x] == b':'
    }
}

impl Problem for Taxi {
    fn name(&self) -> &str {
        TAXI_ID
    }

    fn n_f(&self) -> usize {
        self.config.n_f
    }

    fn n_a(&self) -> usize {
        ACTION_NAMES.len()
    }

    fn encoder(&self) -> &StateEncoder {
        &self.encoder
    }

    fn outcomes(&self, key: TransitionKey) -> Result<Vec<Outcome>> {
        let c = &self.config;
        let f = key.fidelity;
        let (row, col, pass, dest) = self.decode(key.state)?;
        let taxi_loc = (row, col);
        let (mut new_row, mut new_col, mut new_pass) = (row, col, pass);

        let mut reward = match self.cell(row, col) {
            b'X' => Reward::uniform(c.noise_low, c.noise_high),
            b'x' if c.soft_noise_gate.is_active(f) => Reward::uniform(c.noise_low, c.noise_high),
            _ => Reward::Constant(c.step_reward),
        };

        match key.action {
            SOUTH => new_row = (row + 1).min(self.rows - 1),
            NORTH => new_row = row.saturating_sub(1),
            EAST | WEST if c.wall_gate.is_active(f) && !self.is_open(row, col, key.action) => {}
            EAST => new_col = (col + 1).min(self.cols - 1),
            WEST => new_col = col.saturating_sub(1),
            PICKUP => {
                if pass < self.in_taxi() && taxi_loc == c.locs[pass] {
                    new_pass = self.in_taxi();
                } else if c.pickup_penalty_gate.is_active(f) {
                    reward = Reward::Constant(c.illegal_reward);
                }
            }
            DROPOFF => {
                let landmark = c.locs.iter().position(|&l| l == taxi_loc);
                match landmark {
                    Some(i) if pass == self.in_taxi() && i == dest => {
                        return Ok(vec![Outcome::terminal(Reward::Constant(c.delivery_reward))]);
                    }
                    Some(i) if pass == self.in_taxi() => new_pass = i,
                    _ if c.dropoff_penalty_gate.is_active(f) => {
                        reward = Reward::Constant(c.illegal_reward)
                    }
                    _ => {}
                }
            }
            action => {
                return Err(Error::ActionOutOfRange {
                    action,
                    n_a: self.n_a(),
                })
            }
        }

        let next = self.encode(new_row, new_col, new_pass, dest)?;
        Ok(vec![Outcome::to(next, reward)])
    }

    fn is_start(&self, state: Discrete) -> Result<bool> {
        let (_, _, pass, dest) = self.decode(state)?;
        Ok(pass < self.in_taxi() && pass != dest)
    }

    fn action_name(&self, action: Discrete) -> Option<&'static str> {
        ACTION_NAMES.get(action).copied()
    }
}
