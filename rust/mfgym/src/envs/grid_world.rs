use super::{Problem, GRID_WORLD_ID};
use crate::transitions::{Outcome, Reward, TransitionKey};
use crate::{Continous, Discrete, Error, Result, StateEncoder};
use serde::{Deserialize, Serialize};

pub const SOUTH: Discrete = 0;
pub const NORTH: Discrete = 1;
pub const EAST: Discrete = 2;
pub const WEST: Discrete = 3;

const ACTION_NAMES: [&str; 4] = ["South", "North", "East", "West"];

/// One map per fidelity level. 'X' marks a slippery cell.
pub const MAPS: [[&str; 18]; 3] = [
    [
        "                  ",
        "                  ",
        "                  ",
        "                  ",
        "               XX ",
        "               XX ",
        "               XX ",
        "      XX          ",
        "      XX          ",
        "      XX          ",
        "                  ",
        "   XX             ",
        "   XX             ",
        "   XX             ",
        "   XX             ",
        "                  ",
        "                  ",
        "G                 ",
    ],
    [
        "                  ",
        "                  ",
        "                  ",
        "                  ",
        "               XX ",
        "               XX ",
        "     XXXX   XXXXX ",
        "     XXXX   XXXX  ",
        "     XXXX   XXXX  ",
        "      XX          ",
        "                  ",
        "   XX             ",
        "   XXXXXX         ",
        "   XXXXXX         ",
        "   XXXXXX         ",
        "                  ",
        "                  ",
        "G                 ",
    ],
    [
        "                  ",
        "                  ",
        "                  ",
        "                  ",
        "               XX ",
        "       XX     XXX ",
        "     XXXX   XXXXX ",
        "     XXXX   XXXX  ",
        "     XXXX   XXXXX ",
        "      XX          ",
        "           XX     ",
        "   XX   XX XX     ",
        "   XXXXXXX XX     ",
        "   XXXXXXX        ",
        "   XXXXXX         ",
        "                  ",
        "                  ",
        "G                 ",
    ],
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridWorldConfig {
    /// One square map per fidelity level.
    pub maps: Vec<Vec<String>>,
    pub goal: (usize, usize),
    pub step_reward: Continous,
    pub wall_reward: Continous,
    pub goal_reward: Continous,
    pub noise_low: Continous,
    pub noise_high: Continous,
}

impl Default for GridWorldConfig {
    fn default() -> Self {
        Self {
            maps: MAPS
                .iter()
                .map(|m| m.iter().map(|row| row.to_string()).collect::<Vec<_>>())
                .collect(),
            goal: (17, 0),
            step_reward: -1.,
            wall_reward: -10.,
            goal_reward: 120.,
            noise_low: -12.,
            noise_high: 10.,
        }
    }
}

/// The grid world problem.
///
/// An agent moves on a square grid towards a fixed goal with four deterministic
/// actions. Leaving an ordinary cell costs `step_reward`; leaving a slippery
/// cell of the current fidelity's map yields a reward drawn uniformly from
/// `[noise_low, noise_high]`. Bumping into the border keeps the state and costs
/// `wall_reward`. Any action taken on the goal ends the episode with
/// `goal_reward`. Episodes start anywhere on the grid.
#[derive(Debug, Clone)]
pub struct GridWorld {
    config: GridWorldConfig,
    slippery: Vec<Vec<Vec<bool>>>,
    size: usize,
    encoder: StateEncoder,
}

impl GridWorld {
    pub fn new() -> Result<Self> {
        Self::with_config(GridWorldConfig::default())
    }

    pub fn with_config(config: GridWorldConfig) -> Result<Self> {
        let size = config
            .maps
            .first()
            .map(|m| m.len())
            .ok_or_else(|| Error::InvalidConfig("grid world needs at least one map".into()))?;

        for (f, map) in config.maps.iter().enumerate() {
            if map.len() != size || map.iter().any(|row| row.chars().count() != size) {
                return Err(Error::InvalidConfig(format!(
                    "map for fidelity {f} is not {size}x{size}"
                )));
            }
        }
        if config.goal.0 >= size || config.goal.1 >= size {
            return Err(Error::InvalidConfig(format!(
                "goal {:?} outside the {size}x{size} grid",
                config.goal
            )));
        }

        let slippery: Vec<Vec<Vec<bool>>> = config
            .maps
            .iter()
            .map(|m| {
                m.iter()
                    .map(|row| row.chars().map(|c| c == 'X').collect::<Vec<_>>())
                    .collect::<Vec<_>>()
            })
            .collect();
        let encoder = StateEncoder::new(&[size, size])?;

        Ok(Self {
            config,
            slippery,
            size,
            encoder,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn encode(&self, row: usize, col: usize) -> Result<Discrete> {
        self.encoder.encode(&[row, col])
    }

    pub fn decode(&self, s: Discrete) -> Result<(usize, usize)> {
        let c = self.encoder.decode(s)?;
        Ok((c[0], c[1]))
    }

    pub fn is_slippery(&self, fidelity: usize, row: usize, col: usize) -> bool {
        self.slippery[fidelity][row][col]
    }
}

impl Problem for GridWorld {
    fn name(&self) -> &str {
        GRID_WORLD_ID
    }

    fn n_f(&self) -> usize {
        self.config.maps.len()
    }

    fn n_a(&self) -> usize {
        ACTION_NAMES.len()
    }

    fn encoder(&self) -> &StateEncoder {
        &self.encoder
    }

    fn outcomes(&self, key: TransitionKey) -> Result<Vec<Outcome>> {
        let c = &self.config;
        let (row, col) = self.decode(key.state)?;

        if (row, col) == c.goal {
            return Ok(vec![Outcome::terminal(Reward::Constant(c.goal_reward))]);
        }

        let max = self.size - 1;
        let (new_row, new_col) = match key.action {
            SOUTH => ((row + 1).min(max), col),
            NORTH => (row.saturating_sub(1), col),
            EAST => (row, (col + 1).min(max)),
            WEST => (row, col.saturating_sub(1)),
            action => {
                return Err(Error::ActionOutOfRange {
                    action,
                    n_a: self.n_a(),
                })
            }
        };

        let next = self.encode(new_row, new_col)?;
        let reward = if next == key.state {
            Reward::Constant(c.wall_reward)
        } else if self.is_slippery(key.fidelity, row, col) {
            Reward::uniform(c.noise_low, c.noise_high)
        } else {
            Reward::Constant(c.step_reward)
        };

        Ok(vec![Outcome::to(next, reward)])
    }

    fn is_start(&self, _state: Discrete) -> Result<bool> {
        Ok(true)
    }

    fn action_name(&self, action: Discrete) -> Option<&'static str> {
        ACTION_NAMES.get(action).copied()
    }
}
