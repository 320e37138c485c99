use crate::{Discrete, Error, Result};
use serde::{Deserialize, Serialize};

/// Mixed-radix mapping between structured state components and scalar states.
///
/// Components are always ordered most-significant first: for radices
/// `[r0, r1, .., rk]` the scalar is `((c0 * r1 + c1) * r2 + c2) ...`. The first
/// radix only bounds the leading component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEncoder {
    radices: Vec<usize>,
    n_s: usize,
}

impl StateEncoder {
    pub fn new(radices: &[usize]) -> Result<Self> {
        if radices.is_empty() {
            return Err(Error::NoComponents);
        }

        let mut n_s: usize = 1;
        for (index, &r) in radices.iter().enumerate() {
            if r == 0 {
                return Err(Error::InvalidRadix { index });
            }
            n_s = n_s.checked_mul(r).ok_or(Error::StateSpaceOverflow)?;
        }

        Ok(Self {
            radices: radices.to_vec(),
            n_s,
        })
    }

    pub fn radices(&self) -> &[usize] {
        &self.radices
    }

    /// Number of distinct scalar states, i.e. the product of the radices.
    pub fn n_s(&self) -> Discrete {
        self.n_s
    }

    pub fn encode(&self, components: &[usize]) -> Result<Discrete> {
        if components.len() != self.radices.len() {
            return Err(Error::ArityMismatch {
                expected: self.radices.len(),
                actual: components.len(),
            });
        }

        let mut i = 0;
        for (index, (&value, &radix)) in components.iter().zip(&self.radices).enumerate() {
            if value >= radix {
                return Err(Error::ComponentOutOfRange {
                    index,
                    value,
                    radix,
                });
            }
            i = i * radix + value;
        }

        Ok(i)
    }

    pub fn decode(&self, state: Discrete) -> Result<Vec<usize>> {
        if state >= self.n_s {
            return Err(Error::StateOutOfRange {
                state,
                n_s: self.n_s,
            });
        }

        // Least-significant digit lives at the back.
        let mut out = vec![0; self.radices.len()];
        let mut i = state;
        for (slot, &radix) in out.iter_mut().zip(&self.radices).rev() {
            *slot = i % radix;
            i /= radix;
        }

        Ok(out)
    }
}
