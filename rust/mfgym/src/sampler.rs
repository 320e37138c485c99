use crate::Continous;
use rand::prelude::*;

/// Seedable source of uniform draws in `[0, 1)`.
///
/// Each environment owns its own source. Reseeding with an explicit value makes
/// every subsequent draw reproducible.
pub trait RandomSource {
    /// Reseed the source. `None` picks a fresh seed, which is returned so the
    /// run can be replayed later.
    fn seed(&mut self, seed: Option<u64>) -> u64;

    fn draw(&mut self) -> Continous;
}

#[derive(Debug, Clone)]
pub struct StdRandomSource {
    rng: StdRng,
    seed: u64,
}

impl StdRandomSource {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(fresh_seed);
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn current_seed(&self) -> u64 {
        self.seed
    }
}

impl Default for StdRandomSource {
    fn default() -> Self {
        Self::new(None)
    }
}

impl RandomSource for StdRandomSource {
    fn seed(&mut self, seed: Option<u64>) -> u64 {
        let seed = seed.unwrap_or_else(fresh_seed);
        self.rng = StdRng::seed_from_u64(seed);
        self.seed = seed;
        seed
    }

    fn draw(&mut self) -> Continous {
        self.rng.gen::<Continous>()
    }
}

fn fresh_seed() -> u64 {
    StdRng::from_entropy().next_u64()
}

pub trait Weighted {
    fn p(&self) -> Continous;
}

impl Weighted for Continous {
    fn p(&self) -> Continous {
        *self
    }
}

/// Index of the first item whose cumulative weight exceeds one uniform draw.
///
/// Weights need not be normalized exactly. When rounding leaves the total at or
/// below the draw, the last item with positive weight is picked.
///
/// Panics on an empty slice.
pub fn categorical_sample<T, R>(ts: &[T], rng: &mut R) -> usize
where
    T: Weighted,
    R: RandomSource + ?Sized,
{
    categorical_index(ts, rng.draw())
}

pub fn categorical_index<T: Weighted>(ts: &[T], u: Continous) -> usize {
    assert!(!ts.is_empty(), "Cannot sample from an empty distribution");

    let mut cumulative = 0.;
    for (i, t) in ts.iter().enumerate() {
        cumulative += t.p();
        if cumulative > u {
            return i;
        }
    }

    ts.iter().rposition(|t| t.p() > 0.).unwrap_or(ts.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;
    use rstest::rstest;

    /// Replays a fixed list of draws, cycling when exhausted.
    struct Scripted {
        draws: Vec<Continous>,
        at: usize,
    }

    impl RandomSource for Scripted {
        fn seed(&mut self, _seed: Option<u64>) -> u64 {
            self.at = 0;
            0
        }

        fn draw(&mut self) -> Continous {
            let d = self.draws[self.at % self.draws.len()];
            self.at += 1;
            d
        }
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(0.19, 0)]
    #[case(0.2, 1)]
    #[case(0.75, 2)]
    #[case(0.999, 3)]
    fn picks_first_cumulative_above_draw(#[case] u: Continous, #[case] expected: usize) {
        let weights = [0.2, 0.3, 0.3, 0.2];
        assert_eq!(categorical_index(&weights, u), expected);
    }

    #[test]
    fn singleton_always_returns_zero() {
        for u in [0., 0.5, 0.999_999] {
            assert_eq!(categorical_index(&[1.0], u), 0);
        }
        assert_eq!(categorical_index(&[0.3], 0.9), 0);
    }

    #[test]
    fn short_cumulative_sum_still_yields_valid_index() {
        // Sums to 0.9999999 after rounding.
        let weights = [0.3333333, 0.3333333, 0.3333333];
        assert_eq!(categorical_index(&weights, 0.99999995), 2);
        assert_eq!(categorical_index(&[0.5, 0.4999, 0.], 0.99995), 1);
    }

    #[test]
    fn unnormalized_weights_are_accepted() {
        let mut rng = StdRandomSource::new(Some(7));
        for _ in 0..1000 {
            let i = categorical_sample(&[2., 0., 5.], &mut rng);
            assert!(i == 0 || i == 2);
        }
    }

    #[test]
    fn scripted_source_drives_sampling() {
        let mut rng = Scripted {
            draws: vec![0.1, 0.6, 0.95],
            at: 0,
        };
        let picks = (0..3)
            .map(|_| categorical_sample(&[0.5, 0.4, 0.1], &mut rng))
            .collect::<Vec<_>>();
        assert_eq!(picks, vec![0, 1, 2]);
    }

    #[test]
    fn frequencies_follow_weights() {
        let mut rng = StdRandomSource::new(Some(2718));
        let n = 20000;
        let mut counts = [0usize; 2];
        for _ in 0..n {
            counts[categorical_sample(&[0.2, 0.8], &mut rng)] += 1;
        }

        assert_float_eq!(counts[0] as f64 / n as f64, 0.2, abs <= 1e-2);
        assert_float_eq!(counts[1] as f64 / n as f64, 0.8, abs <= 1e-2);
    }

    #[test]
    fn reseeding_replays_draws() {
        let mut rng = StdRandomSource::default();
        let seed = rng.seed(Some(42));
        assert_eq!(seed, 42);
        let first = (0..5).map(|_| rng.draw()).collect::<Vec<_>>();

        rng.seed(Some(42));
        let second = (0..5).map(|_| rng.draw()).collect::<Vec<_>>();
        assert_eq!(first, second);
        assert!(first.iter().all(|d| (0. ..1.).contains(d)));
    }

    #[test]
    fn implicit_seed_is_reported_and_reproducible() {
        let mut rng = StdRandomSource::default();
        let seed = rng.seed(None);
        assert_eq!(rng.current_seed(), seed);
        let first = (0..5).map(|_| rng.draw()).collect::<Vec<_>>();

        let mut replay = StdRandomSource::new(Some(seed));
        let second = (0..5).map(|_| replay.draw()).collect::<Vec<_>>();
        assert_eq!(first, second);
    }
}
