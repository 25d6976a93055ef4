//! Driver mistakes are the only stochastic part of a lap. They are drawn through the
//! `MistakeSource` trait so that tests and sweeps can inject a seeded or a mistake-free source.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Bernoulli, Distribution, Uniform};

pub trait MistakeSource {
    /// Returns the fraction of the sector time lost if a mistake happens with the given
    /// probability, or None if the sector is clean. `loss_range` is inclusive and ordered.
    fn draw(&mut self, probability: f64, loss_range: (f64, f64)) -> Option<f64>;
}

/// A driver that never makes mistakes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMistakes;

impl MistakeSource for NoMistakes {
    fn draw(&mut self, _probability: f64, _loss_range: (f64, f64)) -> Option<f64> {
        None
    }
}

/// Mistakes drawn from any random number generator.
#[derive(Debug, Clone)]
pub struct RandomMistakes<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomMistakes<R> {
    pub fn new(rng: R) -> RandomMistakes<R> {
        RandomMistakes { rng }
    }
}

impl RandomMistakes<ChaCha8Rng> {
    /// Identical seeds produce identical mistake sequences on every platform.
    pub fn seeded(seed: u64) -> RandomMistakes<ChaCha8Rng> {
        RandomMistakes::new(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> RandomMistakes<ChaCha8Rng> {
        RandomMistakes::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> MistakeSource for RandomMistakes<R> {
    fn draw(&mut self, probability: f64, loss_range: (f64, f64)) -> Option<f64> {
        let mistake = Bernoulli::new(probability.clamp(0.0, 1.0))
            .map(|b| b.sample(&mut self.rng))
            .unwrap_or(false);

        if mistake {
            let (lo, hi) = loss_range;
            Some(Uniform::new_inclusive(lo, hi.max(lo)).sample(&mut self.rng))
        } else {
            None
        }
    }
}
