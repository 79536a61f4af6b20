// Random source abstraction for synthetic data generation
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Source of uniformly distributed values.
///
/// Every generator takes one of these so tests can swap in a fixed sequence.
pub trait RandomSource: Send {
    /// Uniform integer in `[low, high]`, both ends inclusive.
    fn int_in(&mut self, low: i64, high: i64) -> i64;

    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform float in `[low, high)`.
    fn float_in(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.unit()
    }

    /// Uniform index into a collection of `len` items. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize {
        self.int_in(0, len as i64 - 1) as usize
    }

    /// Normally distributed sample.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64;
}

/// OS-seeded random source used outside tests.
pub struct ThreadRandom {
    rng: StdRng,
}

impl ThreadRandom {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn int_in(&mut self, low: i64, high: i64) -> i64 {
        self.rng.gen_range(low..=high)
    }

    fn unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        match Normal::new(mean, std_dev) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(e) => {
                tracing::warn!("Invalid normal distribution ({}, {}): {}", mean, std_dev, e);
                mean
            }
        }
    }
}
