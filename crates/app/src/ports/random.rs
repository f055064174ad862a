//! Random source port: the injected randomness behind pest infestations.

use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_uniform(&self) -> f64;
}

impl<T: RandomSource + ?Sized> RandomSource for Arc<T> {
    fn next_uniform(&self) -> f64 {
        (**self).next_uniform()
    }
}

/// [`StdRng`] behind a mutex so it can be shared by a service.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// Deterministic sequence for a given seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_uniform(&self) -> f64 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .r#gen::<f64>()
    }
}
