//! Stochastic per-segment service times.

use rand::Rng;
use rand_distr::{Distribution, Poisson};

/// Default mean of the service time distribution, in ticks.
pub const DEFAULT_SERVICE_MEAN: f64 = 2.0;

/// Errors raised while setting up a simulation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    /// The service-time mean must be a finite, positive number of ticks.
    #[error("service-time mean must be finite and positive, got {0}")]
    InvalidServiceMean(f64),
}

/// Sampler for per-segment service times.
///
/// Service times are Poisson-distributed tick counts, drawn independently
/// every time an item newly occupies a segment.
#[derive(Debug, Clone, Copy)]
pub struct ServiceTimes {
    dist: Poisson<f64>,
}

impl ServiceTimes {
    /// Create a sampler with the given mean, in ticks.
    pub fn new(mean: f64) -> Result<Self, SimulationError> {
        if !mean.is_finite() || mean <= 0.0 {
            return Err(SimulationError::InvalidServiceMean(mean));
        }
        let dist = Poisson::new(mean).map_err(|_| SimulationError::InvalidServiceMean(mean))?;
        Ok(ServiceTimes { dist })
    }

    /// Draw one service time from the given RNG.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        self.dist.sample(rng) as u64
    }
}

impl Default for ServiceTimes {
    fn default() -> Self {
        ServiceTimes::new(DEFAULT_SERVICE_MEAN).expect("default mean is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rejects_bad_means() {
        assert!(ServiceTimes::new(0.0).is_err());
        assert!(ServiceTimes::new(-1.0).is_err());
        assert!(ServiceTimes::new(f64::NAN).is_err());
        assert!(ServiceTimes::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_draws_track_the_mean() {
        let service = ServiceTimes::new(2.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let n = 10_000;
        let total: u64 = (0..n).map(|_| service.draw(&mut rng)).sum();
        let mean = total as f64 / n as f64;

        assert!((1.5..2.5).contains(&mean), "sample mean {mean} far from 2.0");
    }

    #[test]
    fn test_same_seed_same_draws() {
        let service = ServiceTimes::default();
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);

        let draws_a: Vec<u64> = (0..100).map(|_| service.draw(&mut a)).collect();
        let draws_b: Vec<u64> = (0..100).map(|_| service.draw(&mut b)).collect();
        assert_eq!(draws_a, draws_b);
    }
}
