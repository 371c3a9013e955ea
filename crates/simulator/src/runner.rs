//! Monte Carlo estimation over independent line runs.

use crate::config::SimulatorConfig;
use crate::metrics::Estimate;
use linesim_simulation::{run_once, ServiceTimes, SimulationError};
use linesim_types::{Item, Line};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while configuring or running an estimation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulatorError {
    /// An estimation needs at least one run.
    #[error("iteration count must be positive")]
    ZeroIterations,

    /// The underlying simulation rejected its setup.
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Monte Carlo estimator for batch completion times.
///
/// Executes many independent runs of the same batch and tabulates the
/// sampled durations into an empirical distribution. Runs execute in
/// parallel; each derives its own RNG stream from the master seed, so a
/// fixed seed produces the identical estimate regardless of scheduling.
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a simulator with the given configuration.
    pub fn new(config: SimulatorConfig) -> Self {
        Simulator { config }
    }

    /// Estimate the completion-time distribution of `input` on `line`.
    pub fn estimate(&self, line: &Line, input: &[Item]) -> Result<Estimate, SimulatorError> {
        if self.config.iterations == 0 {
            return Err(SimulatorError::ZeroIterations);
        }
        let service = ServiceTimes::new(self.config.service_mean)?;

        debug!(
            iterations = self.config.iterations,
            max_ticks = self.config.max_ticks,
            seed = self.config.seed,
            segments = line.num_segments(),
            items = input.len(),
            "starting estimation"
        );

        let outcomes: Vec<_> = (0..self.config.iterations)
            .into_par_iter()
            .map(|iteration| {
                let mut rng =
                    ChaCha8Rng::seed_from_u64(derive_seed(self.config.seed, iteration));
                run_once(line, input.to_vec(), self.config.max_ticks, &service, &mut rng)
            })
            .collect();

        let estimate = Estimate::from_outcomes(&outcomes);
        info!(
            iterations = self.config.iterations,
            truncated = estimate.truncated_runs(),
            "estimation complete"
        );
        Ok(estimate)
    }
}

/// Mix the master seed with the iteration index so every run draws from
/// its own independent RNG stream.
fn derive_seed(master: u64, iteration: usize) -> u64 {
    master
        .wrapping_add(iteration as u64)
        .wrapping_mul(0x517cc1b727220a95)
}

#[cfg(test)]
mod tests {
    use super::*;
    use linesim_types::LineSpec;

    fn make_line(len: u32) -> Line {
        Line::from_spec(&LineSpec::chain(len)).unwrap()
    }

    fn make_items(labels: &[&str]) -> Vec<Item> {
        labels.iter().copied().map(Item::from).collect()
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let simulator = Simulator::new(SimulatorConfig::new(0));
        let result = simulator.estimate(&make_line(3), &make_items(&["a"]));
        assert_eq!(result.unwrap_err(), SimulatorError::ZeroIterations);
    }

    #[test]
    fn test_invalid_service_mean_rejected() {
        let simulator = Simulator::new(SimulatorConfig::new(10).with_service_mean(0.0));
        let result = simulator.estimate(&make_line(3), &make_items(&["a"]));
        assert!(matches!(
            result.unwrap_err(),
            SimulatorError::Simulation(SimulationError::InvalidServiceMean(_))
        ));
    }

    #[test]
    fn test_same_seed_reproduces_the_estimate() {
        let line = make_line(3);
        let items = make_items(&["a", "b"]);
        let config = SimulatorConfig::new(500).with_max_ticks(20).with_seed(7);

        let first = Simulator::new(config.clone()).estimate(&line, &items).unwrap();
        let second = Simulator::new(config).estimate(&line, &items).unwrap();
        assert_eq!(first.distribution(), second.distribution());
    }

    #[test]
    fn test_fully_truncated_batch_lands_on_the_budget() {
        let line = make_line(3);
        let items = make_items(&["a", "b"]);
        let config = SimulatorConfig::new(50).with_max_ticks(1);

        let estimate = Simulator::new(config).estimate(&line, &items).unwrap();
        // Two items can never clear three segments in one tick.
        assert_eq!(estimate.truncated_runs(), 50);
        assert!((estimate.distribution().probability(1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_item_runs_all_finish() {
        let line = make_line(3);
        let config = SimulatorConfig::new(200).with_seed(3);

        let estimate = Simulator::new(config)
            .estimate(&line, &make_items(&["solo"]))
            .unwrap();
        assert_eq!(estimate.truncated_runs(), 0);
        assert!(estimate.distribution().min().unwrap() >= 1);
    }

    #[test]
    fn test_demo_line_distribution_shape() {
        // The classic demo: three segments, two items, budget 20.
        let line = make_line(3);
        let items = make_items(&["a", "b"]);
        let config = SimulatorConfig::new(10_000).with_max_ticks(20).with_seed(12345);

        let estimate = Simulator::new(config).estimate(&line, &items).unwrap();
        let dist = estimate.distribution();

        let sum: f64 = dist.iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-9);

        // No run can finish in fewer ticks than there are items.
        assert!(dist.min().unwrap() >= items.len() as u64);

        // The mass concentrates in roughly 3..18 with the mode near 9.
        let central: f64 = (3..=18).map(|d| dist.probability(d)).sum();
        assert!(central > 0.9, "central mass was {central}");
        let mode = dist.mode().unwrap();
        assert!((4..=16).contains(&mode), "mode was {mode}");
    }
}
