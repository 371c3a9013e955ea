//! Configuration types for the simulator.

use linesim_simulation::DEFAULT_SERVICE_MEAN;

/// Configuration for a Monte Carlo estimation.
#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    /// Number of independent simulation runs.
    pub iterations: usize,

    /// Tick budget for each run. A run still unfinished at the budget is
    /// truncated, not errored.
    pub max_ticks: u64,

    /// Mean of the per-segment service time distribution, in ticks.
    pub service_mean: f64,

    /// Master seed; per-run RNG streams derive from it.
    pub seed: u64,
}

impl SimulatorConfig {
    /// Create a configuration with the given number of runs.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            max_ticks: 10_000,
            service_mean: DEFAULT_SERVICE_MEAN,
            seed: 12345,
        }
    }

    /// Set the per-run tick budget.
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Set the mean service time, in ticks.
    pub fn with_service_mean(mut self, mean: f64) -> Self {
        self.service_mean = mean;
        self
    }

    /// Set the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::new(10_000)
    }
}
