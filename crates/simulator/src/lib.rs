//! Monte Carlo line simulator.
//!
//! Builds on `linesim-simulation` to estimate how long a batch of items
//! takes to clear a line: execute many independent runs, each with its own
//! RNG stream derived from a master seed, and tabulate the observed
//! durations into an empirical distribution.
//!
//! # Example
//!
//! ```ignore
//! use linesim_simulator::{Simulator, SimulatorConfig};
//! use linesim_types::{Item, Line, LineSpec};
//!
//! // Three segments, two items, the classic demo setup.
//! let line = Line::from_spec(&LineSpec::chain(3))?;
//! let items = [Item::from("a"), Item::from("b")];
//!
//! let config = SimulatorConfig::new(10_000).with_max_ticks(20).with_seed(42);
//! let estimate = Simulator::new(config).estimate(&line, &items)?;
//!
//! for (duration, probability) in estimate.distribution().iter() {
//!     println!("{duration:>4} ticks  {probability:.4}");
//! }
//! ```

pub mod config;
pub mod metrics;
pub mod runner;

pub use config::SimulatorConfig;
pub use metrics::{DurationDistribution, Estimate};
pub use runner::{Simulator, SimulatorError};
