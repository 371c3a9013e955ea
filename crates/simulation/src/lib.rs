//! Deterministic simulation of one batch flowing through a line.
//!
//! Given the same line, input, and RNG seed, a run produces the identical
//! duration every time. All randomness comes in through an explicit RNG
//! handle; there is no hidden global state, so callers are free to execute
//! many runs concurrently with independent seeds.
//!
//! # Architecture
//!
//! ```text
//!                   ┌───────────────────────────────────────────┐
//!                   │                  LineRun                  │
//!                   │                                           │
//! pending input ──▶ │  [ s0 ] ─▶ [ s1 ] ─▶ ... ─▶ [ ejector ]  │ ──▶ collected output
//!                   │                                           │
//!                   │  one step() per tick, resolved tail to    │
//!                   │  head so downstream room is known before  │
//!                   │  anything advances                        │
//!                   └───────────────────────────────────────────┘
//! ```

mod chain;
mod runner;
mod service;

pub use runner::{run_once, LineRun, RunOutcome};
pub use service::{ServiceTimes, SimulationError, DEFAULT_SERVICE_MEAN};
