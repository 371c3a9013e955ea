//! Core types for the linesim production-line simulator.
//!
//! A line is an ordered, acyclic chain of unit-capacity segments. Items are
//! placed at the entry segment and ejected at the terminal segment. This
//! crate holds the vocabulary shared by every other crate: identifiers,
//! items, the line specification consumed at start-up, and the validated
//! [`Line`] topology built from it.

mod identifiers;
mod item;
mod topology;

pub use identifiers::SegmentId;
pub use item::Item;
pub use topology::{Line, LineSpec, SegmentRecord, TopologyError};
