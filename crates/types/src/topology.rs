//! Line specification and validated topology.
//!
//! A [`LineSpec`] is the start-up description of a line: one record per
//! segment naming its downstream successor, plus the entry segment. A
//! [`Line`] is the validated result: the segment ids laid out in conveying
//! order. Validation happens exactly once, at construction; a malformed
//! specification can never reach the simulation.

use crate::SegmentId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One record of a line specification: a segment and its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Identifier, unique within the line.
    pub id: SegmentId,

    /// The segment immediately downstream, or `None` for the ejecting end.
    pub next: Option<SegmentId>,
}

/// A line topology description, as consumed at start-up.
///
/// The records must form a single simple acyclic path that starts at
/// `entry`, covers every declared segment, and ends at the one segment
/// with no successor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpec {
    /// All segments of the line.
    pub segments: Vec<SegmentRecord>,

    /// The segment items are offered to.
    pub entry: SegmentId,
}

impl LineSpec {
    /// A straight chain of `len` segments with ids `0..len`, entry at 0.
    pub fn chain(len: u32) -> Self {
        let segments = (0..len)
            .map(|i| SegmentRecord {
                id: SegmentId(i),
                next: (i + 1 < len).then(|| SegmentId(i + 1)),
            })
            .collect();
        LineSpec {
            segments,
            entry: SegmentId(0),
        }
    }
}

/// Errors detected while validating a line specification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// The specification declares no segments at all.
    #[error("line specification declares no segments")]
    Empty,

    /// The same id appears on more than one record.
    #[error("{0} is declared more than once")]
    DuplicateSegment(SegmentId),

    /// A record names a successor that is not declared.
    #[error("{from} names unknown successor {to}")]
    UnknownSuccessor { from: SegmentId, to: SegmentId },

    /// The entry id is not declared.
    #[error("entry {0} is not declared")]
    UnknownEntry(SegmentId),

    /// Every record names a successor, so the line has no ejecting end.
    #[error("no segment is marked as the ejecting end")]
    NoTerminal,

    /// More than one record has no successor.
    #[error("{0} and {1} are both marked as the ejecting end")]
    MultipleTerminals(SegmentId, SegmentId),

    /// The successor chain loops back on itself.
    #[error("successor chain revisits {0}")]
    Cycle(SegmentId),

    /// A declared segment is not on the path walked from the entry.
    #[error("{0} is not reachable from the entry")]
    Unreachable(SegmentId),
}

/// A validated line topology.
///
/// Holds the segment ids in conveying order: entry first, ejecting end
/// last. The order is fixed for the lifetime of the value; simulations
/// share it read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    order: Vec<SegmentId>,
}

impl Line {
    /// Validate a specification and lay the segments out in conveying order.
    pub fn from_spec(spec: &LineSpec) -> Result<Self, TopologyError> {
        if spec.segments.is_empty() {
            return Err(TopologyError::Empty);
        }

        let mut successors: HashMap<SegmentId, Option<SegmentId>> = HashMap::new();
        for record in &spec.segments {
            if successors.insert(record.id, record.next).is_some() {
                return Err(TopologyError::DuplicateSegment(record.id));
            }
        }

        for record in &spec.segments {
            if let Some(next) = record.next {
                if !successors.contains_key(&next) {
                    return Err(TopologyError::UnknownSuccessor {
                        from: record.id,
                        to: next,
                    });
                }
            }
        }

        let mut terminals = spec.segments.iter().filter(|r| r.next.is_none());
        let terminal = terminals.next().ok_or(TopologyError::NoTerminal)?;
        if let Some(extra) = terminals.next() {
            return Err(TopologyError::MultipleTerminals(terminal.id, extra.id));
        }

        if !successors.contains_key(&spec.entry) {
            return Err(TopologyError::UnknownEntry(spec.entry));
        }

        // Walk the successor chain from the entry. On a well-formed line the
        // walk visits every declared segment exactly once and stops at the
        // terminal; anything else is a malformed topology.
        let mut order = Vec::with_capacity(spec.segments.len());
        let mut visited: HashSet<SegmentId> = HashSet::new();
        let mut cursor = Some(spec.entry);
        while let Some(id) = cursor {
            if !visited.insert(id) {
                return Err(TopologyError::Cycle(id));
            }
            order.push(id);
            cursor = successors[&id];
        }

        if order.len() != spec.segments.len() {
            let missed = spec
                .segments
                .iter()
                .map(|r| r.id)
                .find(|id| !visited.contains(id))
                .expect("walk shorter than spec leaves some segment unvisited");
            return Err(TopologyError::Unreachable(missed));
        }

        Ok(Line { order })
    }

    /// The segment items are offered to.
    pub fn entry(&self) -> SegmentId {
        self.order[0]
    }

    /// The ejecting end of the line.
    pub fn terminal(&self) -> SegmentId {
        self.order[self.order.len() - 1]
    }

    /// Number of segments in the line.
    pub fn num_segments(&self) -> usize {
        self.order.len()
    }

    /// Segment ids in conveying order.
    pub fn segments(&self) -> &[SegmentId] {
        &self.order
    }
}
