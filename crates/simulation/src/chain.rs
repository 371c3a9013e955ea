//! Per-tick occupancy state of a segment chain.
//!
//! The chain is a pre-allocated array of unit-capacity slots, one per
//! segment in conveying order. A tick is one [`ChainState::step`] call. The
//! step resolves slots tail to head: a slot learns whether the chain ahead
//! of it has room before deciding its own fate, so a tick can shift a whole
//! train of ready items forward at once. The last slot is the ejecting end
//! and holds no state; anything reaching it leaves the line in the same
//! tick.

use crate::service::ServiceTimes;
use linesim_types::{Item, Line, SegmentId};
use rand::Rng;
use tracing::trace;

/// An item resident in a slot, with its countdown to eligibility.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Occupant {
    item: Item,

    /// Ticks of service left before the item may advance.
    remaining_service: u64,
}

/// One unit-capacity slot of the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    id: SegmentId,
    occupant: Option<Occupant>,
}

/// What one tick did at the boundaries of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StepOutcome {
    /// Whether the offered candidate entered the line this tick.
    pub accepted: bool,

    /// The item that left the ejecting end this tick, if any.
    pub ejected: Option<Item>,
}

/// Mutable occupancy state for a whole line, one slot per segment.
#[derive(Debug, Clone)]
pub(crate) struct ChainState {
    slots: Vec<Slot>,
}

impl ChainState {
    /// An empty chain matching the line's conveying order.
    pub(crate) fn new(line: &Line) -> Self {
        let slots = line
            .segments()
            .iter()
            .map(|&id| Slot { id, occupant: None })
            .collect();
        ChainState { slots }
    }

    /// Advance the whole chain by one tick, offering `candidate` to the
    /// entry slot. The candidate is taken out of the option only if the
    /// entry accepts it.
    ///
    /// Resolution order is tail to head. For each slot:
    ///
    /// - an occupant whose service is done moves into the next slot exactly
    ///   when that slot was resolved as accepting, and the freed slot takes
    ///   whatever was offered to it (with a fresh service draw);
    /// - an occupant still being serviced counts down by one and blocks the
    ///   slot, while slots further ahead keep progressing;
    /// - an empty slot takes whatever was offered to it.
    pub(crate) fn step<R: Rng + ?Sized>(
        &mut self,
        candidate: &mut Option<Item>,
        service: &ServiceTimes,
        rng: &mut R,
    ) -> StepOutcome {
        let last = self.slots.len() - 1;

        // Pre-tick snapshot of occupancy and readiness. Advance decisions
        // read this snapshot, never the slots mutated further down the
        // chain within the same tick.
        let occupied: Vec<bool> = self.slots.iter().map(|s| s.occupant.is_some()).collect();
        let ready: Vec<bool> = self
            .slots
            .iter()
            .map(|s| matches!(&s.occupant, Some(o) if o.remaining_service == 0))
            .collect();

        let mut ejected = None;
        // Acceptance of the slot resolved in the previous iteration, i.e.
        // the slot immediately downstream of the current one.
        let mut accepted = false;

        for i in (0..=last).rev() {
            // Whether something is being offered to slot i this tick: the
            // caller's candidate at the entry, or a ready upstream occupant.
            let offered = if i == 0 {
                candidate.is_some()
            } else {
                ready[i - 1]
            };

            if i == last {
                // The ejecting end: whatever reaches it leaves immediately.
                accepted = offered;
                if offered {
                    ejected = Some(self.pull(i, candidate));
                }
                continue;
            }

            if occupied[i] {
                if ready[i] {
                    if accepted {
                        // The occupant was handed downstream when the next
                        // slot resolved; the freed slot takes its own offer.
                        if offered {
                            let item = self.pull(i, candidate);
                            self.place(i, item, service, rng);
                        }
                        accepted = offered;
                    } else {
                        // Downstream is blocked; the occupant stays put.
                        accepted = false;
                    }
                } else {
                    let occupant = self.slots[i]
                        .occupant
                        .as_mut()
                        .expect("slot occupied per snapshot");
                    occupant.remaining_service -= 1;
                    accepted = false;
                }
            } else if offered {
                let item = self.pull(i, candidate);
                self.place(i, item, service, rng);
                accepted = true;
            } else {
                accepted = false;
            }
        }

        StepOutcome { accepted, ejected }
    }

    /// Number of items currently resident in the chain.
    pub(crate) fn occupancy(&self) -> usize {
        self.slots.iter().filter(|s| s.occupant.is_some()).count()
    }

    /// Take the item that was offered to slot `i`: the caller's candidate
    /// for the entry slot, the upstream occupant otherwise. Only called
    /// once the offer is known to be accepted.
    fn pull(&mut self, i: usize, candidate: &mut Option<Item>) -> Item {
        if i == 0 {
            candidate.take().expect("entry was offered the candidate")
        } else {
            self.slots[i - 1]
                .occupant
                .take()
                .expect("upstream occupant was ready")
                .item
        }
    }

    fn place<R: Rng + ?Sized>(
        &mut self,
        i: usize,
        item: Item,
        service: &ServiceTimes,
        rng: &mut R,
    ) {
        let remaining_service = service.draw(rng);
        trace!(segment = %self.slots[i].id, item = %item, remaining_service, "placed item");
        self.slots[i].occupant = Some(Occupant {
            item,
            remaining_service,
        });
    }
}
