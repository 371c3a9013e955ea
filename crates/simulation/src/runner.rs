//! Bounded-horizon driver for a single batch.

use crate::chain::ChainState;
use crate::service::ServiceTimes;
use linesim_types::{Item, Line};
use rand::Rng;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Result of driving one batch through a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Ticks elapsed until the batch was fully ejected, or the tick budget
    /// if it was not.
    pub duration: u64,

    /// Whether the ejected sequence reproduced the input before the budget
    /// ran out. A false value is a truncation, not an error; rerun with a
    /// larger budget for a guaranteed-complete sample.
    pub finished: bool,
}

/// One simulation of a batch of items flowing through a line.
///
/// Created fresh per run from a shared, read-only [`Line`]; nothing
/// survives into the next run.
pub struct LineRun {
    chain: ChainState,
    pending_input: VecDeque<Item>,
    original_input: Vec<Item>,
    collected_output: Vec<Item>,
    elapsed_ticks: u64,
    finished: bool,
}

impl LineRun {
    /// Set up a run of `input` through `line`. The chain starts empty.
    pub fn new(line: &Line, input: Vec<Item>) -> Self {
        let finished = input.is_empty();
        LineRun {
            chain: ChainState::new(line),
            pending_input: input.iter().cloned().collect(),
            original_input: input,
            collected_output: Vec::new(),
            elapsed_ticks: 0,
            finished,
        }
    }

    /// Advance the whole line by one tick.
    ///
    /// Offers the front of the pending input to the entry segment, collects
    /// any ejected item, and freezes the clock once the output reproduces
    /// the input.
    pub fn tick<R: Rng + ?Sized>(&mut self, service: &ServiceTimes, rng: &mut R) {
        let mut candidate = self.pending_input.pop_front();
        let outcome = self.chain.step(&mut candidate, service, rng);
        if let Some(item) = candidate {
            // The line had no room; the item stays at the head of the queue.
            self.pending_input.push_front(item);
        }

        if let Some(item) = outcome.ejected {
            let position = self.collected_output.len();
            assert_eq!(
                Some(&item),
                self.original_input.get(position),
                "item {item} ejected out of order at output position {position}",
            );
            self.collected_output.push(item);
        }

        self.finished = self.collected_output == self.original_input;
        if !self.finished {
            self.elapsed_ticks += 1;
        }

        trace!(
            tick = self.elapsed_ticks,
            accepted = outcome.accepted,
            resident = self.chain.occupancy(),
            pending = self.pending_input.len(),
            collected = self.collected_output.len(),
            "stepped line"
        );
    }

    /// Drive the run for at most `max_ticks` ticks and return the sampled
    /// duration.
    ///
    /// Once the batch is fully ejected the remaining budget is not spent.
    /// If the budget runs out first, the duration equals the budget and
    /// [`RunOutcome::finished`] stays false.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        max_ticks: u64,
        service: &ServiceTimes,
        rng: &mut R,
    ) -> RunOutcome {
        for _ in 0..max_ticks {
            if self.finished {
                break;
            }
            self.tick(service, rng);
        }

        if self.finished {
            debug!(duration = self.elapsed_ticks, "batch fully ejected");
        } else {
            debug!(
                budget = max_ticks,
                collected = self.collected_output.len(),
                pending = self.pending_input.len(),
                "budget exhausted before the batch drained"
            );
        }

        RunOutcome {
            duration: self.elapsed_ticks,
            finished: self.finished,
        }
    }

    /// Ticks elapsed so far. Stops advancing once the run is finished.
    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Whether the output already reproduces the input.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Items ejected so far, in ejection order.
    pub fn collected_output(&self) -> &[Item] {
        &self.collected_output
    }

    /// Items not yet admitted to the line.
    pub fn pending_input(&self) -> &VecDeque<Item> {
        &self.pending_input
    }
}

/// Run a fresh simulation of `input` through `line` and return its outcome.
pub fn run_once<R: Rng + ?Sized>(
    line: &Line,
    input: Vec<Item>,
    max_ticks: u64,
    service: &ServiceTimes,
    rng: &mut R,
) -> RunOutcome {
    LineRun::new(line, input).run(max_ticks, service, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use linesim_types::LineSpec;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn make_line(len: u32) -> Line {
        Line::from_spec(&LineSpec::chain(len)).unwrap()
    }

    fn make_items(labels: &[&str]) -> Vec<Item> {
        labels.iter().copied().map(Item::from).collect()
    }

    #[test]
    fn test_empty_input_is_finished_from_the_start() {
        let line = make_line(3);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let outcome = run_once(&line, vec![], 100, &ServiceTimes::default(), &mut rng);
        assert_eq!(outcome, RunOutcome { duration: 0, finished: true });
    }

    #[test]
    fn test_zero_budget_truncates_nonempty_input() {
        let line = make_line(3);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let outcome = run_once(
            &line,
            make_items(&["a", "b"]),
            0,
            &ServiceTimes::default(),
            &mut rng,
        );
        assert_eq!(outcome, RunOutcome { duration: 0, finished: false });
    }

    #[test]
    fn test_exhausted_budget_returns_the_budget() {
        let line = make_line(3);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let outcome = run_once(
            &line,
            make_items(&["a", "b"]),
            2,
            &ServiceTimes::default(),
            &mut rng,
        );
        // Two items cannot clear a three-segment line in two ticks.
        assert_eq!(outcome, RunOutcome { duration: 2, finished: false });
    }

    #[test]
    fn test_batch_drains_in_input_order() {
        let line = make_line(3);
        let service = ServiceTimes::default();
        let input = make_items(&["a", "b", "c"]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let mut run = LineRun::new(&line, input.clone());
        let outcome = run.run(100_000, &service, &mut rng);

        assert!(outcome.finished);
        assert_eq!(run.collected_output(), input.as_slice());
        assert!(run.pending_input().is_empty());
        assert!(outcome.duration >= input.len() as u64);
    }

    #[test]
    fn test_single_item_finishes_with_small_duration_floor() {
        let line = make_line(3);
        let mut rng = ChaCha8Rng::seed_from_u64(23);

        let outcome = run_once(
            &line,
            make_items(&["solo"]),
            100_000,
            &ServiceTimes::default(),
            &mut rng,
        );
        assert!(outcome.finished);
        assert!(outcome.duration >= 1);
    }

    #[test]
    fn test_two_items_take_at_least_two_ticks() {
        let line = make_line(3);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let outcome = run_once(
            &line,
            make_items(&["a", "b"]),
            100_000,
            &ServiceTimes::default(),
            &mut rng,
        );
        assert!(outcome.finished);
        assert!(outcome.duration >= 2);
    }

    #[test]
    fn test_rebuilt_line_and_same_seed_reproduce_the_run() {
        let spec = LineSpec::chain(4);
        let service = ServiceTimes::default();
        let input = make_items(&["a", "b", "c"]);

        let mut first_rng = ChaCha8Rng::seed_from_u64(99);
        let first = run_once(
            &Line::from_spec(&spec).unwrap(),
            input.clone(),
            100_000,
            &service,
            &mut first_rng,
        );

        let mut second_rng = ChaCha8Rng::seed_from_u64(99);
        let second = run_once(
            &Line::from_spec(&spec).unwrap(),
            input,
            100_000,
            &service,
            &mut second_rng,
        );

        assert_eq!(first, second);
    }

    #[test]
    fn test_duration_grows_with_batch_size_on_average() {
        let line = make_line(3);
        let service = ServiceTimes::default();

        let total_for = |labels: &[&str]| -> u64 {
            (0..200)
                .map(|seed| {
                    let mut rng = ChaCha8Rng::seed_from_u64(seed);
                    run_once(&line, make_items(labels), 100_000, &service, &mut rng).duration
                })
                .sum()
        };

        let two = total_for(&["a", "b"]);
        let three = total_for(&["a", "b", "c"]);
        assert!(
            three > two,
            "three-item batches should take longer overall ({three} <= {two})"
        );
    }

    #[test]
    fn test_clock_freezes_after_completion() {
        let line = make_line(2);
        let service = ServiceTimes::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let mut run = LineRun::new(&line, make_items(&["a"]));
        let outcome = run.run(100_000, &service, &mut rng);
        assert!(outcome.finished);

        // Further budget is a no-op: the duration is frozen.
        let again = run.run(50, &service, &mut rng);
        assert_eq!(again, outcome);
    }
}
