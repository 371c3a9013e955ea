//! Empirical duration distributions and estimation reports.

use hdrhistogram::Histogram;
use linesim_simulation::RunOutcome;
use std::collections::BTreeMap;

/// Empirical distribution over observed completion durations.
///
/// The raw frequency table of the samples: each distinct duration maps to
/// the fraction of runs that produced it. No smoothing or fitting is
/// applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationDistribution {
    counts: BTreeMap<u64, u64>,
    total: u64,
}

impl DurationDistribution {
    /// Tabulate a distribution from raw duration samples.
    pub fn from_samples(samples: impl IntoIterator<Item = u64>) -> Self {
        let mut counts: BTreeMap<u64, u64> = BTreeMap::new();
        let mut total = 0;
        for duration in samples {
            *counts.entry(duration).or_insert(0) += 1;
            total += 1;
        }
        DurationDistribution { counts, total }
    }

    /// Fraction of runs that produced `duration`. Zero for durations never
    /// observed.
    pub fn probability(&self, duration: u64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.counts.get(&duration).copied().unwrap_or(0) as f64 / self.total as f64
    }

    /// Distinct observed durations with their fractions, in ascending
    /// duration order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        let total = self.total.max(1) as f64;
        self.counts
            .iter()
            .map(move |(&duration, &count)| (duration, count as f64 / total))
    }

    /// The most frequently observed duration, smallest first on ties.
    pub fn mode(&self) -> Option<u64> {
        let mut best: Option<(u64, u64)> = None;
        for (&duration, &count) in &self.counts {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((duration, count)),
            }
        }
        best.map(|(duration, _)| duration)
    }

    /// Number of samples the distribution was tabulated from.
    pub fn num_samples(&self) -> u64 {
        self.total
    }

    /// Smallest observed duration.
    pub fn min(&self) -> Option<u64> {
        self.counts.keys().next().copied()
    }

    /// Largest observed duration.
    pub fn max(&self) -> Option<u64> {
        self.counts.keys().next_back().copied()
    }
}

/// Aggregated result of a Monte Carlo estimation.
///
/// Carries the exact empirical distribution plus a histogram-backed summary
/// of the same samples for quick percentile reads.
#[derive(Debug, Clone)]
pub struct Estimate {
    distribution: DurationDistribution,
    histogram: Histogram<u64>,
    truncated_runs: u64,
}

impl Estimate {
    pub(crate) fn from_outcomes(outcomes: &[RunOutcome]) -> Self {
        let mut histogram =
            Histogram::<u64>::new(3).expect("three significant figures is a valid precision");
        let mut truncated_runs = 0;
        for outcome in outcomes {
            histogram.saturating_record(outcome.duration);
            if !outcome.finished {
                truncated_runs += 1;
            }
        }
        Estimate {
            distribution: DurationDistribution::from_samples(
                outcomes.iter().map(|o| o.duration),
            ),
            histogram,
            truncated_runs,
        }
    }

    /// The empirical completion-time distribution.
    pub fn distribution(&self) -> &DurationDistribution {
        &self.distribution
    }

    /// Runs whose tick budget ran out before the batch drained.
    pub fn truncated_runs(&self) -> u64 {
        self.truncated_runs
    }

    /// Total number of runs behind this estimate.
    pub fn num_runs(&self) -> u64 {
        self.distribution.num_samples()
    }

    /// Mean observed duration, in ticks.
    pub fn mean_duration(&self) -> f64 {
        self.histogram.mean()
    }

    /// Median observed duration, in ticks.
    pub fn p50_duration(&self) -> u64 {
        self.histogram.value_at_quantile(0.5)
    }

    /// 99th percentile of the observed durations, in ticks.
    pub fn p99_duration(&self) -> u64 {
        self.histogram.value_at_quantile(0.99)
    }

    /// Print the distribution table and summary to stdout.
    pub fn print_summary(&self) {
        println!("=== Completion time distribution ===");
        for (duration, probability) in self.distribution.iter() {
            println!("{duration:>6} ticks  {probability:>8.4}");
        }
        println!();
        println!(
            "runs: {} (truncated: {})",
            self.num_runs(),
            self.truncated_runs
        );
        println!(
            "mean: {:.2} ticks, p50: {}, p99: {}, min: {}, max: {}",
            self.mean_duration(),
            self.p50_duration(),
            self.p99_duration(),
            self.distribution.min().unwrap_or(0),
            self.distribution.max().unwrap_or(0),
        );
    }
}
