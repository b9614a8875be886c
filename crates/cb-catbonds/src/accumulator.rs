//! Per-path outcomes and their reduction.

use cb_core::{errors::Result, Real, Size};
use cb_math::{GeneralStatistics, SampleStatistics};

/// What one simulated path contributes to the valuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOutcome {
    /// No notional lost; the path is worth the cached risk-free NPV.
    RiskFree,
    /// Some notional lost.
    Impaired {
        /// The path's risk-adjusted NPV.
        npv: Real,
        /// Fraction of notional lost, in `(0, 1]`.
        loss: Real,
    },
}

/// Running totals over a set of paths.
///
/// Accumulators built over consecutive runs of paths combine with
/// [`merge`](Self::merge); folding them in path order reproduces the
/// accumulator of a single sequential pass.
#[derive(Debug, Clone, Default)]
pub struct PathAccumulator<S = GeneralStatistics> {
    total_npv: Real,
    paths: Size,
    loss_paths: Size,
    exhausted_paths: Size,
    expected_loss_sum: Real,
    statistics: S,
}

impl<S: SampleStatistics> PathAccumulator<S> {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one path; zero-loss paths contribute `risk_free_npv`.
    pub fn add(&mut self, outcome: PathOutcome, risk_free_npv: Real) -> Result<()> {
        let npv = match outcome {
            PathOutcome::RiskFree => risk_free_npv,
            PathOutcome::Impaired { npv, loss } => {
                self.loss_paths += 1;
                if loss >= 1.0 {
                    self.exhausted_paths += 1;
                }
                self.expected_loss_sum += loss;
                npv
            }
        };
        self.statistics.add(npv, 1.0)?;
        self.total_npv += npv;
        self.paths += 1;
        Ok(())
    }

    /// Append the paths recorded in `other`.
    pub fn merge(&mut self, other: Self) {
        self.total_npv += other.total_npv;
        self.paths += other.paths;
        self.loss_paths += other.loss_paths;
        self.exhausted_paths += other.exhausted_paths;
        self.expected_loss_sum += other.expected_loss_sum;
        self.statistics.merge(other.statistics);
    }

    /// Sum of the path NPVs.
    pub fn total_npv(&self) -> Real {
        self.total_npv
    }

    /// Number of paths recorded.
    pub fn paths(&self) -> Size {
        self.paths
    }

    /// Number of paths with a positive loss.
    pub fn loss_paths(&self) -> Size {
        self.loss_paths
    }

    /// Number of paths losing the whole notional.
    pub fn exhausted_paths(&self) -> Size {
        self.exhausted_paths
    }

    /// Sum of the per-path loss fractions.
    pub fn expected_loss_sum(&self) -> Real {
        self.expected_loss_sum
    }

    /// The path NPV sample.
    pub fn statistics(&self) -> &S {
        &self.statistics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcomes() -> Vec<PathOutcome> {
        vec![
            PathOutcome::RiskFree,
            PathOutcome::Impaired { npv: 40.0, loss: 0.5 },
            PathOutcome::RiskFree,
            PathOutcome::Impaired { npv: 0.0, loss: 1.0 },
            PathOutcome::RiskFree,
        ]
    }

    #[test]
    fn counts_and_sums() {
        let mut acc = PathAccumulator::<GeneralStatistics>::new();
        for o in outcomes() {
            acc.add(o, 95.0).unwrap();
        }
        assert_eq!(acc.paths(), 5);
        assert_eq!(acc.loss_paths(), 2);
        assert_eq!(acc.exhausted_paths(), 1);
        assert_eq!(acc.expected_loss_sum(), 1.5);
        assert_eq!(acc.total_npv(), 3.0 * 95.0 + 40.0);
        assert_eq!(acc.statistics().samples(), 5);
    }

    #[test]
    fn merge_in_order_matches_single_pass() {
        let all = outcomes();
        let mut single = PathAccumulator::<GeneralStatistics>::new();
        for &o in &all {
            single.add(o, 95.0).unwrap();
        }

        let mut merged = PathAccumulator::<GeneralStatistics>::new();
        for chunk in all.chunks(2) {
            let mut part = PathAccumulator::new();
            for &o in chunk {
                part.add(o, 95.0).unwrap();
            }
            merged.merge(part);
        }

        assert_eq!(merged.paths(), single.paths());
        assert_eq!(merged.loss_paths(), single.loss_paths());
        assert_eq!(merged.exhausted_paths(), single.exhausted_paths());
        assert_eq!(merged.expected_loss_sum(), single.expected_loss_sum());
        assert_eq!(merged.total_npv(), single.total_npv());
        assert_eq!(merged.statistics(), single.statistics());
    }
}
