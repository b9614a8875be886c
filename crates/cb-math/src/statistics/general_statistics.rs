//! Sample-retaining weighted statistics.
//!
//! [`GeneralStatistics`] keeps every `(value, weight)` pair it is given, so
//! besides the moments it can answer order statistics such as percentiles.
//! Moments follow the usual bias-corrected sample estimators:
//!
//! * variance   `N/(N−1) · E[(x−μ)²]`
//! * skewness   `N²/((N−1)(N−2)) · E[(x−μ)³] / σ³`
//! * kurtosis   `N²(N+1)/((N−1)(N−2)(N−3)) · E[(x−μ)⁴] / σ⁴ − 3(N−1)²/((N−2)(N−3))`
//!
//! where `E[·]` is the weight-averaged expectation and `N` the sample count.
//! A degenerate sample (σ = 0) yields `NaN` for skewness and kurtosis; those
//! values are reported as-is rather than replaced.

use super::SampleStatistics;
use cb_core::{ensure, errors::Result, Real, Size};

/// Weighted statistics accumulator retaining the full sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneralStatistics {
    samples: Vec<(Real, Real)>,
}

impl GeneralStatistics {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` with the given non-negative `weight`.
    pub fn add(&mut self, value: Real, weight: Real) -> Result<()> {
        ensure!(weight >= 0.0, "negative weight ({weight}) not allowed");
        self.samples.push((value, weight));
        Ok(())
    }

    /// Add every value of `values` with weight 1.
    pub fn extend<I: IntoIterator<Item = Real>>(&mut self, values: I) {
        self.samples.extend(values.into_iter().map(|v| (v, 1.0)));
    }

    /// Number of samples collected.
    pub fn samples(&self) -> Size {
        self.samples.len()
    }

    /// Sum of the weights.
    pub fn weight_sum(&self) -> Real {
        self.samples.iter().map(|&(_, w)| w).sum()
    }

    /// Weight-averaged expectation of `f(x)`.
    fn expectation<F: Fn(Real) -> Real>(&self, f: F) -> Result<Real> {
        let (num, den) = self
            .samples
            .iter()
            .fold((0.0, 0.0), |(num, den), &(x, w)| (num + w * f(x), den + w));
        ensure!(den > 0.0, "null total weight");
        Ok(num / den)
    }

    /// Weighted mean.
    pub fn mean(&self) -> Result<Real> {
        ensure!(!self.samples.is_empty(), "empty sample set");
        self.expectation(|x| x)
    }

    /// Bias-corrected weighted variance; needs at least two samples.
    pub fn variance(&self) -> Result<Real> {
        let n = self.samples.len();
        ensure!(n > 1, "sample number <= 1, insufficient");
        let m = self.mean()?;
        let s2 = self.expectation(|x| (x - m) * (x - m))?;
        Ok(s2 * n as Real / (n as Real - 1.0))
    }

    /// Square root of [`variance`](Self::variance).
    pub fn standard_deviation(&self) -> Result<Real> {
        self.variance().map(Real::sqrt)
    }

    /// Bias-corrected skewness; needs at least three samples.
    pub fn skewness(&self) -> Result<Real> {
        let n = self.samples.len();
        ensure!(n > 2, "sample number <= 2, insufficient");
        let m = self.mean()?;
        let x = self.expectation(|v| (v - m).powi(3))?;
        let sigma = self.standard_deviation()?;
        let n = n as Real;
        Ok((x / (sigma * sigma * sigma)) * (n / (n - 1.0)) * (n / (n - 2.0)))
    }

    /// Bias-corrected excess kurtosis; needs at least four samples.
    pub fn kurtosis(&self) -> Result<Real> {
        let n = self.samples.len();
        ensure!(n > 3, "sample number <= 3, insufficient");
        let m = self.mean()?;
        let x = self.expectation(|v| (v - m).powi(4))?;
        let sigma2 = self.variance()?;
        let n = n as Real;
        let c1 = (n / (n - 1.0)) * (n / (n - 2.0)) * ((n + 1.0) / (n - 3.0));
        let c2 = 3.0 * ((n - 1.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0)));
        Ok(c1 * (x / (sigma2 * sigma2)) - c2)
    }

    /// The smallest sample `x` such that the weight of samples `≤ x` is at
    /// least `p` of the total weight.  Requires `0 < p ≤ 1`.
    pub fn percentile(&self, p: Real) -> Result<Real> {
        ensure!(p > 0.0 && p <= 1.0, "percentile ({p}) must be in (0.0, 1.0]");
        let sorted = self.sorted();
        ensure!(!sorted.is_empty(), "empty sample set");
        let target = p * self.weight_sum();
        let mut integral = 0.0;
        for &(x, w) in &sorted {
            integral += w;
            if integral >= target {
                return Ok(x);
            }
        }
        // rounding in the running sum can leave it a hair short of the target
        Ok(sorted[sorted.len() - 1].0)
    }

    /// Append every sample of `other`.
    pub fn merge(&mut self, other: GeneralStatistics) {
        self.samples.extend(other.samples);
    }

    fn sorted(&self) -> Vec<(Real, Real)> {
        let mut v = self.samples.clone();
        v.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        v
    }
}

impl SampleStatistics for GeneralStatistics {
    fn add(&mut self, value: Real, weight: Real) -> Result<()> {
        GeneralStatistics::add(self, value, weight)
    }

    fn samples(&self) -> Size {
        GeneralStatistics::samples(self)
    }

    fn mean(&self) -> Result<Real> {
        GeneralStatistics::mean(self)
    }

    fn percentile(&self, p: Real) -> Result<Real> {
        GeneralStatistics::percentile(self, p)
    }

    fn standard_deviation(&self) -> Result<Real> {
        GeneralStatistics::standard_deviation(self)
    }

    fn skewness(&self) -> Result<Real> {
        GeneralStatistics::skewness(self)
    }

    fn kurtosis(&self) -> Result<Real> {
        GeneralStatistics::kurtosis(self)
    }

    fn merge(&mut self, other: Self) {
        GeneralStatistics::merge(self, other)
    }
}
