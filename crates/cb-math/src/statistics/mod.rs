//! Statistics accumulators.
//!
//! The Monte Carlo engines only depend on the [`SampleStatistics`] contract;
//! [`GeneralStatistics`] is the default implementation.

use cb_core::{errors::Result, Real, Size};

mod general_statistics;

pub use general_statistics::GeneralStatistics;

/// An accumulator of weighted samples able to report order statistics and
/// higher moments.
///
/// `merge` must be associative: folding partial accumulators built over
/// consecutive slices of a sample, in slice order, gives the same accumulator
/// as adding every sample to a single instance.
pub trait SampleStatistics: Default + Clone + Send + std::fmt::Debug {
    /// Add `value` with `weight` (≥ 0).
    fn add(&mut self, value: Real, weight: Real) -> Result<()>;

    /// Number of samples added so far.
    fn samples(&self) -> Size;

    /// Weighted mean.
    fn mean(&self) -> Result<Real>;

    /// Smallest sample at which the cumulative weight reaches `p` of the
    /// total.  `p` must lie in `(0, 1]`.
    fn percentile(&self, p: Real) -> Result<Real>;

    /// Sample standard deviation.
    fn standard_deviation(&self) -> Result<Real>;

    /// Sample skewness.
    fn skewness(&self) -> Result<Real>;

    /// Sample excess kurtosis.
    fn kurtosis(&self) -> Result<Real>;

    /// Absorb every sample of `other`, placing them after the current ones.
    fn merge(&mut self, other: Self);
}
