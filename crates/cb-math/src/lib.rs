//! # cb-math
//!
//! Statistics accumulators used to summarise Monte Carlo samples.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Statistics accumulators.
pub mod statistics;

pub use statistics::{GeneralStatistics, SampleStatistics};
