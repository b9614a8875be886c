//! Monte Carlo cat bond engine configuration.

use cb_core::{errors::Error, errors::Result, Real, Size};
use serde::{Deserialize, Serialize};

/// Default hard cap on the number of simulated paths per valuation.
pub const MAX_PATHS: Size = 10_000;

/// How simulated paths are spread over threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parallelism {
    /// One path at a time on the calling thread.
    #[default]
    Sequential,

    /// Draw `batch_size` paths from the single simulation stream, value them
    /// in parallel, and fold the outcomes in path order.
    ///
    /// Results are bit-identical to [`Parallelism::Sequential`].
    Batched {
        /// Paths drawn per batch.
        batch_size: Size,
    },

    /// Split the path cap into blocks of `block_paths`; block `b` draws from
    /// the model's sub-stream `b`.
    ///
    /// Results depend on the block size but not on the number of threads.
    SubStreams {
        /// Paths per block.
        block_paths: Size,
    },
}

/// Immutable configuration of a
/// [`MonteCarloCatBondEngine`](crate::MonteCarloCatBondEngine).
///
/// # Examples
///
/// ```rust
/// use cb_catbonds::{CatBondEngineConfig, Parallelism};
///
/// let config = CatBondEngineConfig::builder()
///     .var_level(0.99)
///     .max_paths(5_000)
///     .parallelism(Parallelism::Batched { batch_size: 512 })
///     .build()
///     .unwrap();
///
/// assert_eq!(config.var_level(), Some(0.99));
/// assert_eq!(config.max_paths(), 5_000);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatBondEngineConfig {
    var_level: Option<Real>,
    include_settlement_date_flows: Option<bool>,
    max_paths: Size,
    parallelism: Parallelism,
}

impl Default for CatBondEngineConfig {
    fn default() -> Self {
        Self {
            var_level: None,
            include_settlement_date_flows: None,
            max_paths: MAX_PATHS,
            parallelism: Parallelism::Sequential,
        }
    }
}

impl CatBondEngineConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> CatBondEngineConfigBuilder {
        CatBondEngineConfigBuilder::default()
    }

    /// Confidence level of the reported VaR; `None` when risk metrics are
    /// not requested.
    #[inline]
    pub fn var_level(&self) -> Option<Real> {
        self.var_level
    }

    /// Explicit choice on settlement-date cash flows, if any.
    #[inline]
    pub fn include_settlement_date_flows(&self) -> Option<bool> {
        self.include_settlement_date_flows
    }

    /// Hard cap on simulated paths.
    #[inline]
    pub fn max_paths(&self) -> Size {
        self.max_paths
    }

    /// Threading strategy.
    #[inline]
    pub fn parallelism(&self) -> Parallelism {
        self.parallelism
    }

    /// Check the invariants enforced by the builder.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.var_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(Error::InvalidArgument(format!(
                    "VaR level {level} must lie in (0, 1)"
                )));
            }
        }
        if self.max_paths == 0 {
            return Err(Error::InvalidArgument(
                "the path cap must be positive".into(),
            ));
        }
        match self.parallelism {
            Parallelism::Batched { batch_size: 0 } => Err(Error::InvalidArgument(
                "batch size must be positive".into(),
            )),
            Parallelism::SubStreams { block_paths: 0 } => Err(Error::InvalidArgument(
                "sub-stream block size must be positive".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// Builder for [`CatBondEngineConfig`].
#[derive(Clone, Debug, Default)]
pub struct CatBondEngineConfigBuilder {
    config: CatBondEngineConfig,
}

impl CatBondEngineConfigBuilder {
    /// Request VaR, standard deviation, skewness and kurtosis; VaR is taken
    /// at confidence `level`.
    pub fn var_level(mut self, level: Real) -> Self {
        self.config.var_level = Some(level);
        self
    }

    /// Override [`Settings`](cb_time::Settings) on whether cash flows paid on
    /// the settlement date are still included.
    pub fn include_settlement_date_flows(mut self, include: bool) -> Self {
        self.config.include_settlement_date_flows = Some(include);
        self
    }

    /// Set the path cap.
    pub fn max_paths(mut self, max_paths: Size) -> Self {
        self.config.max_paths = max_paths;
        self
    }

    /// Set the threading strategy.
    pub fn parallelism(mut self, parallelism: Parallelism) -> Self {
        self.config.parallelism = parallelism;
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<CatBondEngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CatBondEngineConfig::builder().build().unwrap();
        assert_eq!(config, CatBondEngineConfig::default());
        assert_eq!(config.max_paths(), MAX_PATHS);
        assert_eq!(config.var_level(), None);
        assert_eq!(config.include_settlement_date_flows(), None);
        assert_eq!(config.parallelism(), Parallelism::Sequential);
    }

    #[test]
    fn rejects_invalid_values() {
        for level in [0.0, 1.0, -0.5, 1.5, Real::NAN] {
            assert!(CatBondEngineConfig::builder().var_level(level).build().is_err());
        }
        assert!(CatBondEngineConfig::builder().max_paths(0).build().is_err());
        assert!(CatBondEngineConfig::builder()
            .parallelism(Parallelism::Batched { batch_size: 0 })
            .build()
            .is_err());
        assert!(CatBondEngineConfig::builder()
            .parallelism(Parallelism::SubStreams { block_paths: 0 })
            .build()
            .is_err());
    }
}
