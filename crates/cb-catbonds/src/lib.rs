//! # cb-catbonds
//!
//! Catastrophe bonds: event simulation, notional impairment, and Monte Carlo
//! valuation.
//!
//! A [`CatRisk`] model produces paths of `(date, loss)` events.  A
//! [`NotionalRisk`] rule turns each path into a [`NotionalPath`], the
//! fraction of notional surviving over time.  The
//! [`MonteCarloCatBondEngine`] values the bond's cash flows along every path
//! and averages.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Per-path outcomes and their reduction.
pub mod accumulator;

/// The cat bond instrument, its arguments and results.
pub mod cat_bond;

/// Catastrophe event models.
pub mod cat_risk;

/// Engine configuration.
pub mod config;

/// Monte Carlo pricing engine.
pub mod engine;

/// `Instrument` and `PricingEngine` traits.
pub mod instrument;

/// Notional paths and impairment rules.
pub mod notional_risk;

/// Risk-adjusted path valuation.
pub mod path_pricer;

pub use accumulator::{PathAccumulator, PathOutcome};
pub use cat_bond::{CatBond, CatBondArguments, CatBondPricingEngine, CatBondResults, RiskMetrics};
pub use cat_risk::{
    stream_seed, BetaRisk, BetaRiskSimulation, CatEvent, CatRisk, CatSimulation, EventSet,
    EventSetSimulation, DEFAULT_SEED,
};
pub use config::{CatBondEngineConfig, CatBondEngineConfigBuilder, Parallelism, MAX_PATHS};
pub use engine::MonteCarloCatBondEngine;
pub use instrument::{Instrument, PricingEngine};
pub use notional_risk::{
    DigitalNotionalRisk, EventPaymentOffset, NotionalPath, NotionalRisk, ProportionalNotionalRisk,
};
pub use path_pricer::RiskAdjustedPathPricer;
