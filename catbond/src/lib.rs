//! # catbond
//!
//! Monte Carlo valuation of catastrophe bonds.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `cb-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use catbond::prelude::*;
//! use std::sync::Arc;
//!
//! let today = Date::from_ymd(2025, 1, 2).unwrap();
//! Settings::instance().set_evaluation_date(today);
//!
//! let schedule = vec![
//!     today,
//!     Date::from_ymd(2026, 1, 2).unwrap(),
//!     Date::from_ymd(2027, 1, 4).unwrap(),
//! ];
//! let cashflows = FixedRateLegBuilder::new(schedule)
//!     .with_nominal(100.0)
//!     .with_coupon_rate(0.08)
//!     .with_day_counter(Actual365Fixed)
//!     .with_redemption()
//!     .build()
//!     .unwrap();
//! let rule = ProportionalNotionalRisk::new(EventPaymentOffset::NoOffset, 50.0, 150.0).unwrap();
//! let bond = Arc::new(CatBond::new(0, today, cashflows, Arc::new(rule)).unwrap());
//!
//! let curve: Arc<dyn YieldTermStructure> =
//!     Arc::new(FlatForward::continuous(today, 0.03, Actual365Fixed));
//! let risk = BetaRisk::new(100.0, 2.0, 40.0, 25.0).unwrap();
//! let engine = MonteCarloCatBondEngine::new(Arc::new(risk), Handle::new(curve));
//! bond.set_pricing_engine(Arc::new(engine));
//!
//! let npv = bond.npv().unwrap();
//! assert!(npv > 0.0 && npv < 120.0);
//! assert!(bond.loss_probability().unwrap() > 0.0);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use cb_core as core;

/// Dates, day counters, and global settings.
pub use cb_time as time;

/// Sample statistics.
pub use cb_math as math;

/// Discount curves.
pub use cb_termstructures as termstructures;

/// Cash flows, coupons, and legs.
pub use cb_cashflows as cashflows;

/// Catastrophe risk models, notional rules, the cat bond and its engine.
pub use cb_catbonds as catbonds;

/// The items needed to set up and price a cat bond.
pub mod prelude {
    pub use cb_cashflows::{CashFlow, FixedRateLegBuilder, Leg, Redemption, SimpleCashFlow};
    pub use cb_catbonds::{
        BetaRisk, CatBond, CatBondEngineConfig, CatBondResults, CatRisk, DigitalNotionalRisk,
        EventPaymentOffset, EventSet, Instrument, MonteCarloCatBondEngine, NotionalRisk,
        Parallelism, PricingEngine, ProportionalNotionalRisk,
    };
    pub use cb_core::{Error, Handle, RelinkableHandle, Real, Result};
    pub use cb_termstructures::{FlatForward, YieldTermStructure};
    pub use cb_time::{Actual360, Actual365Fixed, ActualActualIsda, Date, DayCounter, Settings};
}
