//! `Instrument` and `PricingEngine` traits.
//!
//! An instrument gathers its terms into an arguments record and hands it to
//! a pricing engine, which returns a results record.  Engines expose the
//! market data they observe so instruments can drop cached results when it
//! changes.

use cb_core::{errors::Result, Observable};
use cb_time::Date;

/// A pricing engine for instruments described by `Args`.
pub trait PricingEngine<Args>: std::fmt::Debug + Send + Sync {
    /// The results record produced by [`calculate`](Self::calculate).
    type Results;

    /// Price the instrument described by `args`.
    fn calculate(&self, args: &Args) -> Result<Self::Results>;

    /// Market data whose changes invalidate previously computed results.
    fn observables(&self) -> Vec<&dyn Observable> {
        Vec::new()
    }
}

/// Base trait for financial instruments.
pub trait Instrument: std::fmt::Debug + Send + Sync {
    /// Whether every payment of the instrument is in the past.
    fn is_expired(&self) -> bool;

    /// The last payment date, if any.
    fn maturity_date(&self) -> Option<Date> {
        None
    }
}
