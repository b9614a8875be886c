//! The `CashFlow` trait, base of all cash-flow types.
//!
//! A cash flow is an amount of money paid at a specific date.

use cb_core::Real;
use cb_time::{Date, Settings};
use std::fmt;
use std::sync::Arc;

/// Base trait for all cash flows.
pub trait CashFlow: fmt::Debug + Send + Sync {
    /// The date on which this cash flow is paid.
    fn date(&self) -> Date;

    /// The amount of cash paid on the payment date.
    fn amount(&self) -> Real;

    /// Whether this cash flow has already occurred relative to `ref_date`.
    ///
    /// A flow paid exactly on `ref_date` is still pending when
    /// `include_ref_date` is true and has occurred otherwise.  `None` falls
    /// back to [`Settings::include_reference_date_events`].
    fn has_occurred(&self, ref_date: Date, include_ref_date: Option<bool>) -> bool {
        let include = include_ref_date
            .unwrap_or_else(|| Settings::instance().include_reference_date_events());
        if include {
            self.date() < ref_date
        } else {
            self.date() <= ref_date
        }
    }
}

/// A `Leg` is a sequence of shared cash flows.
pub type Leg = Vec<Arc<dyn CashFlow>>;

/// A fixed amount paid at a fixed date.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleCashFlow {
    /// The payment amount.
    pub amount: Real,
    /// The payment date.
    pub date: Date,
}

impl SimpleCashFlow {
    /// Create a new simple cash flow.
    pub fn new(amount: Real, date: Date) -> Self {
        Self { amount, date }
    }
}

impl CashFlow for SimpleCashFlow {
    fn date(&self) -> Date {
        self.date
    }

    fn amount(&self) -> Real {
        self.amount
    }
}

/// A notional repayment at a specific date.
#[derive(Debug, Clone, PartialEq)]
pub struct Redemption {
    /// The redemption amount.
    pub amount: Real,
    /// The redemption date.
    pub date: Date,
}

impl Redemption {
    /// Create a new redemption cash flow.
    pub fn new(amount: Real, date: Date) -> Self {
        Self { amount, date }
    }
}

impl CashFlow for Redemption {
    fn date(&self) -> Date {
        self.date
    }

    fn amount(&self) -> Real {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn simple_cashflow() {
        let d = date(2025, 6, 15);
        let cf = SimpleCashFlow::new(100.0, d);
        assert_eq!(cf.amount(), 100.0);
        assert_eq!(cf.date(), d);
    }

    #[test]
    fn has_occurred_respects_reference_date_flag() {
        let cf = Redemption::new(100.0, date(2025, 6, 15));
        let (before, on, after) = (date(2025, 6, 14), date(2025, 6, 15), date(2025, 6, 16));

        assert!(!cf.has_occurred(before, Some(false)));
        assert!(!cf.has_occurred(before, Some(true)));
        assert!(cf.has_occurred(on, Some(false)));
        assert!(!cf.has_occurred(on, Some(true)));
        assert!(cf.has_occurred(after, Some(false)));
        assert!(cf.has_occurred(after, Some(true)));
    }
}
