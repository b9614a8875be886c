//! `YieldTermStructure`: discounting term structures.
//!
//! A yield curve is fully described by its discount function `P(t)`; zero
//! and forward rates (continuously compounded) are derived from it.

use crate::term_structure::TermStructure;
use cb_core::{DiscountFactor, Rate, Time};
use cb_time::{Date, DayCounter};
use std::sync::Arc;

/// A yield (interest-rate) term structure.
///
/// Implementors provide [`discount_impl`](YieldTermStructure::discount_impl);
/// every other quantity follows from it.
pub trait YieldTermStructure: TermStructure {
    /// Discount factor for time `t` (years from the reference date).
    fn discount_impl(&self, t: Time) -> DiscountFactor;

    /// Discount factor for a date.
    fn discount(&self, date: Date) -> DiscountFactor {
        self.discount_impl(self.time_from_reference(date))
    }

    /// Discount factor for a time.
    fn discount_time(&self, t: Time) -> DiscountFactor {
        self.discount_impl(t)
    }

    /// Continuously-compounded zero rate to `date`.
    fn zero_rate(&self, date: Date) -> Rate {
        let t = self.time_from_reference(date);
        if t.abs() < DT {
            // limit t -> 0: short rate over a small step
            return -self.discount_impl(DT).ln() / DT;
        }
        -self.discount_impl(t).ln() / t
    }

    /// Continuously-compounded forward rate between `d1` and `d2`.
    fn forward_rate(&self, d1: Date, d2: Date) -> Rate {
        let t1 = self.time_from_reference(d1);
        let t2 = self.time_from_reference(d2);
        let (t1, t2) = if (t2 - t1).abs() < DT { (t1, t1 + DT) } else { (t1, t2) };
        (self.discount_impl(t1) / self.discount_impl(t2)).ln() / (t2 - t1)
    }
}

/// Small time step used for instantaneous rate computations.
const DT: Time = 1.0e-4;

/// Common data shared by the yield-curve implementations.
#[derive(Debug, Clone)]
pub struct YieldTermStructureData {
    /// Reference date.
    pub reference_date: Date,
    /// Day counter for time calculations.
    pub day_counter: Arc<dyn DayCounter>,
}

impl YieldTermStructureData {
    /// Create a new data bundle.
    pub fn new(reference_date: Date, day_counter: impl DayCounter + 'static) -> Self {
        Self {
            reference_date,
            day_counter: Arc::new(day_counter),
        }
    }
}
