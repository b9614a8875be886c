//! `FlatForward`: a yield term structure with a constant forward rate.
//!
//! This is the simplest possible yield curve: a constant continuously
//! compounded rate applying to all maturities.

use crate::term_structure::TermStructure;
use crate::yield_term_structure::{YieldTermStructure, YieldTermStructureData};
use cb_core::{ensure, errors::Result, DiscountFactor, Rate, Time};
use cb_time::{Date, DayCounter};

/// A flat (constant) forward-rate yield term structure.
///
/// Discount factors are `P(t) = exp(-r * t)`.
#[derive(Debug, Clone)]
pub struct FlatForward {
    data: YieldTermStructureData,
    rate: Rate,
}

impl FlatForward {
    /// Create a flat curve from a continuously-compounded rate.
    pub fn continuous(
        reference_date: Date,
        rate: Rate,
        day_counter: impl DayCounter + 'static,
    ) -> Self {
        Self {
            data: YieldTermStructureData::new(reference_date, day_counter),
            rate,
        }
    }

    /// Create the flat curve that discounts `date` by exactly `discount`.
    pub fn from_discount(
        reference_date: Date,
        discount: DiscountFactor,
        date: Date,
        day_counter: impl DayCounter + 'static,
    ) -> Result<Self> {
        ensure!(
            discount > 0.0,
            "discount factor ({discount}) must be positive"
        );
        let t = day_counter.year_fraction(reference_date, date);
        ensure!(
            t > 0.0,
            "pillar date ({date}) must follow the reference date ({reference_date})"
        );
        Ok(Self::continuous(reference_date, -discount.ln() / t, day_counter))
    }

    /// The continuously-compounded flat rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }
}

impl TermStructure for FlatForward {
    fn reference_date(&self) -> Date {
        self.data.reference_date
    }

    fn day_counter(&self) -> &dyn DayCounter {
        &*self.data.day_counter
    }
}

impl YieldTermStructure for FlatForward {
    fn discount_impl(&self, t: Time) -> DiscountFactor {
        (-self.rate * t).exp()
    }
}
