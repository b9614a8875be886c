//! `TermStructure`: base trait for all term structures.
//!
//! Every term structure has a **reference date** and a **day counter**.

use cb_core::Time;
use cb_time::{Date, DayCounter};

/// Base trait for all term structures.
pub trait TermStructure: std::fmt::Debug + Send + Sync {
    /// The date at which discount = 1.0 and from which time is measured.
    fn reference_date(&self) -> Date;

    /// The day counter used for date → time-fraction conversions.
    fn day_counter(&self) -> &dyn DayCounter;

    /// Convert a date to a year fraction relative to the reference date.
    fn time_from_reference(&self, date: Date) -> Time {
        self.day_counter()
            .year_fraction(self.reference_date(), date)
    }
}
