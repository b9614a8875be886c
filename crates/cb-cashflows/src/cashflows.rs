//! Cash-flow analysis functions operating on a [`Leg`].

use crate::cashflow::Leg;
use cb_core::{ensure, errors::Result};
use cb_time::Date;

/// The maturity (last payment) date of a leg.
pub fn maturity_date(leg: &Leg) -> Option<Date> {
    leg.iter().map(|cf| cf.date()).max()
}

/// Whether every cash flow of the leg has occurred at `settlement_date`.
pub fn is_expired(leg: &Leg, include_settlement_date_flows: Option<bool>, settlement_date: Date) -> bool {
    leg.iter()
        .all(|cf| cf.has_occurred(settlement_date, include_settlement_date_flows))
}

/// Check that the payment dates of a leg never decrease.
pub fn check_ordering(leg: &Leg) -> Result<()> {
    for pair in leg.windows(2) {
        let (previous, next) = (pair[0].date(), pair[1].date());
        ensure!(
            next >= previous,
            "cash flow on {next} follows a cash flow on {previous}"
        );
    }
    Ok(())
}
