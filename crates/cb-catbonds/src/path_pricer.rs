//! Risk-adjusted valuation of a bond's cash flows along one notional path.

use crate::notional_risk::NotionalPath;
use cb_cashflows::Leg;
use cb_core::Real;
use cb_termstructures::YieldTermStructure;
use cb_time::Date;

/// Values the cash flows of a leg still pending at a settlement date, each
/// scaled by the notional surviving on its payment date.
///
/// Discount factors are taken once at construction; pricing a path only
/// walks the pending flows.
#[derive(Debug, Clone)]
pub struct RiskAdjustedPathPricer {
    /// (payment date, amount × discount factor), in leg order.
    pending: Vec<(Date, Real)>,
}

impl RiskAdjustedPathPricer {
    /// Prepare the flows of `cashflows` that have not occurred at
    /// `settlement_date`.
    pub fn new(
        cashflows: &Leg,
        curve: &dyn YieldTermStructure,
        include_settlement_date_flows: bool,
        settlement_date: Date,
    ) -> Self {
        let pending = cashflows
            .iter()
            .filter(|cf| !cf.has_occurred(settlement_date, Some(include_settlement_date_flows)))
            .map(|cf| (cf.date(), cf.amount() * curve.discount(cf.date())))
            .collect();
        Self { pending }
    }

    /// Number of flows still pending.
    pub fn pending_flows(&self) -> usize {
        self.pending.len()
    }

    /// Discounted value of the pending flows under `path`.
    pub fn path_npv(&self, path: &NotionalPath) -> Real {
        self.pending
            .iter()
            .map(|&(date, discounted)| discounted * path.notional_rate(date))
            .sum()
    }

    /// Discounted value of the pending flows with no notional lost.
    pub fn risk_free_npv(&self) -> Real {
        self.path_npv(&NotionalPath::new())
    }
}
