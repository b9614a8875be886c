//! # cb-cashflows
//!
//! Cash flows, fixed-rate coupons, and legs.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cashflow;
pub mod cashflows;
pub mod fixed_rate_coupon;

pub use cashflow::{CashFlow, Leg, Redemption, SimpleCashFlow};
pub use cashflows::{check_ordering, is_expired, maturity_date};
pub use fixed_rate_coupon::{FixedRateCoupon, FixedRateLegBuilder};
