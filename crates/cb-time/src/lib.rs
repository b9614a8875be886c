//! # cb-time
//!
//! Dates, day-count conventions, and the process-wide valuation settings.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `Date` type.
pub mod date;

/// `DayCounter` trait and built-in day-count conventions.
pub mod day_counter;

/// Global evaluation date and reference-date-event policy.
pub mod settings;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use chrono::Weekday;
pub use date::Date;
pub use day_counter::{Actual360, Actual365Fixed, ActualActualIsda, DayCounter};
pub use settings::{SavedSettings, Settings};
