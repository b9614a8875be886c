//! # cb-termstructures
//!
//! Risk-free discount curves.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `TermStructure`: base trait for all term structures.
pub mod term_structure;

/// `YieldTermStructure`: discounting term structures.
pub mod yield_term_structure;

/// `FlatForward`: constant forward-rate yield curve.
pub mod flat_forward;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use flat_forward::FlatForward;
pub use term_structure::TermStructure;
pub use yield_term_structure::{YieldTermStructure, YieldTermStructureData};
