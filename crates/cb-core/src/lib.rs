//! # cb-core
//!
//! Core types, traits, and error definitions for catbond-rs.
//!
//! This crate provides the foundational building blocks shared across all
//! other crates in the workspace: type aliases, the error hierarchy, the
//! Observer/Observable pattern, the relinkable `Handle`, and `LazyCache`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` macro.
pub mod errors;

/// Shared, observable reference handle (`Handle<T>`, `RelinkableHandle<T>`).
pub mod handle;

/// Design patterns: observable, lazy_object.
pub mod patterns;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Non-negative integer type.
pub type Natural = u32;

/// Alias used for counts, array sizes and indices.
pub type Size = usize;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A discount factor in [0, 1].
pub type DiscountFactor = Real;

/// A time measurement in years.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use handle::{Handle, RelinkableHandle};
pub use patterns::lazy_object::LazyCache;
pub use patterns::observable::{Observable, ObservableImpl, Observer};
