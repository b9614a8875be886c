//! Error types for catbond-rs.
//!
//! A single `thiserror`-derived enum covers every failure the valuation
//! stack can report.  The `ensure!` macro is the precondition shorthand.

use thiserror::Error;

/// The top-level error type used throughout catbond-rs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Date construction or arithmetic error.
    #[error("date error: {0}")]
    Date(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A required handle was dereferenced while unlinked.
    #[error("{0} handle is empty")]
    EmptyHandle(String),

    /// A catastrophe simulation produced unusable output.
    #[error("simulation error: {0}")]
    Simulation(String),
}

/// Shorthand `Result` type used throughout catbond-rs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use cb_core::{ensure, errors::Error};
/// fn positive(x: f64) -> cb_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::Precondition(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}
