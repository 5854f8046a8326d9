//! Core error types for the valuation engine.
//!
//! Per-holding data problems are not errors: they surface as
//! [`Diagnostic`](crate::portfolio::valuation::Diagnostic) tags on the
//! holding's result. The types here cover what a caller can actually fail on.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the valuation engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Valuation failed: {0}")]
    Valuation(#[from] ValuationError),

    #[error("Input validation failed: {0}")]
    Validation(String),
}

/// Errors of the valuation calculations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValuationError {
    /// Unit cost could neither be read from the holding nor inferred, so the
    /// share count is unknown.
    #[error("Unit cost of holding {holding_id} could not be determined")]
    UndeterminedCost { holding_id: String },

    /// Fewer than two points are available to plot a trend.
    #[error("Insufficient curve data: {points} point(s) available")]
    InsufficientCurveData { points: usize },

    /// No holding with this id was part of the last valuation pass.
    #[error("Holding not found: {0}")]
    UnknownHolding(String),

    /// A value left the representable decimal range.
    #[error("Arithmetic overflow computing {0}")]
    Overflow(&'static str),
}
