//! # Bake Math
//!
//! Small statistics helpers used by the sales forecasting crates.
//! This crate provides the aggregations behind the chart datasets and the
//! integer rounding used for production planning.

use thiserror::Error;

pub mod summary;

pub use summary::{floor_div, grouped_mean, mean, quantile, FiveNumberSummary};

/// Errors that can occur in sales calculations
#[derive(Error, Debug, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),
}

/// Result type for sales math operations
pub type Result<T> = std::result::Result<T, MathError>;
