//! Error types for the sales_forecast crate

use crate::config::ConfigError;
use bake_math::MathError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum SalesError {
    /// Error related to dataset validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Feature schema artifact is malformed or does not cover the selectable values
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// Model artifact could not be used to produce a prediction
    #[error("Model error: {0}")]
    ModelError(String),

    /// Error from invalid parameters or selections
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The selected flavor has no usable historical average
    #[error("No historical data: {0}")]
    NoHistoricalData(String),

    /// Error from mathematical operations
    #[error("Math error: {0}")]
    MathError(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error reading or writing JSON artifacts and reports
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Error writing chart exports
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error loading configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, SalesError>;

impl From<PolarsError> for SalesError {
    fn from(err: PolarsError) -> Self {
        SalesError::PolarsError(err.to_string())
    }
}
