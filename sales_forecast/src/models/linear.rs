//! Linear regression artifact

use crate::error::{Result, SalesError};
use crate::features::PredictionInput;
use crate::models::SalesModel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Linear regression model read from a JSON artifact
///
/// ```json
/// { "name": "crumbl_sales_linear", "intercept": 112.5, "coefficients": [0.8, 24.0] }
/// ```
///
/// Coefficients are positional and must line up with the feature schema the
/// model was trained against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Name of the model
    #[serde(default = "default_name")]
    name: String,
    /// Bias term
    intercept: f64,
    /// One weight per feature column
    coefficients: Vec<f64>,
}

fn default_name() -> String {
    "Linear Regression".to_string()
}

impl LinearModel {
    /// Create a new linear model
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Result<Self> {
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(SalesError::InvalidParameter(
                "Linear model weights must be finite".to_string(),
            ));
        }

        Ok(Self {
            name: default_name(),
            intercept,
            coefficients,
        })
    }

    /// Load a model from a JSON artifact
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Parse a model from JSON
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let model: LinearModel = serde_json::from_str(raw)?;
        Self::new(model.intercept, model.coefficients).map(|m| m.with_name(model.name))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Number of features the model was trained on
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }
}

impl SalesModel for LinearModel {
    fn predict(&self, input: &PredictionInput) -> Result<f64> {
        if input.len() != self.coefficients.len() {
            return Err(SalesError::ModelError(format!(
                "X has {} features, but {} is expecting {} features as input",
                input.len(),
                self.name,
                self.coefficients.len()
            )));
        }

        let prediction = self.intercept
            + self
                .coefficients
                .iter()
                .zip(input.values())
                .map(|(w, x)| w * x)
                .sum::<f64>();

        if !prediction.is_finite() {
            return Err(SalesError::ModelError(format!(
                "{} produced a non-finite prediction",
                self.name
            )));
        }

        Ok(prediction)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
