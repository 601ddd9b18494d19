//! Sales prediction models
//!
//! Models are trained elsewhere and shipped as artifacts. This crate only
//! relies on the [`SalesModel`] contract: a feature vector in schema order
//! goes in, a single unit-sales estimate comes out.

use crate::error::Result;
use crate::features::PredictionInput;
use std::fmt::Debug;

/// Pre-trained model producing a unit-sales estimate
pub trait SalesModel: Debug {
    /// Predict unit sales for one encoded scenario
    fn predict(&self, input: &PredictionInput) -> Result<f64>;

    /// Name of the model
    fn name(&self) -> &str;
}

impl<M: SalesModel + ?Sized> SalesModel for Box<M> {
    fn predict(&self, input: &PredictionInput) -> Result<f64> {
        (**self).predict(input)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

pub mod linear;

pub use linear::LinearModel;
