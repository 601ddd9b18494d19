//! # Crumbl Workspace
//!
//! Facade over the workspace crates:
//!
//! - [`sales_forecast`]: data loading, feature encoding, the model contract,
//!   recommendations, chart datasets and the `crumbl` command-line tool
//! - [`bake_math`]: the statistics behind the chart datasets
//!
//! ## Example
//!
//! ```
//! use crumbl_workspace::sales_forecast::recommendations::{evaluate, ActionBundle};
//!
//! let steady = evaluate(150.0, 150.0).unwrap();
//! assert_eq!(steady.bundle, ActionBundle::Steady);
//! assert_eq!(steady.change_pct, 0.0);
//! ```

pub use bake_math;
pub use sales_forecast;

pub use sales_forecast::{
    encode, evaluate, ActionBundle, AppConfig, DataLoader, FeatureSchema, LinearModel,
    PredictionInput, PredictionReport, Recommendation, SalesError, SalesModel, Selection, Session,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_exposes_pipeline() {
        let schema = FeatureSchema::new(vec!["flavor_Oreo".to_string()]).unwrap();
        let input = encode(&Selection::new("Oreo", "Rainy", "Logan"), &schema);
        assert_eq!(input.values(), &[1.0]);

        let slump = evaluate(100.0, 150.0).unwrap();
        assert_eq!(slump.bundle, ActionBundle::Slump);
    }

    #[test]
    fn test_math_reexport() {
        assert_eq!(bake_math::floor_div(180.0, 150.0).unwrap(), 1);
    }
}
