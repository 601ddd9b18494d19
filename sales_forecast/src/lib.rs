//! # Sales Forecast
//!
//! Cookie sales prediction with production recommendations and sales insights.
//!
//! ## Features
//!
//! - Historical sales loading with target normalization
//! - Feature encoding against an externally supplied schema
//! - Pre-trained model contract ([`SalesModel`]) with a JSON linear model
//! - Surge / slump / steady recommendations with batch and staffing estimates
//! - Chart datasets: weekly trend, weather impact, location comparison
//!
//! ## Prediction Cycle
//!
//! A [`Session`] is built once from an [`AppConfig`] and then answers each
//! [`Selection`] with `encode -> predict -> evaluate -> charts`:
//!
//! ```no_run
//! use sales_forecast::config::{AppConfig, LoadOptions};
//! use sales_forecast::{Selection, Session};
//!
//! let config = AppConfig::load(LoadOptions::default())?;
//! let session = Session::open(&config)?;
//!
//! let selection = Selection::new("Oreo", "Sunny", "Provo")
//!     .with_holiday(true)
//!     .with_social_mentions(40);
//! let report = session.run(&selection)?;
//!
//! println!("{}", sales_forecast::render::render_text(&report));
//! # Ok::<(), sales_forecast::SalesError>(())
//! ```
//!
//! The encoder and recommendation engine can also be used on their own:
//!
//! ```
//! use sales_forecast::features::{encode, FeatureSchema, Selection};
//! use sales_forecast::recommendations::{evaluate, ActionBundle};
//!
//! let schema = FeatureSchema::new(vec![
//!     "holiday".to_string(),
//!     "social_media_mentions".to_string(),
//!     "flavor_Oreo".to_string(),
//!     "weather_Sunny".to_string(),
//! ])
//! .unwrap();
//! let input = encode(&Selection::new("Oreo", "Sunny", "Provo").with_social_mentions(7), &schema);
//! assert_eq!(input.values(), &[0.0, 7.0, 1.0, 1.0]);
//!
//! let recommendation = evaluate(180.0, 150.0).unwrap();
//! assert_eq!(recommendation.bundle, ActionBundle::Surge);
//! assert_eq!(recommendation.batches, 15);
//! ```

pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod features;
pub mod insights;
pub mod models;
pub mod recommendations;
pub mod render;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::dashboard::{PredictionReport, Session};
pub use crate::data::{DataLoader, HistoricalRecord, SalesDataset};
pub use crate::error::{Result, SalesError};
pub use crate::features::{encode, FeatureSchema, PredictionInput, Selection};
pub use crate::models::{LinearModel, SalesModel};
pub use crate::recommendations::{evaluate, ActionBundle, Recommendation};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
