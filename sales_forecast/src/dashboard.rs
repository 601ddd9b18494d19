//! Prediction session
//!
//! A [`Session`] owns everything loaded at startup (history, feature schema,
//! model, recommendation policy) and answers one [`Selection`] at a time with
//! `encode -> predict -> evaluate -> charts`.

use crate::config::{AppConfig, DataConfig, ModelConfig};
use crate::data::{DataLoader, HistoricalRecord, SalesDataset};
use crate::error::{Result, SalesError};
use crate::features::{encode, FeatureSchema, SchemaCoverage, Selection, MAX_SOCIAL_MENTIONS};
use crate::insights::ChartSet;
use crate::models::{LinearModel, SalesModel};
use crate::recommendations::{format_count, ActionItem, Recommendation, RecommendationPolicy};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Number of sample rows in the debug summary
const SAMPLE_ROWS: usize = 3;

/// Values offered by each selector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorOptions {
    pub flavors: Vec<String>,
    pub weathers: Vec<String>,
    pub locations: Vec<String>,
    pub max_social_mentions: u32,
}

impl SelectorOptions {
    /// Label shown for a flavor, with its icon when one is known
    pub fn flavor_label(flavor: &str) -> String {
        let icon = match flavor {
            "Oreo" => Some("🍪"),
            "Chocolate Chip" => Some("🍫"),
            "Pink Sugar" => Some("🌸"),
            "Peanut Butter" => Some("🥜"),
            "Lemon Glaze" => Some("🍋"),
            _ => None,
        };
        labelled(icon, flavor)
    }

    /// Label shown for a weather condition, with its icon when one is known
    pub fn weather_label(weather: &str) -> String {
        let icon = match weather {
            "Sunny" => Some("☀️"),
            "Cloudy" => Some("☁️"),
            "Rainy" => Some("🌧️"),
            _ => None,
        };
        labelled(icon, weather)
    }
}

fn labelled(icon: Option<&str>, value: &str) -> String {
    match icon {
        Some(icon) => format!("{} {}", icon, value),
        None => value.to_string(),
    }
}

/// The three headline numbers of a prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub predicted_sales: f64,
    pub vs_average_pct: f64,
    pub batches: i64,
}

impl Metrics {
    /// Predicted sales rounded to whole units with separators
    pub fn predicted_sales_display(&self) -> String {
        format_count(self.predicted_sales.round() as i64)
    }

    /// Signed percentage, e.g. `+20%`
    pub fn vs_average_display(&self) -> String {
        format!("{:+.0}%", self.vs_average_pct)
    }

    pub fn batches_display(&self) -> String {
        format_count(self.batches)
    }
}

/// Everything produced by one prediction cycle
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub generated_at: DateTime<Utc>,
    pub model: String,
    pub selection: Selection,
    pub scenario: String,
    pub metrics: Metrics,
    pub recommendation: Recommendation,
    pub actions: Vec<ActionItem>,
    pub charts: ChartSet,
}

/// Dataset and model details for troubleshooting
#[derive(Debug, Clone, Serialize)]
pub struct DebugSummary {
    pub columns: Vec<String>,
    pub rows: usize,
    pub sample: Vec<HistoricalRecord>,
    pub expected_features: Vec<String>,
    pub coverage: SchemaCoverage,
}

/// Loaded state shared by every prediction
#[derive(Debug)]
pub struct Session<M: SalesModel> {
    dataset: SalesDataset,
    schema: FeatureSchema,
    model: M,
    policy: RecommendationPolicy,
    coverage: SchemaCoverage,
    averages: BTreeMap<String, f64>,
}

/// Load the historical sales named by the configuration
pub fn load_dataset(config: &DataConfig) -> Result<SalesDataset> {
    match config.seed {
        Some(seed) => DataLoader::from_csv_with_rng(&config.path, &mut StdRng::seed_from_u64(seed)),
        None => DataLoader::from_csv(&config.path),
    }
}

/// Load the feature schema and model artifacts named by the configuration
pub fn load_artifacts(config: &ModelConfig) -> Result<(FeatureSchema, LinearModel)> {
    let schema = FeatureSchema::from_json_file(&config.features_path)?;
    let model = LinearModel::from_json_file(&config.path)?;
    info!(
        model = model.name(),
        features = schema.len(),
        "loaded model artifacts"
    );
    Ok((schema, model))
}

impl Session<LinearModel> {
    /// Load data, schema and model named by the configuration
    pub fn open(config: &AppConfig) -> Result<Self> {
        let dataset = load_dataset(&config.data)?;
        let (schema, model) = load_artifacts(&config.model)?;

        Self::new(
            dataset,
            schema,
            model,
            config.recommendations,
            config.model.strict_schema,
        )
    }
}

impl<M: SalesModel> Session<M> {
    /// Assemble a session, checking that the schema covers every selectable value
    pub fn new(
        dataset: SalesDataset,
        schema: FeatureSchema,
        model: M,
        policy: RecommendationPolicy,
        strict_schema: bool,
    ) -> Result<Self> {
        if dataset.is_empty() {
            return Err(SalesError::DataError(
                "Sales data contains no usable rows".to_string(),
            ));
        }
        policy.validate()?;

        let coverage = SchemaCoverage::check(
            &schema,
            &dataset.flavors(),
            &dataset.weathers(),
            &dataset.locations(),
        );
        if strict_schema {
            coverage.require_complete()?;
        }
        for gap in &coverage.missing {
            warn!(
                column = %gap.column,
                value = %gap.value,
                "selectable value has no feature column; it will not influence predictions"
            );
        }
        if !coverage.has_holiday {
            warn!("feature schema has no holiday column; the holiday flag is ignored");
        }
        if !coverage.has_social_mentions {
            warn!("feature schema has no social_media_mentions column; mentions are ignored");
        }

        let mut averages = BTreeMap::new();
        for flavor in dataset.flavors() {
            let average = dataset.historical_average(&flavor)?;
            averages.insert(flavor, average);
        }

        Ok(Self {
            dataset,
            schema,
            model,
            policy,
            coverage,
            averages,
        })
    }

    pub fn dataset(&self) -> &SalesDataset {
        &self.dataset
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn coverage(&self) -> &SchemaCoverage {
        &self.coverage
    }

    /// Values offered by each selector, sorted
    pub fn options(&self) -> SelectorOptions {
        SelectorOptions {
            flavors: self.dataset.flavors(),
            weathers: self.dataset.weathers(),
            locations: self.dataset.locations(),
            max_social_mentions: MAX_SOCIAL_MENTIONS,
        }
    }

    /// Mean historical sales for a flavor
    pub fn historical_average(&self, flavor: &str) -> Result<f64> {
        self.averages.get(flavor).copied().ok_or_else(|| {
            SalesError::NoHistoricalData(format!("no historical rows for flavor '{}'", flavor))
        })
    }

    fn check_selection(&self, selection: &Selection) -> Result<()> {
        selection.validate()?;
        let checks = [
            ("flavor", &selection.flavor, self.dataset.flavors()),
            ("weather", &selection.weather, self.dataset.weathers()),
            ("location", &selection.location, self.dataset.locations()),
        ];
        for (field, value, allowed) in checks {
            if !allowed.contains(value) {
                return Err(SalesError::InvalidParameter(format!(
                    "unknown {} '{}' (expected one of: {})",
                    field,
                    value,
                    allowed.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Predicted unit sales for a selection
    pub fn predict(&self, selection: &Selection) -> Result<f64> {
        let input = encode(selection, &self.schema);
        debug!(features = ?input.values(), "encoded selection");
        self.model.predict(&input)
    }

    /// Run one full prediction cycle
    pub fn run(&self, selection: &Selection) -> Result<PredictionReport> {
        self.check_selection(selection)?;

        let prediction = self.predict(selection)?;
        let average = self.historical_average(&selection.flavor)?;
        let recommendation = self.policy.evaluate(prediction, average)?;
        debug!(
            prediction,
            average,
            change_pct = recommendation.change_pct,
            bundle = ?recommendation.bundle,
            "evaluated prediction"
        );

        Ok(PredictionReport {
            generated_at: Utc::now(),
            model: self.model.name().to_string(),
            scenario: selection.summary(),
            metrics: Metrics {
                predicted_sales: prediction,
                vs_average_pct: recommendation.change_pct,
                batches: recommendation.batches,
            },
            actions: recommendation.actions(&selection.flavor),
            recommendation,
            charts: ChartSet::build(&self.dataset, &selection.flavor)?,
            selection: selection.clone(),
        })
    }

    /// Columns, sample rows and expected features
    pub fn debug_summary(&self) -> DebugSummary {
        DebugSummary {
            columns: self.dataset.columns(),
            rows: self.dataset.len(),
            sample: self
                .dataset
                .records()
                .iter()
                .take(SAMPLE_ROWS)
                .cloned()
                .collect(),
            expected_features: self.schema.columns().to_vec(),
            coverage: self.coverage.clone(),
        }
    }
}
