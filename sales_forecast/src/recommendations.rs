//! Production recommendations derived from a sales prediction
//!
//! A prediction is compared with the flavor's historical mean. The signed
//! percentage deviation selects one of three action bundles: a surge above
//! the surge threshold, a slump below the slump threshold, steady otherwise.

use crate::error::{Result, SalesError};
use bake_math::floor_div;
use serde::{Deserialize, Serialize};

/// Deviation (percent) above which demand counts as a surge
pub const SURGE_THRESHOLD_PCT: f64 = 15.0;
/// Deviation (percent) below which demand counts as a slump
pub const SLUMP_THRESHOLD_PCT: f64 = -10.0;
/// Cookies per production batch
pub const BATCH_SIZE: f64 = 12.0;
/// Cookies one extra baker can handle
pub const BAKER_THROUGHPUT: f64 = 150.0;
/// Extra packaging to prepare during a surge, in percent
pub const EXTRA_PACKAGING_PCT: u32 = 20;
/// Ingredient order reduction during a slump, in percent
pub const INGREDIENT_REDUCTION_PCT: u32 = 15;

/// Thresholds and production constants used to derive recommendations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendationPolicy {
    pub surge_threshold_pct: f64,
    pub slump_threshold_pct: f64,
    pub batch_size: f64,
    pub baker_throughput: f64,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            surge_threshold_pct: SURGE_THRESHOLD_PCT,
            slump_threshold_pct: SLUMP_THRESHOLD_PCT,
            batch_size: BATCH_SIZE,
            baker_throughput: BAKER_THROUGHPUT,
        }
    }
}

/// Which set of actions applies to a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionBundle {
    /// Demand well above average: scale up
    Surge,
    /// Demand well below average: scale down
    Slump,
    /// Demand close to average
    Steady,
}

/// A single recommended action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionItem {
    pub headline: String,
    pub detail: String,
}

impl ActionItem {
    fn new(headline: &str, detail: impl Into<String>) -> Self {
        Self {
            headline: headline.to_string(),
            detail: detail.into(),
        }
    }
}

/// Quantities derived from one prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    pub prediction: f64,
    pub historical_average: f64,
    /// Signed deviation from the historical average, in percent
    pub change_pct: f64,
    /// Whole production batches needed
    pub batches: i64,
    /// Whole extra bakers to schedule
    pub staff_estimate: i64,
    pub bundle: ActionBundle,
}

impl RecommendationPolicy {
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.surge_threshold_pct,
            self.slump_threshold_pct,
            self.batch_size,
            self.baker_throughput,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SalesError::InvalidParameter(
                "recommendation settings must be finite".to_string(),
            ));
        }
        if self.surge_threshold_pct <= self.slump_threshold_pct {
            return Err(SalesError::InvalidParameter(format!(
                "surge threshold ({}) must be above slump threshold ({})",
                self.surge_threshold_pct, self.slump_threshold_pct
            )));
        }
        if self.batch_size <= 0.0 {
            return Err(SalesError::InvalidParameter(
                "batch size must be positive".to_string(),
            ));
        }
        if self.baker_throughput <= 0.0 {
            return Err(SalesError::InvalidParameter(
                "baker throughput must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Derive the recommendation for `prediction` against the flavor's mean
    pub fn evaluate(&self, prediction: f64, historical_average: f64) -> Result<Recommendation> {
        if !prediction.is_finite() {
            return Err(SalesError::InvalidParameter(format!(
                "prediction must be a finite number, got {}",
                prediction
            )));
        }
        if !historical_average.is_finite() {
            return Err(SalesError::InvalidParameter(format!(
                "historical average must be a finite number, got {}",
                historical_average
            )));
        }
        if historical_average == 0.0 {
            return Err(SalesError::NoHistoricalData(
                "historical average is zero; cannot compare the prediction against it"
                    .to_string(),
            ));
        }

        let change_pct = (prediction / historical_average - 1.0) * 100.0;
        let batches = floor_div(prediction, self.batch_size)?;
        let staff_estimate = floor_div(prediction, self.baker_throughput)?;

        Ok(Recommendation {
            prediction,
            historical_average,
            change_pct,
            batches,
            staff_estimate,
            bundle: self.classify(change_pct),
        })
    }

    /// Pick the bundle for a deviation; the surge check wins ties with slump
    pub fn classify(&self, change_pct: f64) -> ActionBundle {
        if change_pct > self.surge_threshold_pct {
            ActionBundle::Surge
        } else if change_pct < self.slump_threshold_pct {
            ActionBundle::Slump
        } else {
            ActionBundle::Steady
        }
    }
}

/// Evaluate a prediction with the default policy
pub fn evaluate(prediction: f64, historical_average: f64) -> Result<Recommendation> {
    RecommendationPolicy::default().evaluate(prediction, historical_average)
}

impl Recommendation {
    /// Concrete actions for the selected bundle
    pub fn actions(&self, flavor: &str) -> Vec<ActionItem> {
        match self.bundle {
            ActionBundle::Surge => vec![
                ActionItem::new(
                    "Order Ingredients",
                    format!("{} batches needed", format_count(self.batches)),
                ),
                ActionItem::new(
                    "Staffing",
                    format!("Schedule {} extra bakers", self.staff_estimate),
                ),
                ActionItem::new("Marketing", format!("Boost posts about {}", flavor)),
                ActionItem::new(
                    "Inventory",
                    format!("Prepare {}% extra packaging", EXTRA_PACKAGING_PCT),
                ),
            ],
            ActionBundle::Slump => vec![
                ActionItem::new(
                    "Reduce Orders",
                    format!("Lower ingredient purchase by {}%", INGREDIENT_REDUCTION_PCT),
                ),
                ActionItem::new("Cross-Train Staff", "Use slow period for training"),
            ],
            ActionBundle::Steady => vec![
                ActionItem::new("Maintain Standard Operations", ""),
                ActionItem::new("Monitor Sales", "Be ready to adjust"),
            ],
        }
    }
}

/// Integer with thousands separators, e.g. `12,345`
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}
