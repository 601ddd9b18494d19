//! Feature encoding for the sales model
//!
//! A [`Selection`] is turned into a [`PredictionInput`] whose layout is fixed
//! by an externally supplied [`FeatureSchema`]. Categorical choices become
//! one-hot indicators named `<category>_<value>`; the holiday flag and the
//! social-mention count are copied into the `holiday` and
//! `social_media_mentions` columns. Any derived name the schema does not
//! contain is dropped, so the matching feature stays zero.

use crate::error::{Result, SalesError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Schema column holding the holiday flag
pub const HOLIDAY_COLUMN: &str = "holiday";
/// Schema column holding the expected social-media mention count
pub const SOCIAL_MENTIONS_COLUMN: &str = "social_media_mentions";
/// Upper bound of the social-mention slider
pub const MAX_SOCIAL_MENTIONS: u32 = 100;

/// Categorical inputs that are one-hot encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Weather,
    Flavor,
    Location,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Weather, Category::Flavor, Category::Location];

    pub fn prefix(&self) -> &'static str {
        match self {
            Category::Weather => "weather",
            Category::Flavor => "flavor",
            Category::Location => "location",
        }
    }

    /// One-hot column name for a value of this category
    pub fn column_for(&self, value: &str) -> String {
        format!("{}_{}", self.prefix(), value)
    }
}

/// Ordered list of the columns the model consumes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSchema {
    columns: Vec<String>,
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Create a schema, rejecting empty lists and duplicate names
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.is_empty() {
            return Err(SalesError::SchemaError(
                "Feature schema must contain at least one column".to_string(),
            ));
        }

        let mut positions = HashMap::with_capacity(columns.len());
        for (index, name) in columns.iter().enumerate() {
            if positions.insert(name.clone(), index).is_some() {
                return Err(SalesError::SchemaError(format!(
                    "Duplicate feature column '{}'",
                    name
                )));
            }
        }

        Ok(Self { columns, positions })
    }

    /// Load a schema from a JSON array of column names
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Parse a schema from a JSON array of column names
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let columns: Vec<String> = serde_json::from_str(raw)?;
        Self::new(columns)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// The user's choices for one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub flavor: String,
    pub weather: String,
    pub location: String,
    pub is_holiday: bool,
    pub social_mentions: u32,
}

impl Selection {
    pub fn new(
        flavor: impl Into<String>,
        weather: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            flavor: flavor.into(),
            weather: weather.into(),
            location: location.into(),
            is_holiday: false,
            social_mentions: 0,
        }
    }

    pub fn with_holiday(mut self, is_holiday: bool) -> Self {
        self.is_holiday = is_holiday;
        self
    }

    pub fn with_social_mentions(mut self, social_mentions: u32) -> Self {
        self.social_mentions = social_mentions;
        self
    }

    /// Value chosen for a categorical input
    pub fn value(&self, category: Category) -> &str {
        match category {
            Category::Weather => &self.weather,
            Category::Flavor => &self.flavor,
            Category::Location => &self.location,
        }
    }

    /// Check that the mention count lies on the slider
    pub fn validate(&self) -> Result<()> {
        if self.social_mentions > MAX_SOCIAL_MENTIONS {
            return Err(SalesError::InvalidParameter(format!(
                "social mentions must be between 0 and {}, got {}",
                MAX_SOCIAL_MENTIONS, self.social_mentions
            )));
        }
        Ok(())
    }

    /// One-line description of the scenario
    pub fn summary(&self) -> String {
        let mut text = format!(
            "{} cookies during {} weather at {} location",
            self.flavor, self.weather, self.location
        );
        if self.is_holiday {
            text.push_str(" (Holiday Week)");
        }
        text
    }
}

/// Feature vector laid out in schema order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionInput {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl PredictionInput {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Value of a named column, if the schema has it
    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|index| self.values[index])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Encode a selection against a schema
///
/// Never fails: derived columns missing from the schema are ignored.
pub fn encode(selection: &Selection, schema: &FeatureSchema) -> PredictionInput {
    let mut values = vec![0.0; schema.len()];

    if let Some(index) = schema.position(HOLIDAY_COLUMN) {
        values[index] = if selection.is_holiday { 1.0 } else { 0.0 };
    }
    if let Some(index) = schema.position(SOCIAL_MENTIONS_COLUMN) {
        values[index] = f64::from(selection.social_mentions);
    }

    for category in Category::ALL {
        let column = category.column_for(selection.value(category));
        if let Some(index) = schema.position(&column) {
            values[index] = 1.0;
        }
    }

    PredictionInput {
        columns: schema.columns().to_vec(),
        values,
    }
}

/// Derived one-hot column that the schema cannot represent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingColumn {
    pub category: Category,
    pub value: String,
    pub column: String,
}

/// How well a schema covers the values a user can select
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaCoverage {
    pub missing: Vec<MissingColumn>,
    pub has_holiday: bool,
    pub has_social_mentions: bool,
}

impl SchemaCoverage {
    /// Compare every selectable value against the schema
    pub fn check(
        schema: &FeatureSchema,
        flavors: &[String],
        weathers: &[String],
        locations: &[String],
    ) -> Self {
        let groups = [
            (Category::Flavor, flavors),
            (Category::Weather, weathers),
            (Category::Location, locations),
        ];

        let missing = groups
            .iter()
            .flat_map(|(category, values)| {
                values.iter().filter_map(move |value| {
                    let column = category.column_for(value);
                    (!schema.contains(&column)).then(|| MissingColumn {
                        category: *category,
                        value: value.clone(),
                        column,
                    })
                })
            })
            .collect();

        Self {
            missing,
            has_holiday: schema.contains(HOLIDAY_COLUMN),
            has_social_mentions: schema.contains(SOCIAL_MENTIONS_COLUMN),
        }
    }

    /// True when every selectable value has a one-hot column
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Fail when any selectable value has no one-hot column
    pub fn require_complete(&self) -> Result<()> {
        if self.is_complete() {
            return Ok(());
        }
        let names: Vec<&str> = self.missing.iter().map(|m| m.column.as_str()).collect();
        Err(SalesError::SchemaError(format!(
            "Feature schema has no column for: {}",
            names.join(", ")
        )))
    }
}
