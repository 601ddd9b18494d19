//! Historical sales data handling

use crate::error::{Result, SalesError};
use bake_math::mean;
use polars::prelude::*;
use rand::{thread_rng, Rng};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

/// Name of the prediction target after normalization
pub const TARGET_COLUMN: &str = "units_sold";
/// Legacy name of the target column, renamed on load
pub const LEGACY_TARGET_COLUMN: &str = "sales";
/// Optional column used for the weekly trend chart
pub const WEEK_COLUMN: &str = "week";
/// Categorical columns every dataset must provide
pub const REQUIRED_COLUMNS: [&str; 3] = ["flavor", "weather", "location"];

/// Lower bound (inclusive) of synthesized `units_sold` values
pub const SYNTHETIC_MIN_UNITS: i64 = 50;
/// Upper bound (exclusive) of synthesized `units_sold` values
pub const SYNTHETIC_MAX_UNITS: i64 = 200;

/// A single row of historical sales
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalRecord {
    pub flavor: String,
    pub weather: String,
    pub location: String,
    pub week: Option<i64>,
    pub units_sold: f64,
}

/// Where the `units_sold` column of a dataset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TargetSource {
    /// The source already had a `units_sold` column
    Present,
    /// The source had a `sales` column that was renamed
    Renamed,
    /// Neither column existed; values were drawn at random
    Synthesized,
}

/// Historical sales dataset, read-only after loading
#[derive(Debug, Clone)]
pub struct SalesDataset {
    /// Data frame as loaded, after target normalization
    df: DataFrame,
    /// Materialized rows
    records: Vec<HistoricalRecord>,
    /// `(flavor, units_sold)` for every row with both values, including
    /// rows skipped from `records` for a missing weather or location
    flavor_units: Vec<(String, f64)>,
    /// Origin of the target column
    target_source: TargetSource,
    /// Whether the source had a week column
    has_week: bool,
}

/// Data loader for historical sales data
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load historical sales from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SalesDataset> {
        Self::from_csv_with_rng(path, &mut thread_rng())
    }

    /// Load historical sales from a CSV file, drawing synthesized targets from `rng`
    pub fn from_csv_with_rng<P: AsRef<Path>, R: Rng>(
        path: P,
        rng: &mut R,
    ) -> Result<SalesDataset> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        info!(path = %path.display(), rows = df.height(), "loaded sales data");
        Self::from_dataframe(df, rng)
    }

    /// Create a dataset from an existing DataFrame
    pub fn from_dataframe<R: Rng>(mut df: DataFrame, rng: &mut R) -> Result<SalesDataset> {
        Self::check_required_columns(&df)?;
        let target_source = Self::normalize_target(&mut df, rng)?;
        let has_week = Self::has_column(&df, WEEK_COLUMN);
        let (records, flavor_units) = Self::materialize(&df, has_week)?;

        Ok(SalesDataset {
            df,
            records,
            flavor_units,
            target_source,
            has_week,
        })
    }

    fn has_column(df: &DataFrame, name: &str) -> bool {
        df.get_column_names().iter().any(|column| *column == name)
    }

    fn check_required_columns(df: &DataFrame) -> Result<()> {
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| !Self::has_column(df, name))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SalesError::DataError(format!(
                "Missing required column(s): {}",
                missing.join(", ")
            )))
        }
    }

    /// Rename `sales` to `units_sold`, or synthesize `units_sold` when neither exists
    fn normalize_target<R: Rng>(df: &mut DataFrame, rng: &mut R) -> Result<TargetSource> {
        if Self::has_column(df, LEGACY_TARGET_COLUMN) {
            if Self::has_column(df, TARGET_COLUMN) {
                let replaced = df.drop_in_place(TARGET_COLUMN)?;
                warn!(
                    rows = replaced.len(),
                    "both `sales` and `units_sold` present; keeping `sales`"
                );
            }
            df.rename(LEGACY_TARGET_COLUMN, TARGET_COLUMN)?;
            return Ok(TargetSource::Renamed);
        }

        if Self::has_column(df, TARGET_COLUMN) {
            return Ok(TargetSource::Present);
        }

        let values: Vec<i64> = (0..df.height())
            .map(|_| rng.gen_range(SYNTHETIC_MIN_UNITS..SYNTHETIC_MAX_UNITS))
            .collect();
        df.with_column(Series::new(TARGET_COLUMN, values))?;
        warn!(
            rows = df.height(),
            "no sales column found; synthesized units_sold in [{}, {})",
            SYNTHETIC_MIN_UNITS,
            SYNTHETIC_MAX_UNITS
        );

        Ok(TargetSource::Synthesized)
    }

    fn materialize(
        df: &DataFrame,
        has_week: bool,
    ) -> Result<(Vec<HistoricalRecord>, Vec<(String, f64)>)> {
        let flavors = string_column(df, "flavor")?;
        let weathers = string_column(df, "weather")?;
        let locations = string_column(df, "location")?;
        let units = float_column(df, TARGET_COLUMN)?;
        let weeks = if has_week {
            week_column(df)?
        } else {
            vec![None; df.height()]
        };

        let mut records = Vec::with_capacity(df.height());
        let mut flavor_units = Vec::with_capacity(df.height());
        let mut skipped = 0usize;
        for i in 0..df.height() {
            if let (Some(flavor), Some(units_sold)) = (&flavors[i], units[i]) {
                flavor_units.push((flavor.clone(), units_sold));
            }
            match (&flavors[i], &weathers[i], &locations[i], units[i]) {
                (Some(flavor), Some(weather), Some(location), Some(units_sold)) => {
                    records.push(HistoricalRecord {
                        flavor: flavor.clone(),
                        weather: weather.clone(),
                        location: location.clone(),
                        week: weeks[i],
                        units_sold,
                    })
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(skipped, "skipped rows with missing flavor, weather, location or units_sold");
        }

        Ok((records, flavor_units))
    }
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df.column(name)?.cast(&DataType::Utf8)?;
    let values = series
        .utf8()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();
    Ok(values)
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df.column(name)?.cast(&DataType::Float64).map_err(|e| {
        SalesError::DataError(format!("Column '{}' cannot be converted to f64: {}", name, e))
    })?;
    let values = series.f64()?.into_iter().collect();
    Ok(values)
}

/// Week numbers; a fractional week is rejected rather than truncated
fn week_column(df: &DataFrame) -> Result<Vec<Option<i64>>> {
    float_column(df, WEEK_COLUMN)?
        .into_iter()
        .map(|value| match value {
            Some(week) if week.fract() != 0.0 => Err(SalesError::DataError(format!(
                "Column '{}' must hold whole week numbers, got {}",
                WEEK_COLUMN, week
            ))),
            Some(week) => Ok(Some(week as i64)),
            None => Ok(None),
        })
        .collect()
}

impl SalesDataset {
    /// Build a dataset directly from records (for testing and embedding)
    pub fn from_records(records: Vec<HistoricalRecord>) -> Result<Self> {
        let has_week = records.iter().any(|r| r.week.is_some());
        let flavor = Series::new(
            "flavor",
            records.iter().map(|r| r.flavor.as_str()).collect::<Vec<_>>(),
        );
        let weather = Series::new(
            "weather",
            records.iter().map(|r| r.weather.as_str()).collect::<Vec<_>>(),
        );
        let location = Series::new(
            "location",
            records.iter().map(|r| r.location.as_str()).collect::<Vec<_>>(),
        );
        let units = Series::new(
            TARGET_COLUMN,
            records.iter().map(|r| r.units_sold).collect::<Vec<f64>>(),
        );

        let mut columns = vec![flavor, weather, location];
        if has_week {
            columns.push(Series::new(
                WEEK_COLUMN,
                records.iter().map(|r| r.week).collect::<Vec<Option<i64>>>(),
            ));
        }
        columns.push(units);
        let df = DataFrame::new(columns)?;
        let flavor_units = records
            .iter()
            .map(|r| (r.flavor.clone(), r.units_sold))
            .collect();

        Ok(Self {
            df,
            records,
            flavor_units,
            target_source: TargetSource::Present,
            has_week,
        })
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Get the materialized rows
    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    /// Column names in source order
    pub fn columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn target_source(&self) -> TargetSource {
        self.target_source
    }

    /// Whether a week column is available for trend analysis
    pub fn has_week(&self) -> bool {
        self.has_week
    }

    /// Sorted distinct flavors
    pub fn flavors(&self) -> Vec<String> {
        self.distinct(|r| &r.flavor)
    }

    /// Sorted distinct weather conditions
    pub fn weathers(&self) -> Vec<String> {
        self.distinct(|r| &r.weather)
    }

    /// Sorted distinct store locations
    pub fn locations(&self) -> Vec<String> {
        self.distinct(|r| &r.location)
    }

    fn distinct<F>(&self, field: F) -> Vec<String>
    where
        F: Fn(&HistoricalRecord) -> &String,
    {
        self.records
            .iter()
            .map(|r| field(r).clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows for a single flavor
    pub fn for_flavor<'a>(&'a self, flavor: &'a str) -> impl Iterator<Item = &'a HistoricalRecord> + 'a {
        self.records.iter().filter(move |r| r.flavor == flavor)
    }

    /// Mean `units_sold` for a flavor across the whole history
    ///
    /// Counts every row with a flavor and a target, even when its weather or
    /// location is missing.
    pub fn historical_average(&self, flavor: &str) -> Result<f64> {
        let units: Vec<f64> = self
            .flavor_units
            .iter()
            .filter(|(name, _)| name == flavor)
            .map(|(_, units_sold)| *units_sold)
            .collect();
        if units.is_empty() {
            return Err(SalesError::NoHistoricalData(format!(
                "no historical rows for flavor '{}'",
                flavor
            )));
        }
        Ok(mean(&units)?)
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of usable rows
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
