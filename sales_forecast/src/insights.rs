//! Chart datasets for the selected flavor
//!
//! Three views back the performance insights: the weekly sales trend, the
//! spread of sales per weather condition and the mean sales per location.

use crate::data::SalesDataset;
use crate::error::Result;
use bake_math::{grouped_mean, FiveNumberSummary};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Mean sales for one week
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub week: i64,
    pub units_sold: f64,
}

/// Distribution of sales under one weather condition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSpread {
    pub weather: String,
    pub observations: usize,
    pub summary: FiveNumberSummary,
}

/// Mean sales at one location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationMean {
    pub location: String,
    pub units_sold: f64,
}

/// A chart dataset with its title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart<T> {
    pub title: String,
    pub points: Vec<T>,
}

/// All chart datasets for one flavor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub flavor: String,
    /// Absent when the dataset has no week column
    pub weekly_trend: Option<Chart<TrendPoint>>,
    pub weather_impact: Chart<WeatherSpread>,
    pub location_comparison: Chart<LocationMean>,
}

/// Mean sales per week for a flavor, in week order
pub fn weekly_trend(dataset: &SalesDataset, flavor: &str) -> Option<Chart<TrendPoint>> {
    if !dataset.has_week() {
        return None;
    }

    let means = grouped_mean(
        dataset
            .for_flavor(flavor)
            .filter_map(|r| r.week.map(|week| (week, r.units_sold))),
    );

    Some(Chart {
        title: format!("Weekly Sales Trend for {}", flavor),
        points: means
            .into_iter()
            .map(|(week, units_sold)| TrendPoint { week, units_sold })
            .collect(),
    })
}

/// Five-number summary of a flavor's sales per weather condition
pub fn weather_impact(dataset: &SalesDataset, flavor: &str) -> Result<Chart<WeatherSpread>> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for record in dataset.for_flavor(flavor) {
        groups
            .entry(record.weather.as_str())
            .or_default()
            .push(record.units_sold);
    }

    let mut points = Vec::with_capacity(groups.len());
    for (weather, values) in groups {
        points.push(WeatherSpread {
            weather: weather.to_string(),
            observations: values.len(),
            summary: FiveNumberSummary::from_values(&values)?,
        });
    }

    Ok(Chart {
        title: format!("Weather Impact on {} Sales", flavor),
        points,
    })
}

/// Mean sales per location for a flavor, in location order
pub fn location_comparison(dataset: &SalesDataset, flavor: &str) -> Chart<LocationMean> {
    let means = grouped_mean(
        dataset
            .for_flavor(flavor)
            .map(|r| (r.location.clone(), r.units_sold)),
    );

    Chart {
        title: format!("{} Sales by Location", flavor),
        points: means
            .into_iter()
            .map(|(location, units_sold)| LocationMean {
                location,
                units_sold,
            })
            .collect(),
    }
}

impl ChartSet {
    /// Build all three chart datasets for a flavor
    pub fn build(dataset: &SalesDataset, flavor: &str) -> Result<Self> {
        Ok(Self {
            flavor: flavor.to_string(),
            weekly_trend: weekly_trend(dataset, flavor),
            weather_impact: weather_impact(dataset, flavor)?,
            location_comparison: location_comparison(dataset, flavor),
        })
    }

    /// Write each dataset as a CSV file into `dir`, returning the written paths
    pub fn export_csv<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let mut written = Vec::new();

        if let Some(trend) = &self.weekly_trend {
            let path = dir.join("weekly_trend.csv");
            let mut writer = csv::Writer::from_path(&path)?;
            for point in &trend.points {
                writer.serialize(point)?;
            }
            writer.flush()?;
            written.push(path);
        }

        let path = dir.join("weather_impact.csv");
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["weather", "observations", "min", "q1", "median", "q3", "max"])?;
        for spread in &self.weather_impact.points {
            let s = spread.summary;
            writer.write_record([
                spread.weather.clone(),
                spread.observations.to_string(),
                s.min.to_string(),
                s.q1.to_string(),
                s.median.to_string(),
                s.q3.to_string(),
                s.max.to_string(),
            ])?;
        }
        writer.flush()?;
        written.push(path);

        let path = dir.join("location_comparison.csv");
        let mut writer = csv::Writer::from_path(&path)?;
        for point in &self.location_comparison.points {
            writer.serialize(point)?;
        }
        writer.flush()?;
        written.push(path);

        Ok(written)
    }
}
