//! Descriptive statistics
//!
//! Contains the aggregations used to summarise historical sales:
//! - Arithmetic mean and per-group means
//! - Linear-interpolation quantiles
//! - Five-number summaries for box plots

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Arithmetic mean of a sample
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute the mean of an empty sample".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of the values in each group, keyed and ordered by group
pub fn grouped_mean<K, I>(pairs: I) -> BTreeMap<K, f64>
where
    K: Ord,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut totals: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for (key, value) in pairs {
        let entry = totals.entry(key).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect()
}

/// Quantile of a sample using linear interpolation between order statistics
///
/// `q` must lie in `[0, 1]`. The sample does not need to be sorted.
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute a quantile of an empty sample".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(MathError::InvalidInput(format!(
            "Quantile must be between 0 and 1, got {}",
            q
        )));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Ok(sorted_quantile(&sorted, q))
}

fn sorted_quantile(sorted: &[f64], q: f64) -> f64 {
    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Minimum, quartiles and maximum of a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    /// Summarise a non-empty sample
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot summarise an empty sample".to_string(),
            ));
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Ok(Self {
            min: sorted[0],
            q1: sorted_quantile(&sorted, 0.25),
            median: sorted_quantile(&sorted, 0.5),
            q3: sorted_quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }

    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Floor of `numerator / denominator` as an integer count
///
/// Used for whole batches and whole workers; negative numerators round
/// towards negative infinity.
pub fn floor_div(numerator: f64, denominator: f64) -> Result<i64> {
    if denominator == 0.0 {
        return Err(MathError::DivisionByZero(format!(
            "Cannot divide {} by zero",
            numerator
        )));
    }
    if !numerator.is_finite() || !denominator.is_finite() {
        return Err(MathError::InvalidInput(format!(
            "Cannot floor-divide non-finite values {} / {}",
            numerator, denominator
        )));
    }

    Ok((numerator / denominator).floor() as i64)
}
