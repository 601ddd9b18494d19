//! Plain-text rendering of prediction reports

use crate::dashboard::{DebugSummary, PredictionReport, SelectorOptions};
use crate::recommendations::ActionBundle;
use std::fmt::Write;

/// Render a full report: scenario, metric cards, actions and chart tables
pub fn render_text(report: &PredictionReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Scenario Summary");
    let _ = writeln!(out, "  -> {}", report.scenario);
    let _ = writeln!(out);

    let metrics = &report.metrics;
    let _ = writeln!(out, "  {:<18}{:<18}{:<18}", "Predicted Sales", "Vs Average", "Batches Needed");
    let _ = writeln!(
        out,
        "  {:<18}{:<18}{:<18}",
        metrics.predicted_sales_display(),
        metrics.vs_average_display(),
        metrics.batches_display()
    );
    let _ = writeln!(out);

    let heading = match report.recommendation.bundle {
        ActionBundle::Surge => "Recommended Actions (demand surge)",
        ActionBundle::Slump => "Recommended Actions (demand slump)",
        ActionBundle::Steady => "Recommended Actions (steady demand)",
    };
    let _ = writeln!(out, "{}", heading);
    for action in &report.actions {
        if action.detail.is_empty() {
            let _ = writeln!(out, "  - {}", action.headline);
        } else {
            let _ = writeln!(out, "  - {}: {}", action.headline, action.detail);
        }
    }
    let _ = writeln!(out);

    let charts = &report.charts;
    if let Some(trend) = &charts.weekly_trend {
        let _ = writeln!(out, "{}", trend.title);
        for point in &trend.points {
            let _ = writeln!(out, "  week {:>4}  {:>8.1}", point.week, point.units_sold);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}", charts.weather_impact.title);
    for spread in &charts.weather_impact.points {
        let s = &spread.summary;
        let _ = writeln!(
            out,
            "  {:<12} n={:<4} min {:>6.1}  q1 {:>6.1}  median {:>6.1}  q3 {:>6.1}  max {:>6.1}",
            spread.weather, spread.observations, s.min, s.q1, s.median, s.q3, s.max
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", charts.location_comparison.title);
    for point in &charts.location_comparison.points {
        let _ = writeln!(out, "  {:<20} {:>8.1}", point.location, point.units_sold);
    }

    out
}

/// Render the selector options with their display labels
pub fn render_options(options: &SelectorOptions) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Cookie Flavor");
    for flavor in &options.flavors {
        let _ = writeln!(out, "  {}", SelectorOptions::flavor_label(flavor));
    }
    let _ = writeln!(out, "Weather Condition");
    for weather in &options.weathers {
        let _ = writeln!(out, "  {}", SelectorOptions::weather_label(weather));
    }
    let _ = writeln!(out, "Store Location");
    for location in &options.locations {
        let _ = writeln!(out, "  {}", location);
    }
    let _ = writeln!(out, "Social Mentions: 0-{}", options.max_social_mentions);

    out
}

/// Render dataset and schema details
pub fn render_debug(summary: &DebugSummary) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Dataset Columns: {}", summary.columns.join(", "));
    let _ = writeln!(out, "Rows: {}", summary.rows);
    let _ = writeln!(out, "Sample Data:");
    for record in &summary.sample {
        let week = record
            .week
            .map(|w| w.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  {} | {} | {} | week {} | {}",
            record.flavor, record.weather, record.location, week, record.units_sold
        );
    }
    let _ = writeln!(out, "Model Features Expected: {}", summary.expected_features.join(", "));

    if summary.coverage.is_complete() {
        let _ = writeln!(out, "Schema covers every selectable value");
    } else {
        let _ = writeln!(out, "Selectable values without a feature column:");
        for gap in &summary.coverage.missing {
            let _ = writeln!(out, "  {} (expected column `{}`)", gap.value, gap.column);
        }
    }
    if !summary.coverage.has_holiday {
        let _ = writeln!(out, "No `holiday` column: holiday flag is ignored");
    }
    if !summary.coverage.has_social_mentions {
        let _ = writeln!(out, "No `social_media_mentions` column: mentions are ignored");
    }

    out
}
