//! Numeric and formatting helpers used across Factory Dash

use chrono::{DateTime, Utc};

/// Get the current timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Parse a metric field, yielding `None` for blanks and anything that is not a finite number
pub fn parse_metric(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Arithmetic mean of the defined values, `None` when there are none
pub fn mean_defined<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Sum of the defined values, `0` when there are none
pub fn sum_defined<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().sum()
}

/// Number of defined values
pub fn count_defined<I>(values: I) -> usize
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().count()
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a percentage with two decimals, e.g. `93.41%`
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Format an optional metric, using `n/a` when absent
pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.decimals$}"))
}
