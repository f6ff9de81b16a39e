//! Helper functions for statistical operations
//!
//! Common utilities for reading inputs and computing shared quantities.

use statcalc_core::{Report, StatsError};
use statcalc_plugin::Inputs;
use tracing::debug;

/// Look up several required fields at once
pub fn require_fields<'a, const N: usize>(
    inputs: &'a Inputs,
    names: [&str; N],
) -> Result<[&'a str; N], StatsError> {
    let mut out = [""; N];
    for (slot, name) in out.iter_mut().zip(names) {
        *slot = inputs.require(name)?;
    }
    Ok(out)
}

/// Turn an operation result into a report, logging failures
pub fn finish<T: Into<Report>>(op: &str, result: Result<T, StatsError>) -> Report {
    if let Err(ref e) = result {
        debug!(operation = op, code = %e.code, "rejected: {}", e.message);
    }
    Report::from_result(result)
}

/// Reject NaN and infinite results before they reach a report
pub fn ensure_finite(name: &str, value: f64) -> Result<f64, StatsError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(StatsError::domain_error(format!("{} is not a finite number", name)))
    }
}

/// Require minimum count
pub fn require_min_count(values: &[f64], min: usize, what: &str) -> Result<(), StatsError> {
    if values.len() < min {
        return Err(StatsError::domain_error(format!(
            "{} requires at least {} values, got {}",
            what,
            min,
            values.len()
        )));
    }
    Ok(())
}

/// Calculate sum of values
pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Calculate mean of a non-empty slice
pub fn mean(values: &[f64]) -> f64 {
    sum(values) / values.len() as f64
}

/// Population variance (divisor n) of a non-empty slice
pub fn variance(values: &[f64]) -> f64 {
    let m = mean(values);
    let ss: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    ss / values.len() as f64
}

/// Sum of squared deviations from the mean
pub fn sum_squares(values: &[f64], center: f64) -> f64 {
    values.iter().map(|x| (x - center).powi(2)).sum()
}

/// Sort values (returns new sorted vector)
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Median of already sorted, non-empty values
pub fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}
