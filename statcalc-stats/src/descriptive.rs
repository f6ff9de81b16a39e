//! Descriptive statistics: count, mean, median, mode, range, variance

use statcalc_core::{DescriptiveSummary, Mode};
use statcalc_plugin::prelude::*;
use crate::helpers::{ensure_finite, finish, mean, median_sorted, sorted, variance};

/// Descriptive statistics of a comma-separated sample
pub fn descriptive(data: &str) -> Report {
    let result = SampleSet::parse(data)
        .map_err(StatsError::from)
        .and_then(|sample| summarize(&sample));
    finish("descriptive", result)
}

/// Summarize an already parsed sample
pub fn summarize(sample: &SampleSet) -> Result<DescriptiveSummary, StatsError> {
    let values = sample.values();
    if values.is_empty() {
        return Err(StatsError::empty_input("Descriptive statistics").in_field("data"));
    }

    let ordered = sorted(values);
    let min = ordered[0];
    let max = ordered[ordered.len() - 1];
    let variance = ensure_finite("variance", variance(values))?;

    Ok(DescriptiveSummary {
        count: values.len(),
        mean: ensure_finite("mean", mean(values))?,
        median: median_sorted(&ordered),
        mode: modes(&ordered),
        min,
        max,
        range: ensure_finite("range", max - min)?,
        variance,
        std_dev: variance.sqrt(),
    })
}

/// Values sharing the highest frequency, from sorted input
fn modes(ordered: &[f64]) -> Mode {
    // Equal values are adjacent once sorted, so count runs
    let mut runs: Vec<(f64, usize)> = Vec::new();
    for &v in ordered {
        match runs.last_mut() {
            Some((last, count)) if *last == v => *count += 1,
            _ => runs.push((v, 1)),
        }
    }

    let max_count = runs.iter().map(|(_, c)| *c).max().unwrap_or(0);
    if max_count < 2 {
        return Mode::None;
    }

    Mode::Values(
        runs.into_iter()
            .filter(|(_, c)| *c == max_count)
            .map(|(v, _)| v)
            .collect(),
    )
}

pub struct Descriptive;

static DESCRIPTIVE_FIELDS: [FieldMeta; 1] = [FieldMeta::new(
    "data",
    "List<Number>",
    "Comma-separated values",
    "10, 15, 20, 20, 25",
)];

static DESCRIPTIVE_EXAMPLES: [&str; 2] = [
    "descriptive(data=\"1, 1, 2, 2, 3\") → mode 1, 2",
    "descriptive(data=\"1, 2, 3\") → no mode",
];

static DESCRIPTIVE_RELATED: [&str; 2] = ["linear_regression", "anova"];

impl Calculation for Descriptive {
    fn meta(&self) -> CalculationMeta {
        CalculationMeta {
            name: "descriptive",
            title: "Descriptive Statistics",
            description: "Count, mean, median, mode, range and population variance/std. deviation",
            usage: "descriptive(data)",
            fields: &DESCRIPTIVE_FIELDS,
            returns: "DescriptiveSummary",
            examples: &DESCRIPTIVE_EXAMPLES,
            category: "descriptive",
            related: &DESCRIPTIVE_RELATED,
        }
    }

    fn call(&self, inputs: &Inputs) -> Report {
        match inputs.require("data") {
            Ok(data) => descriptive(data),
            Err(e) => Report::Error(e),
        }
    }
}
