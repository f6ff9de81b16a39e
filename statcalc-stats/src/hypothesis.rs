//! One-way analysis of variance

use statcalc_core::{AnovaTable, SIGNIFICANCE_LEVEL};
use statcalc_plugin::prelude::*;
use crate::distributions::f_sf;
use crate::helpers::{ensure_finite, finish, mean, sum_squares};

/// One-way ANOVA over semicolon-separated groups
pub fn anova(groups: &str) -> Report {
    let result = GroupedSamples::parse(groups)
        .map_err(|e| StatsError::from(e).in_field("groups"))
        .and_then(|grouped| anova_table(&grouped));
    finish("anova", result)
}

/// Build the ANOVA table for already parsed groups
pub fn anova_table(grouped: &GroupedSamples) -> Result<AnovaTable, StatsError> {
    let groups = grouped.groups();

    if groups.len() < 2 {
        return Err(StatsError::domain_error(format!(
            "ANOVA requires at least 2 groups, got {}",
            groups.len()
        ))
        .in_field("groups")
        .with_suggestion("Separate groups with ';', e.g. 1, 2, 3; 4, 5, 6"));
    }

    if let Some(i) = groups.iter().position(|g| g.is_empty()) {
        return Err(StatsError::domain_error(format!("group {} has no values", i + 1))
            .in_field("groups"));
    }

    let k = groups.len();
    let total_n = grouped.total_len();
    if total_n <= k {
        return Err(StatsError::domain_error(
            "ANOVA requires more observations than groups",
        )
        .in_field("groups"));
    }

    // Calculate grand mean
    let total_sum: f64 = groups.iter().flat_map(|g| g.values()).sum();
    let grand_mean = total_sum / total_n as f64;

    // Calculate SS_between and SS_within
    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    let mut group_means = Vec::with_capacity(k);

    for group in groups {
        let values = group.values();
        let group_mean = mean(values);

        ss_between += values.len() as f64 * (group_mean - grand_mean).powi(2);
        ss_within += sum_squares(values, group_mean);
        group_means.push(group_mean);
    }

    let df_between = k - 1;
    let df_within = total_n - k;

    let ms_between = ss_between / df_between as f64;
    let ms_within = ss_within / df_within as f64;

    if ms_within <= 0.0 {
        return Err(StatsError::domain_error(
            "ANOVA requires non-zero within-group variance",
        )
        .in_field("groups"));
    }

    let f_statistic = ensure_finite("F-statistic", ms_between / ms_within)?;
    let p_value = ensure_finite(
        "p-value",
        f_sf(f_statistic, df_between as f64, df_within as f64),
    )?
    .clamp(0.0, 1.0);

    Ok(AnovaTable {
        groups: k,
        observations: total_n,
        group_means,
        ss_between,
        ss_within,
        df_between,
        df_within,
        ms_between,
        ms_within,
        f_statistic,
        p_value,
        significant: p_value < SIGNIFICANCE_LEVEL,
    })
}

pub struct Anova;

static ANOVA_FIELDS: [FieldMeta; 1] = [FieldMeta::new(
    "groups",
    "List<List<Number>>",
    "Two or more groups: values separated by ',', groups by ';'",
    "1, 2, 3; 4, 5, 6; 7, 8, 9",
)];

static ANOVA_EXAMPLES: [&str; 2] = [
    "anova(groups=\"1, 2, 3; 4, 5, 6; 7, 8, 9\") → F = 27.0000",
    "anova(groups=\"1, 2, 3; 1, 2, 3\") → F = 0.0000, p = 1.0000",
];

static ANOVA_RELATED: [&str; 1] = ["descriptive"];

impl Calculation for Anova {
    fn meta(&self) -> CalculationMeta {
        CalculationMeta {
            name: "anova",
            title: "One-Way ANOVA",
            description: "Compare group means with the F test at α = 0.05",
            usage: "anova(groups)",
            fields: &ANOVA_FIELDS,
            returns: "AnovaTable",
            examples: &ANOVA_EXAMPLES,
            category: "hypothesis",
            related: &ANOVA_RELATED,
        }
    }

    fn call(&self, inputs: &Inputs) -> Report {
        match inputs.require("groups") {
            Ok(groups) => anova(groups),
            Err(e) => Report::Error(e),
        }
    }
}
