//! Simple linear regression: ordinary least squares of Y on X

use statcalc_core::{FittedPoint, RegressionFit};
use statcalc_plugin::prelude::*;
use crate::distributions::t_two_sided_p;
use crate::helpers::{ensure_finite, finish, mean, require_fields, require_min_count};

/// Fit Y = a + bX from two comma-separated samples
pub fn linear_regression(x: &str, y: &str) -> Report {
    finish("linear_regression", parse_and_fit(x, y))
}

fn parse_and_fit(x: &str, y: &str) -> Result<RegressionFit, StatsError> {
    let x = SampleSet::parse(x).map_err(|e| StatsError::from(e).in_field("x"))?;
    let y = SampleSet::parse(y).map_err(|e| StatsError::from(e).in_field("y"))?;
    fit(x.values(), y.values())
}

/// Least squares fit over paired values
pub fn fit(x: &[f64], y: &[f64]) -> Result<RegressionFit, StatsError> {
    if x.is_empty() || y.is_empty() {
        return Err(StatsError::empty_input("Linear regression"));
    }
    if x.len() != y.len() {
        return Err(StatsError::domain_error(format!(
            "X and Y must have the same number of values: {} vs {}",
            x.len(),
            y.len()
        ))
        .with_suggestion("Pair every X value with exactly one Y value"));
    }
    require_min_count(x, 3, "Linear regression")?;

    let n = x.len();
    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 {
        return Err(StatsError::domain_error("all X values are identical, the slope is undefined")
            .in_field("x"));
    }

    let slope = ensure_finite("slope", sxy / sxx)?;
    let intercept = ensure_finite("intercept", mean_y - slope * mean_x)?;
    let df = (n - 2) as f64;

    // Constant Y: no linear association to test
    let (r, p_value, std_err) = if syy == 0.0 {
        (0.0, 1.0, 0.0)
    } else {
        let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
        let one_minus_r2 = 1.0 - r * r;
        let p_value = if one_minus_r2 <= 0.0 {
            0.0
        } else {
            t_two_sided_p(r * (df / one_minus_r2).sqrt(), df)
        };
        let ss_res = (one_minus_r2 * syy).max(0.0);
        (r, p_value, (ss_res / df / sxx).sqrt())
    };

    let fitted = x
        .iter()
        .map(|&xi| FittedPoint { x: xi, y: intercept + slope * xi })
        .collect();

    Ok(RegressionFit {
        n,
        slope,
        intercept,
        r,
        r_squared: r * r,
        p_value: ensure_finite("p-value", p_value)?.clamp(0.0, 1.0),
        std_err: ensure_finite("standard error", std_err)?,
        fitted,
    })
}

pub struct LinearRegression;

static LINREG_FIELDS: [FieldMeta; 2] = [
    FieldMeta::new("x", "List<Number>", "Independent variable (X), comma-separated", "1, 2, 3, 4"),
    FieldMeta::new("y", "List<Number>", "Dependent variable (Y), comma-separated", "2, 4, 6, 8"),
];

static LINREG_EXAMPLES: [&str; 1] = [
    "linear_regression(x=\"1, 2, 3, 4\", y=\"2, 4, 6, 8\") → Y = 0.0000 + 2.0000X, R² = 1",
];

static LINREG_RELATED: [&str; 1] = ["descriptive"];

impl Calculation for LinearRegression {
    fn meta(&self) -> CalculationMeta {
        CalculationMeta {
            name: "linear_regression",
            title: "Simple Linear Regression",
            description: "Least squares line with r, R², slope p-value and standard error",
            usage: "linear_regression(x, y)",
            fields: &LINREG_FIELDS,
            returns: "RegressionFit",
            examples: &LINREG_EXAMPLES,
            category: "regression",
            related: &LINREG_RELATED,
        }
    }

    fn call(&self, inputs: &Inputs) -> Report {
        match require_fields(inputs, ["x", "y"]) {
            Ok([x, y]) => linear_regression(x, y),
            Err(e) => Report::Error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted(x: &str, y: &str) -> RegressionFit {
        match linear_regression(x, y) {
            Report::Regression(r) => r,
            other => panic!("expected regression, got {}", other),
        }
    }

    #[test]
    fn test_perfect_fit() {
        let r = fitted("1, 2, 3, 4", "2, 4, 6, 8");
        assert!((r.slope - 2.0).abs() < 1e-12);
        assert!(r.intercept.abs() < 1e-12);
        assert!((r.r_squared - 1.0).abs() < 1e-12);
        assert_eq!(r.p_value, 0.0);
        assert!(r.std_err.abs() < 1e-12);
    }

    #[test]
    fn test_noisy_fit() {
        let r = fitted("1, 2, 3, 4, 5", "2, 4, 5, 4, 5");
        assert!((r.slope - 0.6).abs() < 1e-12);
        assert!((r.intercept - 2.2).abs() < 1e-12);
        assert!((r.r_squared - 0.6).abs() < 1e-12);
        // scipy.stats.linregress: p = 0.1240, stderr = 0.2828
        assert!((r.p_value - 0.1240).abs() < 1e-3);
        assert!((r.std_err - 0.282843).abs() < 1e-5);
    }

    #[test]
    fn test_negative_slope() {
        let r = fitted("1, 2, 3", "3, 2, 1.5");
        assert!(r.slope < 0.0);
        assert!(r.r < 0.0);
    }

    #[test]
    fn test_constant_y() {
        let r = fitted("1, 2, 3", "5, 5, 5");
        assert_eq!(r.slope, 0.0);
        assert_eq!(r.r_squared, 0.0);
        assert_eq!(r.p_value, 1.0);
    }

    #[test]
    fn test_fitted_points() {
        let r = fitted("1, 2, 3", "2, 4, 6");
        assert_eq!(r.fitted.len(), 3);
        assert!((r.fitted[2].y - 6.0).abs() < 1e-12);
        assert!((r.predict(10.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_domain_errors() {
        assert!(linear_regression("1, 2", "1, 2").as_error().unwrap().is_domain());
        assert!(linear_regression("1, 2, 3", "1, 2").as_error().unwrap().is_domain());
        assert!(linear_regression("2, 2, 2", "1, 2, 3").as_error().unwrap().is_domain());
        assert!(linear_regression("", "").as_error().unwrap().is_domain());
    }

    #[test]
    fn test_parse_error_names_field() {
        let report = linear_regression("1, 2, 3", "1, two, 3");
        let err = report.as_error().unwrap();
        assert!(err.is_parse());
        assert_eq!(err.field.as_deref(), Some("y"));
    }

    #[test]
    fn test_equation_line() {
        let text = linear_regression("1, 2, 3, 4", "3, 5, 7, 9").to_string();
        assert!(text.contains("Equation: Y = 1.0000 + 2.0000X"));
    }
}
