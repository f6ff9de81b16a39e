//! Bayes' theorem with the law of total probability

use statcalc_core::{parse_scalar, BayesStep, BayesSteps};
use statcalc_plugin::prelude::*;
use crate::helpers::{ensure_finite, finish, require_fields};

/// Posterior P(A|B) from P(A), P(B|A) and P(B|¬A)
pub fn bayes(p_a: &str, p_b_given_a: &str, p_b_given_not_a: &str) -> Report {
    finish("bayes", parse_and_solve(p_a, p_b_given_a, p_b_given_not_a))
}

fn parse_and_solve(p_a: &str, p_b_given_a: &str, p_b_given_not_a: &str) -> Result<BayesSteps, StatsError> {
    let p_a = parse_scalar("p_a", p_a)?;
    let p_b_given_a = parse_scalar("p_b_given_a", p_b_given_a)?;
    let p_b_given_not_a = parse_scalar("p_b_given_not_a", p_b_given_not_a)?;
    posterior(p_a, p_b_given_a, p_b_given_not_a)
}

fn probability(name: &str, value: f64) -> Result<f64, StatsError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(StatsError::probability_range(name, value))
    }
}

/// Solve for the posterior and record each step
pub fn posterior(p_a: f64, p_b_given_a: f64, p_b_given_not_a: f64) -> Result<BayesSteps, StatsError> {
    let p_a = probability("p_a", p_a)?;
    let p_b_given_a = probability("p_b_given_a", p_b_given_a)?;
    let p_b_given_not_a = probability("p_b_given_not_a", p_b_given_not_a)?;

    let p_not_a = 1.0 - p_a;
    let p_b = p_b_given_a * p_a + p_b_given_not_a * p_not_a;
    if p_b == 0.0 {
        return Err(StatsError::domain_error(
            "P(B) is zero, P(A|B) is undefined",
        )
        .with_suggestion("P(B|A) and P(B|¬A) cannot both be zero where they apply"));
    }
    let p_a_given_b = ensure_finite("P(A|B)", p_b_given_a * p_a / p_b)?;

    let steps = vec![
        BayesStep::new(
            "Inputs",
            vec![
                format!("  P(A) = {:.4}", p_a),
                format!("  P(B|A) = {:.4}", p_b_given_a),
                format!("  P(B|¬A) = {:.4}", p_b_given_not_a),
                format!("  (Computed) P(¬A) = 1 - {:.4} = {:.4}", p_a, p_not_a),
            ],
        ),
        BayesStep::new(
            "1. P(B) by the Law of Total Probability:",
            vec![
                "   Formula: P(B) = P(B|A) * P(A) + P(B|¬A) * P(¬A)".to_string(),
                format!(
                    "   Calculation: P(B) = ({:.4} * {:.4}) + ({:.4} * {:.4})",
                    p_b_given_a, p_a, p_b_given_not_a, p_not_a
                ),
                format!("   Result: P(B) = {:.4}", p_b),
            ],
        ),
        BayesStep::new(
            "2. P(A|B) by Bayes' Theorem:",
            vec![
                "   Formula: P(A|B) = [P(B|A) * P(A)] / P(B)".to_string(),
                format!(
                    "   Calculation: P(A|B) = [{:.4} * {:.4}] / {:.4}",
                    p_b_given_a, p_a, p_b
                ),
                String::new(),
                format!("   Final Result: P(A|B) = {:.4}", p_a_given_b),
            ],
        ),
    ];

    Ok(BayesSteps {
        p_a,
        p_b_given_a,
        p_b_given_not_a,
        p_not_a,
        p_b,
        p_a_given_b,
        steps,
    })
}

pub struct Bayes;

static BAYES_FIELDS: [FieldMeta; 3] = [
    FieldMeta::new("p_a", "Number", "Prior probability P(A)", "0.01"),
    FieldMeta::new("p_b_given_a", "Number", "Likelihood P(B|A)", "0.9"),
    FieldMeta::new("p_b_given_not_a", "Number", "False alarm rate P(B|¬A)", "0.05"),
];

static BAYES_EXAMPLES: [&str; 2] = [
    "bayes(p_a=0.5, p_b_given_a=0.5, p_b_given_not_a=0.5) → P(A|B) = 0.5000",
    "bayes(p_a=0.01, p_b_given_a=0.9, p_b_given_not_a=0.05) → P(A|B) = 0.1538",
];

static BAYES_RELATED: [&str; 1] = ["binomial"];

impl Calculation for Bayes {
    fn meta(&self) -> CalculationMeta {
        CalculationMeta {
            name: "bayes",
            title: "Bayes' Theorem",
            description: "Posterior P(A|B) with P(B) from the law of total probability",
            usage: "bayes(p_a, p_b_given_a, p_b_given_not_a)",
            fields: &BAYES_FIELDS,
            returns: "BayesSteps",
            examples: &BAYES_EXAMPLES,
            category: "probability",
            related: &BAYES_RELATED,
        }
    }

    fn call(&self, inputs: &Inputs) -> Report {
        match require_fields(inputs, ["p_a", "p_b_given_a", "p_b_given_not_a"]) {
            Ok([p_a, p_b_given_a, p_b_given_not_a]) => bayes(p_a, p_b_given_a, p_b_given_not_a),
            Err(e) => Report::Error(e),
        }
    }
}
