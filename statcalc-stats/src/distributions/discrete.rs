//! Discrete distribution functions: binomial, Poisson

use statcalc_core::{parse_integer, parse_scalar, BinomialProbability, PoissonProbability};
use statcalc_plugin::prelude::*;
use super::special::{bd0, stirlerr};
use std::f64::consts::PI;
use crate::helpers::{ensure_finite, finish, require_fields};

/// P(X = k) for X ~ Binomial(n, p), with 0 <= k <= n and 0 <= p <= 1
///
/// Saddle-point form (Loader, 2000): the large terms of ln C(n, k) cancel
/// inside `stirlerr` and `bd0`, so precision holds for very large n.
pub fn binom_pmf(n: u64, p: f64, k: u64) -> f64 {
    // Edge cases are exact: the log form would hit ln(0)
    if p == 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    if p == 1.0 {
        return if k == n { 1.0 } else { 0.0 };
    }

    let q = 1.0 - p;
    let nf = n as f64;

    if k == 0 {
        let lc = if p < 0.1 { -bd0(nf, nf * q) - nf * p } else { nf * q.ln() };
        return lc.exp();
    }
    if k == n {
        let lc = if q < 0.1 { -bd0(nf, nf * p) - nf * q } else { nf * p.ln() };
        return lc.exp();
    }

    let kf = k as f64;
    let lc = stirlerr(n) - stirlerr(k) - stirlerr(n - k)
        - bd0(kf, nf * p)
        - bd0((n - k) as f64, nf * q);
    // ln(2π k (n - k) / n)
    let lf = (2.0 * PI).ln() + kf.ln() + (-kf / nf).ln_1p();
    (lc - 0.5 * lf).exp()
}

/// P(X = k) for X ~ Poisson(lambda), lambda > 0
pub fn poisson_pmf(lambda: f64, k: u64) -> f64 {
    if k == 0 {
        return (-lambda).exp();
    }
    let kf = k as f64;
    (-stirlerr(k) - bd0(kf, lambda)).exp() / (2.0 * PI * kf).sqrt()
}

// ============ Binomial ============

/// Binomial point probability from text fields
pub fn binomial(n: &str, p: &str, k: &str) -> Report {
    finish("binomial", binomial_probability(n, p, k))
}

fn binomial_probability(n: &str, p: &str, k: &str) -> Result<BinomialProbability, StatsError> {
    let n = parse_integer("n", n)?;
    let p = parse_scalar("p", p)?;
    let k = parse_integer("k", k)?;

    if n <= 0 {
        return Err(StatsError::domain_error(format!(
            "number of trials n must be a positive integer, got {}",
            n
        ))
        .in_field("n"));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(StatsError::probability_range("p", p));
    }
    if k < 0 || k > n {
        return Err(StatsError::domain_error(format!(
            "number of successes k must be between 0 and n ({}), got {}",
            n, k
        ))
        .in_field("k")
        .with_suggestion("k cannot exceed the number of trials"));
    }

    let (n, k) = (n as u64, k as u64);
    let probability = ensure_finite("P(X = k)", binom_pmf(n, p, k))?;
    Ok(BinomialProbability { n, p, k, probability })
}

pub struct Binomial;

static BINOMIAL_FIELDS: [FieldMeta; 3] = [
    FieldMeta::new("n", "Integer", "Number of trials (n > 0)", "10"),
    FieldMeta::new("p", "Number", "Probability of success (0 ≤ p ≤ 1)", "0.5"),
    FieldMeta::new("k", "Integer", "Number of successes (0 ≤ k ≤ n)", "5"),
];

static BINOMIAL_EXAMPLES: [&str; 2] = [
    "binomial(n=10, p=0.5, k=5) → P(X = k) = 0.246094",
    "binomial(n=3, p=0, k=0) → P(X = k) = 1.000000",
];

static BINOMIAL_RELATED: [&str; 1] = ["poisson"];

impl Calculation for Binomial {
    fn meta(&self) -> CalculationMeta {
        CalculationMeta {
            name: "binomial",
            title: "Binomial Distribution",
            description: "Probability of exactly k successes in n independent trials",
            usage: "binomial(n, p, k)",
            fields: &BINOMIAL_FIELDS,
            returns: "BinomialProbability",
            examples: &BINOMIAL_EXAMPLES,
            category: "distribution",
            related: &BINOMIAL_RELATED,
        }
    }

    fn call(&self, inputs: &Inputs) -> Report {
        match require_fields(inputs, ["n", "p", "k"]) {
            Ok([n, p, k]) => binomial(n, p, k),
            Err(e) => Report::Error(e),
        }
    }
}

// ============ Poisson ============

/// Poisson point probability from text fields
pub fn poisson(lambda: &str, k: &str) -> Report {
    finish("poisson", poisson_probability(lambda, k))
}

fn poisson_probability(lambda: &str, k: &str) -> Result<PoissonProbability, StatsError> {
    let lambda = parse_scalar("lambda", lambda)?;
    let k = parse_integer("k", k)?;

    if lambda <= 0.0 {
        return Err(StatsError::domain_error(format!(
            "mean rate λ must be greater than 0, got {}",
            lambda
        ))
        .in_field("lambda"));
    }
    if k < 0 {
        return Err(StatsError::domain_error(format!(
            "number of events k must be a non-negative integer, got {}",
            k
        ))
        .in_field("k"));
    }

    let k = k as u64;
    let probability = ensure_finite("P(X = k)", poisson_pmf(lambda, k))?;
    Ok(PoissonProbability { lambda, k, probability })
}

pub struct Poisson;

static POISSON_FIELDS: [FieldMeta; 2] = [
    FieldMeta::new("lambda", "Number", "Mean rate of events (λ > 0)", "3"),
    FieldMeta::new("k", "Integer", "Number of events (k ≥ 0)", "3"),
];

static POISSON_EXAMPLES: [&str; 1] = ["poisson(lambda=3, k=3) → P(X = k) = 0.224042"];

static POISSON_RELATED: [&str; 1] = ["binomial"];

impl Calculation for Poisson {
    fn meta(&self) -> CalculationMeta {
        CalculationMeta {
            name: "poisson",
            title: "Poisson Distribution",
            description: "Probability of exactly k events given a mean rate λ",
            usage: "poisson(lambda, k)",
            fields: &POISSON_FIELDS,
            returns: "PoissonProbability",
            examples: &POISSON_EXAMPLES,
            category: "distribution",
            related: &POISSON_RELATED,
        }
    }

    fn call(&self, inputs: &Inputs) -> Report {
        match require_fields(inputs, ["lambda", "k"]) {
            Ok([lambda, k]) => poisson(lambda, k),
            Err(e) => Report::Error(e),
        }
    }
}
