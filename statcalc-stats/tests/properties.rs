//! Behavioral properties of the statistics calculations

use proptest::prelude::*;
use statcalc_core::{Mode, Report};
use statcalc_plugin::Inputs;
use statcalc_stats::{anova, bayes, binomial, descriptive, linear_regression, poisson, stats_registry};

fn join(values: &[f64]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

/// Every number a success report carries
fn report_numbers(report: &Report) -> Vec<f64> {
    match report {
        Report::Descriptive(s) => {
            let mut v = vec![s.mean, s.median, s.min, s.max, s.range, s.variance, s.std_dev];
            if let Mode::Values(modes) = &s.mode {
                v.extend(modes);
            }
            v
        }
        Report::Regression(r) => {
            let mut v = vec![r.slope, r.intercept, r.r, r.r_squared, r.p_value, r.std_err];
            v.extend(r.fitted.iter().flat_map(|p| [p.x, p.y]));
            v
        }
        Report::Bayes(b) => {
            vec![b.p_a, b.p_b_given_a, b.p_b_given_not_a, b.p_not_a, b.p_b, b.p_a_given_b]
        }
        Report::Binomial(b) => vec![b.p, b.probability],
        Report::Poisson(p) => vec![p.lambda, p.probability],
        Report::Anova(t) => {
            let mut v = vec![
                t.ss_between,
                t.ss_within,
                t.ms_between,
                t.ms_within,
                t.f_statistic,
                t.p_value,
            ];
            v.extend(&t.group_means);
            v
        }
        Report::Error(_) => Vec::new(),
    }
}

fn all_finite(report: &Report) -> bool {
    report_numbers(report).iter().all(|v| v.is_finite())
}

fn assert_domain_error(report: Report) {
    let err = report.as_error().unwrap_or_else(|| panic!("expected an error, got {}", report));
    assert!(err.is_domain(), "expected a domain error, got {}", err);
}

#[test]
fn modes_of_ties_and_unique_values() {
    match descriptive("1,1,2,2,3") {
        Report::Descriptive(s) => assert_eq!(s.mode, Mode::Values(vec![1.0, 2.0])),
        other => panic!("unexpected report: {}", other),
    }
    match descriptive("1,2,3") {
        Report::Descriptive(s) => assert_eq!(s.mode, Mode::None),
        other => panic!("unexpected report: {}", other),
    }
}

#[test]
fn regression_on_a_straight_line() {
    match linear_regression("1,2,3,4", "2,4,6,8") {
        Report::Regression(fit) => {
            assert!((fit.slope - 2.0).abs() < 1e-12);
            assert!(fit.intercept.abs() < 1e-12);
            assert!((fit.r_squared - 1.0).abs() < 1e-12);
        }
        other => panic!("unexpected report: {}", other),
    }
}

#[test]
fn bayes_with_even_odds() {
    match bayes("0.5", "0.5", "0.5") {
        Report::Bayes(steps) => {
            assert!((steps.p_b - 0.5).abs() < 1e-12);
            assert!((steps.p_a_given_b - 0.5).abs() < 1e-12);
        }
        other => panic!("unexpected report: {}", other),
    }
}

#[test]
fn point_probabilities() {
    match binomial("10", "0.5", "5") {
        Report::Binomial(b) => assert!((b.probability - 0.246094).abs() < 1e-6),
        other => panic!("unexpected report: {}", other),
    }
    match poisson("3", "3") {
        Report::Poisson(p) => assert!((p.probability - 0.224042).abs() < 1e-6),
        other => panic!("unexpected report: {}", other),
    }
}

#[test]
fn anova_of_identical_groups() {
    match anova("1,2,3;1,2,3") {
        Report::Anova(t) => {
            assert_eq!(t.f_statistic, 0.0);
            assert_eq!(t.p_value, 1.0);
        }
        other => panic!("unexpected report: {}", other),
    }
}

#[test]
fn point_probabilities_for_huge_arguments() {
    // Normal approximation at the mode, exact to far more than 6 digits here
    match binomial("10000000000", "0.5", "5000000000") {
        Report::Binomial(b) => {
            let expected = 7.978845607829183e-6;
            assert!(((b.probability - expected) / expected).abs() < 1e-9, "{}", b.probability);
        }
        other => panic!("unexpected report: {}", other),
    }
    match poisson("1e13", "10000000000000") {
        Report::Poisson(p) => {
            let expected = 1.2615662610100696e-7;
            assert!(((p.probability - expected) / expected).abs() < 1e-9, "{}", p.probability);
        }
        other => panic!("unexpected report: {}", other),
    }
}

#[test]
fn invalid_preconditions_are_domain_errors() {
    assert_domain_error(binomial("5", "0.5", "6"));
    assert_domain_error(bayes("0.4", "0", "0"));
    assert_domain_error(anova("1,2,3"));
    assert_domain_error(poisson("0", "2"));
    assert_domain_error(descriptive(""));
}

#[test]
fn registry_resolves_every_calculation() {
    let registry = stats_registry();
    for name in ["descriptive", "linear_regression", "bayes", "binomial", "poisson", "anova"] {
        assert!(registry.contains(name), "{} is not registered", name);
    }
    let err = registry.call("regression", &Inputs::new()).unwrap_err();
    assert!(err.to_string().contains("linear_regression"));
}

#[test]
fn reports_serialize_with_kind_tag() {
    let json = serde_json::to_value(poisson("3", "3")).unwrap();
    assert_eq!(json["kind"], "poisson");
    assert_eq!(json["result"]["k"], 3);

    let json = serde_json::to_value(binomial("5", "0.5", "9")).unwrap();
    assert_eq!(json["kind"], "error");
    assert_eq!(json["result"]["code"], "DOMAIN_ERROR");
}

proptest! {
    /// Property: population variance is never negative and sd is its root
    #[test]
    fn variance_non_negative(values in prop::collection::vec(-1.0e6f64..1.0e6, 1..60)) {
        match descriptive(&join(&values)) {
            Report::Descriptive(s) => {
                prop_assert!(s.variance >= 0.0);
                prop_assert_eq!(s.std_dev, s.variance.sqrt());
                prop_assert_eq!(s.count, values.len());
            }
            other => prop_assert!(false, "unexpected report: {}", other),
        }
    }

    /// Property: median does not depend on input order
    #[test]
    fn median_invariant_under_reversal(values in prop::collection::vec(-1.0e6f64..1.0e6, 1..60)) {
        let mut reversed = values.clone();
        reversed.reverse();
        let forward = descriptive(&join(&values));
        let backward = descriptive(&join(&reversed));
        match (forward, backward) {
            (Report::Descriptive(a), Report::Descriptive(b)) => prop_assert_eq!(a.median, b.median),
            (a, b) => prop_assert!(false, "unexpected reports: {} / {}", a, b),
        }
    }

    /// Property: evaluation is deterministic
    #[test]
    fn evaluation_is_idempotent(
        x in prop::collection::vec(-1.0e3f64..1.0e3, 3..30),
        noise in prop::collection::vec(-1.0f64..1.0, 3..30),
    ) {
        let y: Vec<f64> = x.iter().zip(noise.iter().cycle()).map(|(a, e)| 2.0 * a + e).collect();
        let (x, y) = (join(&x), join(&y));
        prop_assert_eq!(linear_regression(&x, &y), linear_regression(&x, &y));
        prop_assert_eq!(descriptive(&x).to_string(), descriptive(&x).to_string());
    }

    /// Property: arbitrary text never panics and never yields NaN
    #[test]
    fn arbitrary_text_never_panics(text in "[0-9.,; a-z-]{0,40}") {
        for report in [descriptive(&text), anova(&text), linear_regression(&text, &text)] {
            prop_assert!(all_finite(&report), "non-finite value in {:?}", report);
        }
    }

    /// Property: regression and ANOVA over real samples report only finite numbers
    #[test]
    fn numeric_reports_are_finite(
        x in prop::collection::vec(-1.0e6f64..1.0e6, 1..40),
        y in prop::collection::vec(-1.0e6f64..1.0e6, 1..40),
        split in 1usize..39,
    ) {
        let n = x.len().min(y.len());
        let (xs, ys) = (join(&x[..n]), join(&y[..n]));
        let cut = split.min(y.len());
        let groups = format!("{}; {}; {}", join(&x), join(&y[..cut]), join(&y[cut..]));

        for report in [linear_regression(&xs, &ys), anova(&groups), descriptive(&xs)] {
            prop_assert!(all_finite(&report), "non-finite value in {:?}", report);
            if let Report::Regression(fit) = &report {
                prop_assert!((0.0..=1.0).contains(&fit.p_value));
                prop_assert!((0.0..=1.0).contains(&fit.r_squared));
            }
            if let Report::Anova(table) = &report {
                prop_assert!((0.0..=1.0).contains(&table.p_value));
                prop_assert!(table.f_statistic >= 0.0);
            }
        }
    }

    /// Property: Bayes and Poisson results are finite probabilities
    #[test]
    fn probability_reports_are_finite(
        p_a in 0.0f64..=1.0,
        p_b_given_a in 0.0f64..=1.0,
        p_b_given_not_a in 0.0f64..=1.0,
        lambda in 1.0e-3f64..1.0e9,
        k in 0u64..1_000_000_000,
    ) {
        let posterior = bayes(
            &p_a.to_string(),
            &p_b_given_a.to_string(),
            &p_b_given_not_a.to_string(),
        );
        prop_assert!(all_finite(&posterior));
        if let Report::Bayes(b) = &posterior {
            prop_assert!((0.0..=1.0).contains(&b.p_a_given_b));
        }

        match poisson(&lambda.to_string(), &k.to_string()) {
            Report::Poisson(p) => prop_assert!((0.0..=1.0).contains(&p.probability)),
            other => prop_assert!(false, "unexpected report: {}", other),
        }
    }

    /// Property: binomial probabilities stay in [0, 1]
    #[test]
    fn binomial_is_a_probability(n in 1u64..200, p in 0.0f64..=1.0, k_frac in 0.0f64..=1.0) {
        let k = (n as f64 * k_frac).floor() as u64;
        match binomial(&n.to_string(), &p.to_string(), &k.to_string()) {
            Report::Binomial(b) => prop_assert!((0.0..=1.0).contains(&b.probability)),
            other => prop_assert!(false, "unexpected report: {}", other),
        }
    }
}
