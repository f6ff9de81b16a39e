//! statcalc Statistics Library
//!
//! Six classic statistics and probability calculations over plain text
//! input. Every function validates before computing and returns a `Report`;
//! failures are `Report::Error`, never panics.

mod helpers;
mod descriptive;
mod regression;
mod bayes;
mod distributions;
mod hypothesis;

pub use descriptive::{descriptive, summarize, Descriptive};
pub use regression::{fit, linear_regression, LinearRegression};
pub use bayes::{bayes, posterior, Bayes};
pub use distributions::{
    bd0, binom_pmf, binomial, f_cdf, f_sf, gamma_ln, ln_factorial, poisson, poisson_pmf,
    regularized_incomplete_beta, stirlerr, t_cdf, t_two_sided_p, Binomial, Poisson,
};
pub use hypothesis::{anova, anova_table, Anova};

use statcalc_plugin::CalculationRegistry;

/// Load statistics calculations into registry
pub fn load_stats_library(registry: CalculationRegistry) -> CalculationRegistry {
    registry
        // Descriptive
        .with_calculation(Descriptive)

        // Regression
        .with_calculation(LinearRegression)

        // Probability
        .with_calculation(Bayes)
        .with_calculation(Binomial)
        .with_calculation(Poisson)

        // Hypothesis tests
        .with_calculation(Anova)
}

/// Registry holding every statistics calculation
pub fn stats_registry() -> CalculationRegistry {
    load_stats_library(CalculationRegistry::new())
}
