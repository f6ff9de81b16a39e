//! Distributions: Student's t, F, binomial, Poisson

pub mod special;
pub mod t;
pub mod f;
mod discrete;

pub use special::{bd0, gamma_ln, ln_factorial, regularized_incomplete_beta, stirlerr};
pub use t::{t_cdf, t_two_sided_p};
pub use f::{f_cdf, f_sf};
pub use discrete::{binom_pmf, binomial, poisson, poisson_pmf, Binomial, Poisson};
