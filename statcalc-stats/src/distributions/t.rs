//! Student's t distribution

use super::special::regularized_incomplete_beta;

/// Student's t CDF with `df` degrees of freedom
pub fn t_cdf(x: f64, df: f64) -> f64 {
    let p = df / (df + x * x);
    let tail = 0.5 * regularized_incomplete_beta(df / 2.0, 0.5, p);

    if x >= 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

/// Two-sided p-value P(|T| >= |t|)
pub fn t_two_sided_p(t: f64, df: f64) -> f64 {
    if t.is_infinite() {
        return 0.0;
    }
    regularized_incomplete_beta(df / 2.0, 0.5, df / (df + t * t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_t_cdf_zero() {
        assert!((t_cdf(0.0, 10.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_t_cdf_known_quantile() {
        // t_{0.975, 30} = 2.0423
        assert!((t_cdf(2.0423, 30.0) - 0.975).abs() < 1e-4);
    }

    #[test]
    fn test_t_cdf_symmetry() {
        let upper = t_cdf(1.3, 7.0);
        let lower = t_cdf(-1.3, 7.0);
        assert!((upper + lower - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_two_sided_p() {
        assert!((t_two_sided_p(0.0, 5.0) - 1.0).abs() < 1e-12);
        assert!((t_two_sided_p(2.0423, 30.0) - 0.05).abs() < 1e-3);
        assert_eq!(t_two_sided_p(f64::INFINITY, 5.0), 0.0);
    }
}
