//! Calculation reports
//!
//! A `Report` is what every operation hands back: one of the structured
//! result records, or the error that prevented computing it. Reports
//! serialize to JSON and render to the multi-line text block shown to users.

use crate::StatsError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Significance level used for the ANOVA interpretation
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

const RULE: &str = "--------------------------------------------------";

/// Result of the mode search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// No value occurs more than once
    None,
    /// Values sharing the highest frequency, ascending
    Values(Vec<f64>),
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::None => write!(f, "No mode (all values are unique)"),
            Mode::Values(values) => {
                let joined: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", joined.join(", "))
            }
        }
    }
}

/// Descriptive statistics of one sample (population moments)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: Mode,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub variance: f64,
    pub std_dev: f64,
}

impl fmt::Display for DescriptiveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Descriptive Statistics Results:")?;
        writeln!(f, "  Count (n): {}", self.count)?;
        writeln!(f, "  Mean: {:.4}", self.mean)?;
        writeln!(f, "  Median: {:.4}", self.median)?;
        writeln!(f, "  Mode: {}", self.mode)?;
        writeln!(f, "  Range: {:.4}", self.range)?;
        writeln!(f, "  Variance (Pop.): {:.4}", self.variance)?;
        write!(f, "  Std. Deviation (Pop.): {:.4}", self.std_dev)
    }
}

/// A point on the fitted regression line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedPoint {
    pub x: f64,
    pub y: f64,
}

/// Ordinary least squares fit of y on x
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionFit {
    pub n: usize,
    pub slope: f64,
    pub intercept: f64,
    pub r: f64,
    pub r_squared: f64,
    pub p_value: f64,
    pub std_err: f64,
    /// Fitted line evaluated at each input x, for chart rendering
    pub fitted: Vec<FittedPoint>,
}

impl RegressionFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

impl fmt::Display for RegressionFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simple Linear Regression Results:")?;
        writeln!(f, "  Equation: Y = {:.4} + {:.4}X", self.intercept, self.slope)?;
        writeln!(f, "  Slope (b): {:.4}", self.slope)?;
        writeln!(f, "  Intercept (a): {:.4}", self.intercept)?;
        writeln!(f, "  Coefficient of Determination (R²): {:.4}", self.r_squared)?;
        writeln!(f, "  p-value: {:.4}", self.p_value)?;
        write!(f, "  Std. Error of Slope: {:.4}", self.std_err)
    }
}

/// One labeled block of the Bayes audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BayesStep {
    pub title: String,
    pub lines: Vec<String>,
}

impl BayesStep {
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self { title: title.into(), lines }
    }
}

/// Posterior probability with every intermediate value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesSteps {
    pub p_a: f64,
    pub p_b_given_a: f64,
    pub p_b_given_not_a: f64,
    pub p_not_a: f64,
    pub p_b: f64,
    pub p_a_given_b: f64,
    /// Ordered audit trail, numbers fixed to 4 decimals
    pub steps: Vec<BayesStep>,
}

impl fmt::Display for BayesSteps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bayes' Theorem Results:")?;
        for (i, step) in self.steps.iter().enumerate() {
            if i == 0 {
                write!(f, "\n\n{}:", step.title)?;
            } else {
                write!(f, "\n{}\n{}", RULE, step.title)?;
            }
            for line in &step.lines {
                write!(f, "\n{}", line)?;
            }
        }
        Ok(())
    }
}

/// Binomial probability mass at k
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinomialProbability {
    pub n: u64,
    pub p: f64,
    pub k: u64,
    pub probability: f64,
}

impl fmt::Display for BinomialProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Binomial Distribution Results:")?;
        writeln!(f, "  Number of Trials (n): {}", self.n)?;
        writeln!(f, "  Probability of Success (p): {:.4}", self.p)?;
        writeln!(f, "  Number of Successes (k): {}", self.k)?;
        write!(f, "  P(X = {}) = {:.6}", self.k, self.probability)
    }
}

/// Poisson probability mass at k
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoissonProbability {
    pub lambda: f64,
    pub k: u64,
    pub probability: f64,
}

impl fmt::Display for PoissonProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Poisson Distribution Results:")?;
        writeln!(f, "  Mean Rate (λ): {:.4}", self.lambda)?;
        writeln!(f, "  Number of Events (k): {}", self.k)?;
        write!(f, "  P(X = {}) = {:.6}", self.k, self.probability)
    }
}

/// One-way analysis of variance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaTable {
    pub groups: usize,
    pub observations: usize,
    pub group_means: Vec<f64>,
    pub ss_between: f64,
    pub ss_within: f64,
    pub df_between: usize,
    pub df_within: usize,
    pub ms_between: f64,
    pub ms_within: f64,
    pub f_statistic: f64,
    pub p_value: f64,
    /// `p_value < SIGNIFICANCE_LEVEL`
    pub significant: bool,
}

impl AnovaTable {
    pub fn interpretation(&self) -> &'static str {
        if self.significant {
            "p < 0.05: reject the null hypothesis; at least one group mean differs significantly."
        } else {
            "p >= 0.05: fail to reject the null hypothesis; no significant difference between group means."
        }
    }
}

impl fmt::Display for AnovaTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis of Variance (ANOVA) Results:")?;
        writeln!(f, "  Number of Groups: {}", self.groups)?;
        writeln!(f, "  Total Observations (N): {}", self.observations)?;
        writeln!(
            f,
            "  Between Groups: SS = {:.4}, df = {}, MS = {:.4}",
            self.ss_between, self.df_between, self.ms_between
        )?;
        writeln!(
            f,
            "  Within Groups: SS = {:.4}, df = {}, MS = {:.4}",
            self.ss_within, self.df_within, self.ms_within
        )?;
        writeln!(f, "  F-statistic: {:.4}", self.f_statistic)?;
        writeln!(f, "  p-value: {:.4}", self.p_value)?;
        writeln!(f)?;
        writeln!(f, "  Interpretation (α={}):", SIGNIFICANCE_LEVEL)?;
        write!(f, "   - {}", self.interpretation())
    }
}

/// Outcome of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum Report {
    Descriptive(DescriptiveSummary),
    Regression(RegressionFit),
    Bayes(BayesSteps),
    Binomial(BinomialProbability),
    Poisson(PoissonProbability),
    Anova(AnovaTable),
    Error(StatsError),
}

impl Report {
    /// Fold a computation result into a report
    pub fn from_result<T: Into<Report>>(result: Result<T, StatsError>) -> Self {
        match result {
            Ok(value) => value.into(),
            Err(e) => Report::Error(e),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Report::Error(_))
    }

    pub fn as_error(&self) -> Option<&StatsError> {
        match self {
            Report::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Short name of the report kind
    pub fn kind(&self) -> &'static str {
        match self {
            Report::Descriptive(_) => "descriptive",
            Report::Regression(_) => "regression",
            Report::Bayes(_) => "bayes",
            Report::Binomial(_) => "binomial",
            Report::Poisson(_) => "poisson",
            Report::Anova(_) => "anova",
            Report::Error(_) => "error",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "kind": "error", "result": { "message": e.to_string() } })
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Descriptive(r) => fmt::Display::fmt(r, f),
            Report::Regression(r) => fmt::Display::fmt(r, f),
            Report::Bayes(r) => fmt::Display::fmt(r, f),
            Report::Binomial(r) => fmt::Display::fmt(r, f),
            Report::Poisson(r) => fmt::Display::fmt(r, f),
            Report::Anova(r) => fmt::Display::fmt(r, f),
            Report::Error(e) => write!(f, "Error: {}", e),
        }
    }
}

impl From<StatsError> for Report {
    fn from(err: StatsError) -> Self {
        Report::Error(err)
    }
}

macro_rules! impl_from_record {
    ($($record:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$record> for Report {
                fn from(record: $record) -> Self {
                    Report::$variant(record)
                }
            }
        )*
    };
}

impl_from_record! {
    DescriptiveSummary => Descriptive,
    RegressionFit => Regression,
    BayesSteps => Bayes,
    BinomialProbability => Binomial,
    PoissonProbability => Poisson,
    AnovaTable => Anova,
}
