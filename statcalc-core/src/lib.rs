//! statcalc Core - Fundamental types
//!
//! This crate provides the core types used throughout statcalc:
//! - `SampleSet` / `GroupedSamples`: parsed numeric text input
//! - `Report`: structured calculation results and their text rendering
//! - `StatsError`: structured parse and domain errors

mod input;
mod report;
mod error;

pub use input::{
    parse_integer, parse_scalar, GroupedSamples, InputError, SampleSet, GROUP_SEPARATOR,
    VALUE_SEPARATOR,
};
pub use report::{
    AnovaTable, BayesStep, BayesSteps, BinomialProbability, DescriptiveSummary, FittedPoint, Mode,
    PoissonProbability, RegressionFit, Report, SIGNIFICANCE_LEVEL,
};
pub use error::{codes, ErrorKind, StatsError};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{GroupedSamples, Report, SampleSet, StatsError, ErrorKind};
    pub use crate::error::codes;
}
