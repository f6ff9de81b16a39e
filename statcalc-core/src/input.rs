//! Text input parsing
//!
//! Every operation receives plain text fields. Values inside a field are
//! separated by commas, ANOVA groups by semicolons, and the dot is the
//! decimal point. Empty tokens are skipped; anything else that is not a
//! finite number is rejected.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Separator between values of one sample
pub const VALUE_SEPARATOR: char = ',';

/// Separator between groups of samples
pub const GROUP_SEPARATOR: char = ';';

/// Error type for token-level parsing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("'{token}' is not a valid number (value {position}{})", group_suffix(.group))]
    InvalidNumber {
        token: String,
        position: usize,
        group: Option<usize>,
    },

    #[error("{field}: '{token}' is not a valid number")]
    InvalidScalar { field: String, token: String },

    #[error("{field}: '{token}' is not a valid integer")]
    InvalidInteger { field: String, token: String },
}

fn group_suffix(group: &Option<usize>) -> String {
    match group {
        Some(g) => format!(" of group {}", g),
        None => String::new(),
    }
}

impl InputError {
    /// Input field the error refers to, when known
    pub fn field(&self) -> Option<&str> {
        match self {
            InputError::InvalidNumber { .. } => None,
            InputError::InvalidScalar { field, .. } | InputError::InvalidInteger { field, .. } => {
                Some(field)
            }
        }
    }
}

/// Parse a single finite float. Rejects `inf` and `NaN` spellings.
fn parse_finite(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Ordered sequence of values parsed from a comma-delimited string
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleSet {
    values: Vec<f64>,
}

impl SampleSet {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Parse a comma-delimited list. Blank tokens are dropped.
    pub fn parse(text: &str) -> Result<Self, InputError> {
        Self::parse_in_group(text, None)
    }

    fn parse_in_group(text: &str, group: Option<usize>) -> Result<Self, InputError> {
        let mut values = Vec::new();
        for (i, raw) in text.split(VALUE_SEPARATOR).enumerate() {
            let token = raw.trim();
            if token.is_empty() {
                continue;
            }
            match parse_finite(token) {
                Some(v) => values.push(v),
                None => {
                    return Err(InputError::InvalidNumber {
                        token: token.to_string(),
                        position: i + 1,
                        group,
                    })
                }
            }
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }
}

impl FromStr for SampleSet {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Ordered groups of samples parsed from a semicolon-delimited string
///
/// A trailing separator is tolerated (`"1,2;3,4;"` has two groups). Blank
/// groups elsewhere are kept as empty sets so that callers can reject them
/// with a precise message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedSamples {
    groups: Vec<SampleSet>,
}

impl GroupedSamples {
    pub fn new(groups: Vec<SampleSet>) -> Self {
        Self { groups }
    }

    pub fn parse(text: &str) -> Result<Self, InputError> {
        let mut segments: Vec<&str> = text.split(GROUP_SEPARATOR).collect();
        if segments.last().map_or(false, |s| s.trim().is_empty()) {
            segments.pop();
        }

        let groups = segments
            .iter()
            .enumerate()
            .map(|(i, segment)| SampleSet::parse_in_group(segment, Some(i + 1)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[SampleSet] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of observations across all groups
    pub fn total_len(&self) -> usize {
        self.groups.iter().map(SampleSet::len).sum()
    }
}

impl FromStr for GroupedSamples {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse one scalar field as a finite float
pub fn parse_scalar(field: &str, text: &str) -> Result<f64, InputError> {
    let token = text.trim();
    parse_finite(token).ok_or_else(|| InputError::InvalidScalar {
        field: field.to_string(),
        token: token.to_string(),
    })
}

/// Parse one scalar field as a signed integer
///
/// The sign is accepted so that range checks (e.g. `k >= 0`) can report a
/// domain error rather than a parse error.
pub fn parse_integer(field: &str, text: &str) -> Result<i64, InputError> {
    let token = text.trim();
    token.parse::<i64>().map_err(|_| InputError::InvalidInteger {
        field: field.to_string(),
        token: token.to_string(),
    })
}
