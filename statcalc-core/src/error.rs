//! Structured errors for calculation reports
//!
//! Errors never escape an operation as panics. They are values carried in
//! a `Report` and give the caller a clear, actionable message.

use crate::InputError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
}

/// The two failure classes of an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A token could not be read as the expected numeric type
    Parse,
    /// Inputs parsed but violate a mathematical precondition
    Domain,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Parse => codes::PARSE_ERROR,
            ErrorKind::Domain => codes::DOMAIN_ERROR,
        }
    }
}

/// Structured error returned in place of a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsError {
    /// Failure class
    pub kind: ErrorKind,

    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Input field the error refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl StatsError {
    /// Create a new error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: kind.code().to_string(),
            message: message.into(),
            field: None,
            suggestion: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: name the offending input field
    pub fn in_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn is_parse(&self) -> bool {
        self.kind == ErrorKind::Parse
    }

    pub fn is_domain(&self) -> bool {
        self.kind == ErrorKind::Domain
    }

    // ========== Common Error Constructors ==========

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, format!("Parse error: {}", details.into()))
            .with_suggestion("Use numbers with a dot as decimal point, separated by commas")
    }

    pub fn domain_error(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::Domain, format!("Domain error: {}", details.into()))
    }

    pub fn missing_field(name: &str) -> Self {
        Self::new(ErrorKind::Parse, format!("Parse error: missing field '{}'", name))
            .in_field(name)
            .with_suggestion(format!("Provide a value for '{}'", name))
    }

    pub fn empty_input(what: &str) -> Self {
        Self::domain_error(format!("{} requires at least one value", what))
            .with_suggestion("Enter comma-separated numbers, e.g. 10, 15, 20")
    }

    pub fn probability_range(name: &str, value: f64) -> Self {
        Self::domain_error(format!("{} must be between 0 and 1, got {}", name, value))
            .in_field(name)
    }
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for StatsError {}

impl From<InputError> for StatsError {
    fn from(err: InputError) -> Self {
        let err_field = err.field().map(str::to_string);
        let converted = Self::parse_error(err.to_string());
        match err_field {
            Some(field) => converted.in_field(field),
            None => converted,
        }
    }
}
