//! Plugin traits

use statcalc_core::Report;
use crate::Inputs;
use serde::Serialize;

/// Metadata about one text input field
#[derive(Debug, Clone, Serialize)]
pub struct FieldMeta {
    pub name: &'static str,
    pub typ: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

impl FieldMeta {
    pub const fn new(
        name: &'static str,
        typ: &'static str,
        description: &'static str,
        example: &'static str,
    ) -> Self {
        Self { name, typ, description, example }
    }
}

/// Metadata for a calculation plugin
#[derive(Debug, Clone, Serialize)]
pub struct CalculationMeta {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub fields: &'static [FieldMeta],
    pub returns: &'static str,
    pub examples: &'static [&'static str],
    pub category: &'static str,
    pub related: &'static [&'static str],
}

/// Pure calculation over named text fields
pub trait Calculation: Send + Sync {
    fn meta(&self) -> CalculationMeta;
    fn call(&self, inputs: &Inputs) -> Report;
}
