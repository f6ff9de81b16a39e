//! Calculation Registry

use crate::{Calculation, CalculationMeta, Inputs};
use statcalc_core::Report;
use serde_json::{json, Value as JsonValue};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised by registry lookups (not by calculations themselves)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Unknown calculation: {name}{}", similar_hint(.similar))]
    Unknown { name: String, similar: Vec<String> },
}

fn similar_hint(similar: &[String]) -> String {
    if similar.is_empty() {
        String::new()
    } else {
        format!(" (similar: {})", similar.join(", "))
    }
}

/// Central calculation registry
pub struct CalculationRegistry {
    calculations: HashMap<String, Arc<dyn Calculation>>,
}

impl CalculationRegistry {
    pub fn new() -> Self {
        Self {
            calculations: HashMap::new(),
        }
    }

    pub fn with_calculation<C: Calculation + 'static>(mut self, c: C) -> Self {
        let name = c.meta().name.to_lowercase();
        self.calculations.insert(name, Arc::new(c));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Calculation> {
        self.calculations.get(&name.to_lowercase()).map(|c| c.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.calculations.contains_key(&name.to_lowercase())
    }

    /// Registered names in alphabetical order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.calculations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Metadata of every calculation, sorted by name
    pub fn metas(&self) -> Vec<CalculationMeta> {
        let mut metas: Vec<CalculationMeta> = self.calculations.values().map(|c| c.meta()).collect();
        metas.sort_by(|a, b| a.name.cmp(b.name));
        metas
    }

    pub fn call(&self, name: &str, inputs: &Inputs) -> Result<Report, RegistryError> {
        let calc = self.get(name).ok_or_else(|| RegistryError::Unknown {
            name: name.to_string(),
            similar: self.find_similar(name).into_iter().take(5).collect(),
        })?;

        let report = calc.call(inputs);
        debug!(calculation = name, kind = report.kind(), "calculation evaluated");
        Ok(report)
    }

    /// Find calculation names similar to the given name (for error suggestions)
    fn find_similar(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self
            .calculations
            .keys()
            .filter_map(|candidate| {
                let score = Self::similarity_score(&name_lower, candidate);
                if score > 0 {
                    Some((candidate.clone(), score))
                } else {
                    None
                }
            })
            .collect();

        // Higher score first, then alphabetical for a stable order
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        // Require real overlap, a single shared letter is noise
        if common >= query_chars.len().min(3) && common > 0 {
            score += common * 2;
        }

        let len_diff = query.len().abs_diff(candidate.len());
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }

    pub fn help(&self, name: Option<&str>) -> Result<JsonValue, RegistryError> {
        match name {
            Some(n) => self.help_for(n),
            None => Ok(self.general_help()),
        }
    }

    fn help_for(&self, name: &str) -> Result<JsonValue, RegistryError> {
        let calc = self.get(name).ok_or_else(|| RegistryError::Unknown {
            name: name.to_string(),
            similar: self.find_similar(name).into_iter().take(5).collect(),
        })?;
        let meta = calc.meta();
        Ok(json!({
            "name": meta.name,
            "title": meta.title,
            "type": "calculation",
            "description": meta.description,
            "usage": meta.usage,
            "returns": meta.returns,
            "category": meta.category,
            "fields": meta.fields,
            "examples": meta.examples,
            "related": meta.related,
        }))
    }

    fn general_help(&self) -> JsonValue {
        let mut by_category: HashMap<&str, Vec<&str>> = HashMap::new();
        for meta in self.metas() {
            by_category.entry(meta.category).or_default().push(meta.name);
        }
        json!({
            "calculations": by_category,
            "separators": {
                "values": statcalc_core::VALUE_SEPARATOR.to_string(),
                "groups": statcalc_core::GROUP_SEPARATOR.to_string(),
                "decimal_point": ".",
            },
            "usage": "Call help with a calculation name for detailed help.",
        })
    }

    pub fn list(&self, category: Option<&str>) -> Vec<CalculationMeta> {
        self.metas()
            .into_iter()
            .filter(|m| category.map_or(true, |c| m.category == c))
            .collect()
    }
}

impl Default for CalculationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
