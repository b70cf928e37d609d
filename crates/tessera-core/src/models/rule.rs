//! Conflict rules: data-driven mutual-exclusion predicates.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Severity;
use crate::errors::RuleError;
use crate::intent::IntentField;

/// Matches a field when any of the field's attribute tokens is in `any_of`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: IntentField,
    pub any_of: BTreeSet<String>,
}

impl Predicate {
    pub fn matches<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        tokens.iter().any(|t| self.any_of.contains(t.as_ref()))
    }
}

/// One row of the rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRule {
    pub id: String,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    /// Field that gives way when this rule fires. Falls back to the dominance
    /// order when absent.
    #[serde(default)]
    pub yields: Option<IntentField>,
    pub when: Vec<Predicate>,
}

impl ConflictRule {
    pub fn predicate(&self, field: IntentField) -> Option<&Predicate> {
        self.when.iter().find(|p| p.field == field)
    }

    pub fn fields(&self) -> impl Iterator<Item = IntentField> + '_ {
        self.when.iter().map(|p| p.field)
    }

    fn validate(&self) -> Result<(), RuleError> {
        if self.when.len() < 2 {
            return Err(RuleError::TooFewPredicates {
                id: self.id.clone(),
                count: self.when.len(),
            });
        }
        let mut seen = BTreeSet::new();
        for p in &self.when {
            if !seen.insert(p.field) {
                return Err(RuleError::DuplicatePredicateField {
                    id: self.id.clone(),
                    field: p.field.name().to_string(),
                });
            }
            if p.any_of.is_empty() {
                return Err(RuleError::EmptyValues {
                    id: self.id.clone(),
                    field: p.field.name().to_string(),
                });
            }
        }
        if let Some(y) = self.yields {
            if !seen.contains(&y) {
                return Err(RuleError::YieldsNotInRule {
                    id: self.id.clone(),
                    field: y.name().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// A validated, versioned, read-only rule table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleTable {
    version: String,
    rules: Vec<ConflictRule>,
}

impl RuleTable {
    /// Validate and build. Predicate values are lowercased and trimmed.
    pub fn new(version: impl Into<String>, rules: Vec<ConflictRule>) -> Result<Self, RuleError> {
        let version = version.into();
        if version.trim().is_empty() {
            return Err(RuleError::MissingVersion);
        }
        let mut ids = BTreeSet::new();
        for rule in &rules {
            if !ids.insert(rule.id.as_str()) {
                return Err(RuleError::DuplicateRuleId {
                    id: rule.id.clone(),
                });
            }
            rule.validate()?;
        }
        let rules = rules
            .into_iter()
            .map(|mut rule| {
                for p in &mut rule.when {
                    p.any_of = p.any_of.iter().map(|v| v.trim().to_lowercase()).collect();
                }
                rule
            })
            .collect();
        Ok(Self { version, rules })
    }

    /// A table with no rules.
    pub fn empty(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            rules: Vec::new(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn rules(&self) -> &[ConflictRule] {
        &self.rules
    }

    pub fn rule(&self, id: &str) -> Option<&ConflictRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
