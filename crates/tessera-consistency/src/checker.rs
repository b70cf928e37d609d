//! Consistency checker: evaluates every conflict rule against a selection.
//! Pure; never mutates the selection.

use std::collections::BTreeSet;

use tessera_core::intent::{Intent, IntentField};
use tessera_core::models::{ConflictRule, Element, Issue, IssueSide, Predicate, RuleTable, SelectionSet};

/// Attribute tokens one field contributes to rule matching.
#[derive(Debug, Clone, Default)]
pub struct FieldTokens<'a> {
    /// Tokens of the intent's own request (the attribute code).
    pub request: Vec<String>,
    /// Tokens of each chosen element, in choice order.
    pub choices: Vec<(&'a Element, Vec<String>)>,
}

impl<'a> FieldTokens<'a> {
    pub fn collect(intent: &Intent, selection: &'a SelectionSet, field: IntentField) -> Self {
        let request = intent
            .request(field)
            .map(|r| r.attribute_tokens())
            .unwrap_or_default();
        let choices = selection
            .get(field)
            .map(|s| s.elements().map(|e| (e, e.attribute_tokens())).collect())
            .unwrap_or_default();
        Self { request, choices }
    }

    /// The side this field contributes when `predicate` matches, if it does.
    pub fn side(&self, predicate: &Predicate) -> Option<IssueSide> {
        let mut matched: BTreeSet<String> = self
            .request
            .iter()
            .filter(|t| predicate.any_of.contains(*t))
            .cloned()
            .collect();
        let from_intent = !matched.is_empty();

        let mut element = None;
        for (candidate, tokens) in &self.choices {
            let hits: Vec<&String> = tokens.iter().filter(|t| predicate.any_of.contains(*t)).collect();
            if hits.is_empty() {
                continue;
            }
            if element.is_none() {
                element = Some(candidate.key.clone());
            }
            matched.extend(hits.into_iter().cloned());
        }

        if matched.is_empty() {
            return None;
        }
        Some(IssueSide {
            field: predicate.field,
            element,
            matched: matched.into_iter().collect(),
            from_intent,
        })
    }
}

/// Evaluates a rule table against selections.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsistencyChecker;

impl ConsistencyChecker {
    pub fn new() -> Self {
        Self
    }

    /// All violations, blocking first, then in rule-table order. A rule fires
    /// when every one of its predicates matches; it yields one issue per pair
    /// of its fields. Duplicates by `(fieldA, fieldB, rule_id)` are dropped.
    pub fn check(&self, rules: &RuleTable, intent: &Intent, selection: &SelectionSet) -> Vec<Issue> {
        let mut issues = Vec::new();
        let mut seen = BTreeSet::new();

        for rule in rules.rules() {
            let Some(sides) = self.fire(rule, intent, selection) else {
                continue;
            };
            for (i, a) in sides.iter().enumerate() {
                for b in &sides[i + 1..] {
                    let (first, second) = if a.field < b.field {
                        (a.clone(), b.clone())
                    } else {
                        (b.clone(), a.clone())
                    };
                    let issue = Issue {
                        rule_id: rule.id.clone(),
                        severity: rule.severity,
                        description: rule.description.clone(),
                        first,
                        second,
                        yields: rule.yields,
                    };
                    let key = (issue.first.field, issue.second.field, issue.rule_id.clone());
                    if seen.insert(key) {
                        issues.push(issue);
                    }
                }
            }
        }

        // Stable: rule order survives within a severity.
        issues.sort_by(|a, b| b.severity.cmp(&a.severity));
        issues
    }

    /// One side per predicate when all of them match.
    fn fire(&self, rule: &ConflictRule, intent: &Intent, selection: &SelectionSet) -> Option<Vec<IssueSide>> {
        rule.when
            .iter()
            .map(|p| FieldTokens::collect(intent, selection, p.field).side(p))
            .collect()
    }

    /// Whether adding `element` to `field` would make any rule fire through it,
    /// given every other field's current tokens.
    pub fn clashes(
        &self,
        rules: &RuleTable,
        intent: &Intent,
        selection: &SelectionSet,
        field: IntentField,
        element: &Element,
    ) -> Option<String> {
        let tokens = element.attribute_tokens();
        rules
            .rules()
            .iter()
            .filter(|rule| rule.predicate(field).is_some_and(|p| p.matches(&tokens)))
            .find(|rule| {
                rule.when
                    .iter()
                    .filter(|p| p.field != field)
                    .all(|p| FieldTokens::collect(intent, selection, p.field).side(p).is_some())
            })
            .map(|rule| rule.id.clone())
    }
}
