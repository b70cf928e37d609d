//! Conflict resolver: swaps the subordinate side of each issue for a fresh,
//! compatible element. Each field is resolved at most once per request.

use std::collections::BTreeSet;

use tessera_core::errors::{RepositoryError, TesseraError, TesseraResult};
use tessera_core::intent::{DominanceOrder, Intent, IntentField};
use tessera_core::models::{
    Choice, Issue, NaturalKey, Resolution, RuleTable, SelectionSet, UnresolvedIssue,
    UnresolvedReason,
};
use tessera_core::RequestScope;
use tessera_selection::Selector;
use tracing::{debug, info, warn};

use crate::checker::ConsistencyChecker;

/// Resolver output: the updated selection plus what happened to each issue.
#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    pub selection: SelectionSet,
    pub resolutions: Vec<Resolution>,
    pub unresolved: Vec<UnresolvedIssue>,
}

#[derive(Debug, Clone)]
pub struct ConflictResolver {
    dominance: DominanceOrder,
    requery_limit: usize,
    checker: ConsistencyChecker,
}

enum Replacement {
    Found(Choice),
    Unavailable(UnresolvedReason),
}

impl ConflictResolver {
    pub fn new(dominance: DominanceOrder, requery_limit: usize) -> Self {
        Self {
            dominance,
            requery_limit,
            checker: ConsistencyChecker::new(),
        }
    }

    /// `(dominant, subordinate)` for an issue: the rule's `yields` field gives
    /// way when set, otherwise the dominance order decides.
    pub fn rank(&self, issue: &Issue) -> (IntentField, IntentField) {
        let (a, b) = (issue.first.field, issue.second.field);
        match issue.yields {
            Some(y) if y == a => (b, a),
            Some(y) if y == b => (a, b),
            _ => self.dominance.rank_pair(a, b),
        }
    }

    /// Resolve `issues` against `selection`, re-checking after every round
    /// until no unseen issue remains.
    ///
    /// Timeouts on a replacement query leave the issue unresolved; any other
    /// repository failure aborts the request.
    pub fn resolve(
        &self,
        selector: &Selector,
        rules: &RuleTable,
        intent: &Intent,
        mut selection: SelectionSet,
        issues: Vec<Issue>,
        scope: &RequestScope<'_>,
    ) -> TesseraResult<ResolutionOutcome> {
        let mut resolutions = Vec::new();
        let mut unresolved = Vec::new();
        let mut resolved_fields = BTreeSet::new();
        let mut handled = BTreeSet::new();
        let mut pending = issues;

        loop {
            let fresh: Vec<Issue> = pending
                .into_iter()
                .filter(|i| !handled.contains(&owned_key(i)))
                .collect();
            if fresh.is_empty() {
                break;
            }

            for issue in fresh {
                let key = owned_key(&issue);
                if !handled.insert(key.clone()) {
                    continue;
                }
                // An earlier replacement this round may already have cleared it.
                let still_open = self
                    .checker
                    .check(rules, intent, &selection)
                    .iter()
                    .any(|i| owned_key(i) == key);
                if !still_open {
                    continue;
                }

                let (dominant, subordinate) = self.rank(&issue);
                let side = issue.side(subordinate).cloned();
                let original = side.as_ref().and_then(|s| s.element.clone());

                let outcome = match (&side, original) {
                    (Some(s), _) if s.from_intent => {
                        Replacement::Unavailable(UnresolvedReason::IntentPinned)
                    }
                    (_, None) => Replacement::Unavailable(UnresolvedReason::IntentPinned),
                    _ if resolved_fields.contains(&subordinate) => {
                        Replacement::Unavailable(UnresolvedReason::FieldAlreadyResolved)
                    }
                    (_, Some(original)) => {
                        match self.find_replacement(
                            selector,
                            rules,
                            intent,
                            &selection,
                            subordinate,
                            &original,
                            scope,
                        )? {
                            Replacement::Found(choice) => {
                                let replacement = choice.key().clone();
                                selection.replace_choice(subordinate, &original, choice)?;
                                resolved_fields.insert(subordinate);
                                info!(
                                    request_id = %scope.request_id(),
                                    rule = %issue.rule_id,
                                    field = %subordinate,
                                    original = %original,
                                    replacement = %replacement,
                                    "conflict resolved"
                                );
                                resolutions.push(Resolution {
                                    field: subordinate,
                                    original,
                                    replacement,
                                    rule_id: issue.rule_id.clone(),
                                    reason: format!(
                                        "{}: {subordinate} gives way to {dominant}",
                                        describe(&issue)
                                    ),
                                });
                                continue;
                            }
                            other => other,
                        }
                    }
                };

                if let Replacement::Unavailable(reason) = outcome {
                    warn!(
                        request_id = %scope.request_id(),
                        rule = %issue.rule_id,
                        field = %subordinate,
                        %reason,
                        "conflict left unresolved"
                    );
                    unresolved.push(UnresolvedIssue::new(issue, subordinate, reason));
                }
            }

            pending = self.checker.check(rules, intent, &selection);
        }

        Ok(ResolutionOutcome {
            selection,
            resolutions,
            unresolved,
        })
    }

    /// Best re-queried candidate for `field` that is not already selected and
    /// would not make any rule fire against the rest of the selection.
    #[allow(clippy::too_many_arguments)]
    fn find_replacement(
        &self,
        selector: &Selector,
        rules: &RuleTable,
        intent: &Intent,
        selection: &SelectionSet,
        field: IntentField,
        original: &NaturalKey,
        scope: &RequestScope<'_>,
    ) -> TesseraResult<Replacement> {
        let Some(request) = intent.request(field) else {
            return Ok(Replacement::Unavailable(UnresolvedReason::NoCompatibleReplacement));
        };
        let query = selector.field_query(intent, field, request, self.requery_limit);
        let elements = match scope.query(query) {
            Ok(elements) => elements,
            Err(RepositoryError::Timeout { .. }) => {
                return Ok(Replacement::Unavailable(UnresolvedReason::RepositoryTimeout))
            }
            Err(e) => {
                return Err(TesseraError::RepositoryUnavailable {
                    reason: e.to_string(),
                })
            }
        };

        let elements = selector.admissible(intent, field, elements);
        let ranked = selector.rank(selector.score_candidates(field, request, elements));
        let considered = ranked.len();
        let found = ranked.into_iter().find(|c| {
            if c.key() == original || selection.contains_key(c.key()) {
                return false;
            }
            if !selector.meets_floor(field, c) {
                return false;
            }
            match self.checker.clashes(rules, intent, selection, field, &c.element) {
                Some(rule) => {
                    debug!(candidate = %c.key(), %rule, "replacement candidate rejected");
                    false
                }
                None => true,
            }
        });

        Ok(match found {
            Some(choice) => Replacement::Found(choice),
            None => {
                debug!(field = %field, considered, "no compatible replacement");
                Replacement::Unavailable(UnresolvedReason::NoCompatibleReplacement)
            }
        })
    }
}

type HandledKey = (
    IntentField,
    IntentField,
    String,
    Option<NaturalKey>,
    Option<NaturalKey>,
);

/// Dedup key plus the elements involved: the same rule firing on a different
/// element of a multi-valued field is a new issue.
fn owned_key(issue: &Issue) -> HandledKey {
    let (a, b, id) = issue.dedup_key();
    (
        a,
        b,
        id.to_string(),
        issue.first.element.clone(),
        issue.second.element.clone(),
    )
}

fn describe(issue: &Issue) -> &str {
    if issue.description.is_empty() {
        &issue.rule_id
    } else {
        &issue.description
    }
}
