//! Selector: per-field repository queries, weighted scoring and a
//! deterministic pick.

use std::collections::{BTreeMap, BTreeSet};

use tessera_core::config::{SelectionConfig, TesseraConfig};
use tessera_core::errors::{Advisory, RepositoryError, TesseraError, TesseraResult};
use tessera_core::intent::{FieldRequest, Intent, IntentField, KeywordVocabulary};
use tessera_core::models::{Candidate, Choice, Element, FieldSelection, SelectionSet};
use tessera_core::traits::ElementQuery;
use tessera_core::{text, RequestScope};
use tracing::{debug, info, warn};

use crate::relevance::RelevanceScorer;

/// What the selector produced for one request.
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    pub selection: SelectionSet,
    /// Fields that came back empty or timed out.
    pub advisories: Vec<Advisory>,
}

/// Fills every requested intent field from the repository.
#[derive(Debug, Clone)]
pub struct Selector {
    config: SelectionConfig,
    vocabulary: KeywordVocabulary,
    categories: BTreeMap<IntentField, Option<String>>,
    scorer: RelevanceScorer,
}

impl Selector {
    /// Selector with the default field → category mapping.
    pub fn new(config: SelectionConfig, vocabulary: KeywordVocabulary) -> Self {
        let categories = IntentField::ALL
            .iter()
            .map(|f| (*f, f.default_category().map(str::to_string)))
            .collect();
        Self {
            scorer: RelevanceScorer::new(config.category_bonus),
            config,
            vocabulary,
            categories,
        }
    }

    pub fn from_config(config: &TesseraConfig) -> Self {
        let mut selector = Self::new(config.selection.clone(), config.keyword_vocabulary());
        for field in IntentField::ALL {
            selector.categories.insert(field, config.category_for(field));
        }
        selector
    }

    /// Query `field` in `category` instead of its default.
    pub fn with_category(mut self, field: IntentField, category: impl Into<String>) -> Self {
        if field.default_category().is_some() {
            self.categories.insert(field, Some(category.into()));
        }
        self
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &KeywordVocabulary {
        &self.vocabulary
    }

    /// Repository category for `field`; `None` means keyword search.
    pub fn category_for(&self, field: IntentField) -> Option<&str> {
        self.categories.get(&field).and_then(|c| c.as_deref())
    }

    /// The repository query issued for one requested field.
    pub fn field_query(
        &self,
        intent: &Intent,
        field: IntentField,
        request: &FieldRequest,
        limit: usize,
    ) -> ElementQuery {
        ElementQuery::new(
            intent.domain(),
            self.category_for(field).map(str::to_string),
            limit,
        )
        .with_keywords(self.vocabulary.expected_phrases(field, request))
    }

    /// Drop query results a field may not use. Injected-keyword results in a
    /// category already covered by a requested structured field are removed.
    pub fn admissible(&self, intent: &Intent, field: IntentField, elements: Vec<Element>) -> Vec<Element> {
        if !field.is_multi_valued() {
            return elements;
        }
        let covered: BTreeSet<&str> = intent
            .fields()
            .into_iter()
            .filter(|f| !f.is_multi_valued())
            .filter_map(|f| self.category_for(f))
            .collect();
        elements
            .into_iter()
            .filter(|e| !covered.contains(e.category()))
            .collect()
    }

    /// Relevance-annotate raw query results for `field`.
    ///
    /// Injected keywords score against each phrase separately; structured
    /// fields score against the union of their expected terms.
    pub fn score_candidates(
        &self,
        field: IntentField,
        request: &FieldRequest,
        elements: Vec<Element>,
    ) -> Vec<Candidate> {
        let term_groups: Vec<BTreeSet<String>> = if field.is_multi_valued() {
            self.vocabulary
                .expected_phrases(field, request)
                .iter()
                .map(|phrase| text::term_set(&[phrase]))
                .filter(|terms| !terms.is_empty())
                .collect()
        } else {
            vec![self
                .vocabulary
                .expected_terms(field, request)
                .into_iter()
                .collect()]
        };
        self.scorer
            .score_all(&term_groups, self.category_for(field), elements)
    }

    /// Best first: final score, then quality, then natural key.
    pub fn rank(&self, candidates: Vec<Candidate>) -> Vec<Choice> {
        rank_choices(
            candidates,
            self.config.relevance_weight,
            self.config.quality_weight,
        )
    }

    /// Select elements for every requested field of `intent`.
    ///
    /// A timed-out field query degrades to an empty field with an advisory; any
    /// other repository failure, or every field query timing out, aborts with
    /// [`TesseraError::RepositoryUnavailable`].
    pub fn select(&self, intent: &Intent, scope: &RequestScope<'_>) -> TesseraResult<SelectionOutcome> {
        let mut selection = SelectionSet::new();
        let mut advisories = Vec::new();
        let mut issued = 0usize;
        let mut timed_out = 0usize;

        for (field, request) in intent.requests() {
            let query = self.field_query(intent, field, request, self.config.candidate_limit);
            issued += 1;
            let elements = match scope.query(query) {
                Ok(elements) => elements,
                Err(RepositoryError::Timeout { elapsed_ms }) => {
                    timed_out += 1;
                    warn!(
                        request_id = %scope.request_id(),
                        field = %field,
                        elapsed_ms,
                        "field query timed out, continuing without candidates"
                    );
                    advisories.push(Advisory::QueryTimedOut { field, elapsed_ms });
                    selection.insert(self.empty_selection(field))?;
                    continue;
                }
                Err(e) => {
                    return Err(TesseraError::RepositoryUnavailable {
                        reason: e.to_string(),
                    })
                }
            };

            let elements = self.admissible(intent, field, elements);
            let returned = elements.len();
            let ranked = self.rank(self.score_candidates(field, request, elements));
            let choices = self.pick(field, ranked, &selection);
            debug!(
                request_id = %scope.request_id(),
                field = %field,
                returned,
                chosen = choices.len(),
                primary = choices.first().map(|c| c.element.key.to_string()).unwrap_or_default(),
                "field selected"
            );
            if choices.is_empty() {
                advisories.push(Advisory::NoCandidates { field });
            }
            selection.insert(FieldSelection {
                field,
                category: self.category_for(field).map(str::to_string),
                choices,
            })?;
        }

        if issued > 0 && timed_out == issued {
            return Err(TesseraError::RepositoryUnavailable {
                reason: format!("all {issued} field queries timed out"),
            });
        }

        info!(
            request_id = %scope.request_id(),
            fields = selection.len(),
            elements = selection.element_count(),
            advisories = advisories.len(),
            "selection complete"
        );
        Ok(SelectionOutcome {
            selection,
            advisories,
        })
    }

    fn empty_selection(&self, field: IntentField) -> FieldSelection {
        FieldSelection {
            field,
            category: self.category_for(field).map(str::to_string),
            choices: Vec::new(),
        }
    }

    /// Single-valued fields take the best choice not already selected;
    /// multi-valued fields keep the top N above the relevance floor.
    fn pick(&self, field: IntentField, ranked: Vec<Choice>, selection: &SelectionSet) -> Vec<Choice> {
        let available = ranked
            .into_iter()
            .filter(|c| !selection.contains_key(c.key()))
            .filter(|c| self.meets_floor(field, c));
        if field.is_multi_valued() {
            available.take(self.config.keyword_top_n).collect()
        } else {
            available.take(1).collect()
        }
    }

    /// Injected-keyword choices must reach the relevance floor; structured
    /// fields take whatever their category offers.
    pub fn meets_floor(&self, field: IntentField, choice: &Choice) -> bool {
        !field.is_multi_valued() || choice.relevance >= self.config.keyword_relevance_floor
    }
}

/// `relevance * w_r + normalized_quality * w_q`.
pub fn final_score(candidate: &Candidate, relevance_weight: f64, quality_weight: f64) -> f64 {
    candidate.relevance * relevance_weight
        + candidate.element.normalized_quality() * quality_weight
}

/// Sort candidates best first. Ties go to higher quality, then to the
/// lexicographically smaller natural key.
pub fn rank_choices(
    candidates: Vec<Candidate>,
    relevance_weight: f64,
    quality_weight: f64,
) -> Vec<Choice> {
    let mut choices: Vec<Choice> = candidates
        .into_iter()
        .map(|c| {
            let score = final_score(&c, relevance_weight, quality_weight);
            Choice {
                element: c.element,
                relevance: c.relevance,
                score,
            }
        })
        .collect();
    choices.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.element.quality.total_cmp(&a.element.quality))
            .then_with(|| a.element.key.cmp(&b.element.key))
    });
    choices
}
