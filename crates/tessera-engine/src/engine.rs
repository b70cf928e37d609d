//! CompositionEngine: the Select → Check → Resolve → Compose → Audit pipeline.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use rayon::prelude::*;
use tessera_audit::CompletenessAuditor;
use tessera_composition::{ComposeContext, Composer};
use tessera_consistency::{builtin_rules, load_rules, ConflictResolver, ConsistencyChecker};
use tessera_core::config::TesseraConfig;
use tessera_core::errors::{Advisory, TesseraError, TesseraResult};
use tessera_core::intent::Intent;
use tessera_core::models::{CompositionResult, RuleTable, UnresolvedIssue, VerbosityMode};
use tessera_core::traits::{ICompositionLog, IElementRepository};
use tessera_core::RepositoryHandle;
use tessera_selection::Selector;
use tessera_storage::ElementStore;
use tracing::{debug, info, warn};

use crate::outcome::{CompositionOutcome, CompositionRequest};
use crate::tracing_setup::events;

/// The composition engine.
///
/// Holds the stage components, the repository handle and the current rule
/// table. Requests share the engine by reference; each one opens its own
/// [`RequestScope`](tessera_core::RequestScope) and takes a snapshot of the
/// rule table when it starts.
pub struct CompositionEngine {
    config: TesseraConfig,
    handle: RepositoryHandle,
    /// Swapped whole on reload; readers clone the `Arc`.
    rules: RwLock<Arc<RuleTable>>,
    selector: Selector,
    checker: ConsistencyChecker,
    resolver: ConflictResolver,
    composer: Composer,
    auditor: CompletenessAuditor,
    history: Option<Arc<dyn ICompositionLog>>,
}

impl CompositionEngine {
    /// Build an engine over `repository`. The rule table comes from
    /// `config.rules.path` when set, the built-in table otherwise.
    pub fn new(config: TesseraConfig, repository: Arc<dyn IElementRepository>) -> TesseraResult<Self> {
        config.validate()?;
        let rules = match &config.rules.path {
            Some(path) => load_rules(Path::new(path))?,
            None => builtin_rules()?,
        };
        let handle = RepositoryHandle::new(repository, config.repository.query_timeout());
        info!(
            rules_version = rules.version(),
            rules = rules.len(),
            mode = %config.composition.default_mode,
            "composition engine ready"
        );
        Ok(Self {
            selector: Selector::from_config(&config),
            checker: ConsistencyChecker::new(),
            resolver: ConflictResolver::new(
                config.resolution.dominance.clone(),
                config.resolution.requery_limit,
            ),
            composer: Composer::from_config(&config),
            auditor: CompletenessAuditor::from_config(&config),
            rules: RwLock::new(Arc::new(rules)),
            handle,
            history: None,
            config,
        })
    }

    /// Open a project: layered config from `root`, the SQLite element store
    /// at `repository.db_path`, and history recorded into the same store.
    /// Relative paths resolve against `root`.
    pub fn open(root: &Path) -> TesseraResult<Self> {
        let mut config = TesseraConfig::load(root)?;
        if let Some(path) = config.rules.path.as_mut() {
            if Path::new(path.as_str()).is_relative() {
                *path = root.join(path.as_str()).display().to_string();
            }
        }
        let store = ElementStore::from_config(root, &config.repository).map_err(|e| {
            TesseraError::RepositoryUnavailable {
                reason: e.to_string(),
            }
        })?;
        let store = Arc::new(store);
        Ok(Self::new(config, store.clone())?.with_history(store))
    }

    /// Use `rules` instead of the configured table.
    pub fn with_rules(self, rules: RuleTable) -> Self {
        self.replace_rules(rules);
        self
    }

    /// Record every finished composition into `history`.
    pub fn with_history(mut self, history: Arc<dyn ICompositionLog>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn config(&self) -> &TesseraConfig {
        &self.config
    }

    pub fn handle(&self) -> &RepositoryHandle {
        &self.handle
    }

    pub fn history(&self) -> Option<&Arc<dyn ICompositionLog>> {
        self.history.as_ref()
    }

    /// The rule table new requests will use.
    pub fn rules(&self) -> Arc<RuleTable> {
        let guard = self.rules.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in `rules`. Requests already running keep their snapshot.
    pub fn replace_rules(&self, rules: RuleTable) {
        let next = Arc::new(rules);
        let mut guard = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        info!(
            from = guard.version(),
            to = next.version(),
            rules = next.len(),
            "rule table replaced"
        );
        *guard = next;
    }

    /// Load a rule table from `path` and swap it in. On error the current
    /// table stays in place.
    pub fn reload_rules(&self, path: &Path) -> TesseraResult<Arc<RuleTable>> {
        let table = load_rules(path)?;
        self.replace_rules(table);
        Ok(self.rules())
    }

    /// Run one request through the whole pipeline.
    ///
    /// Fails only when the repository cannot serve the request; field-level
    /// problems come back as advisories and gaps on the outcome.
    pub fn compose(
        &self,
        intent: &Intent,
        mode: Option<VerbosityMode>,
    ) -> TesseraResult<CompositionOutcome> {
        let mode = mode.unwrap_or(self.config.composition.default_mode);
        let rules = self.rules();
        let scope = self.handle.begin_request()?;
        let request_id = scope.request_id();
        let _request = crate::request_span!(request_id, intent.domain()).entered();

        let selected = crate::select_span!(request_id, intent.fields().len())
            .in_scope(|| self.selector.select(intent, &scope))?;
        let mut advisories = selected.advisories;
        for advisory in &advisories {
            events::query_degraded(request_id, advisory);
        }

        let issues = crate::check_span!(request_id, rules.version())
            .in_scope(|| self.checker.check(&rules, intent, &selected.selection));
        for issue in &issues {
            events::conflict_detected(request_id, issue);
        }

        let resolved = crate::resolve_span!(request_id, issues.len()).in_scope(|| {
            self.resolver.resolve(
                &self.selector,
                &rules,
                intent,
                selected.selection,
                issues,
                &scope,
            )
        })?;
        for resolution in &resolved.resolutions {
            events::conflict_resolved(request_id, resolution);
        }
        for unresolved in &resolved.unresolved {
            events::conflict_unresolved(request_id, unresolved);
            advisories.push(unresolved_advisory(unresolved));
        }

        let selection = resolved.selection.freeze();
        scope.verify(selection.keys())?;

        let mut context = ComposeContext::new(request_id, scope.library_version());
        context.resolutions = resolved.resolutions;
        context.unresolved = resolved.unresolved;
        let result = crate::compose_span!(request_id, mode)
            .in_scope(|| self.composer.compose(selection, mode, context));

        let gaps = crate::audit_span!(request_id).in_scope(|| self.auditor.audit(intent, &result));
        for gap in &gaps {
            events::completeness_gap(request_id, gap);
        }

        self.record(&result);
        events::request_completed(
            request_id,
            result.text().chars().count(),
            gaps.len(),
            advisories.len(),
        );
        Ok(CompositionOutcome {
            result,
            gaps,
            advisories,
        })
    }

    /// Validate the request's intent, then compose it.
    pub fn compose_request(&self, request: &CompositionRequest) -> TesseraResult<CompositionOutcome> {
        let intent = Intent::try_from(request.intent.clone())?;
        self.compose(&intent, request.mode)
    }

    /// Run independent requests in parallel. Results keep the input order and
    /// fail individually.
    pub fn compose_many(&self, requests: &[CompositionRequest]) -> Vec<TesseraResult<CompositionOutcome>> {
        requests
            .par_iter()
            .map(|request| self.compose_request(request))
            .collect()
    }

    /// History is best effort: a failed write is logged, never returned.
    fn record(&self, result: &CompositionResult) {
        let Some(history) = &self.history else {
            return;
        };
        match history.record_composition(result) {
            Ok(id) => debug!(request_id = %result.request_id(), record_id = id, "composition recorded"),
            Err(e) => warn!(
                request_id = %result.request_id(),
                error = %e,
                "failed to record composition"
            ),
        }
    }
}

impl std::fmt::Debug for CompositionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositionEngine")
            .field("handle", &self.handle)
            .field("rules_version", &self.rules().version())
            .field("history", &self.history.is_some())
            .finish_non_exhaustive()
    }
}

/// The conflict as an advisory: `second` is the side that should have given way.
fn unresolved_advisory(unresolved: &UnresolvedIssue) -> Advisory {
    let issue = &unresolved.issue;
    let other = if issue.first.field == unresolved.subordinate {
        issue.second.field
    } else {
        issue.first.field
    };
    Advisory::UnresolvedConflict {
        rule_id: issue.rule_id.clone(),
        first: other,
        second: unresolved.subordinate,
    }
}
