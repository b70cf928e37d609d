//! # tessera-selection
//!
//! Relevance Scorer and Selector. For each requested intent field the
//! selector queries the repository through the request's
//! [`RequestScope`](tessera_core::RequestScope), scores candidates by
//! keyword overlap and intrinsic quality, and keeps the best one (or the top
//! N for injected keywords).

pub mod relevance;
pub mod selector;

pub use relevance::RelevanceScorer;
pub use selector::{final_score, rank_choices, SelectionOutcome, Selector};
