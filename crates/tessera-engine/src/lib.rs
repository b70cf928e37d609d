//! # tessera-engine
//!
//! Orchestrates one composition request end to end:
//!
//! ```text
//! Intent ─► Select ─► Check ─► Resolve ─► Compose ─► Audit ─► CompositionOutcome
//!             │                   │
//!             └──── RequestScope (repository, timeouts, provenance)
//! ```
//!
//! Every stage runs under its own `tessera.*` span. Independent requests can
//! run concurrently through [`CompositionEngine::compose_many`]; the rule
//! table can be swapped between requests with
//! [`CompositionEngine::reload_rules`].

pub mod engine;
pub mod outcome;
pub mod tracing_setup;

pub use engine::CompositionEngine;
pub use outcome::{CompositionOutcome, CompositionRequest};
pub use tracing_setup::{init_tracing, init_tracing_with};
