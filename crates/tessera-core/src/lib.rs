//! # tessera-core
//!
//! Foundation crate for the tessera composition engine.
//! Defines the intent model, element model, selection/issue/gap types,
//! repository traits, errors, config, and text helpers.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod handle;
pub mod intent;
pub mod models;
pub mod text;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::TesseraConfig;
pub use errors::{Advisory, TesseraError, TesseraResult};
pub use handle::{RepositoryHandle, RequestScope};
pub use intent::{Dimension, DominanceOrder, FieldRequest, Intent, IntentField};
pub use models::{
    CompletenessGap, CompositionResult, Element, FrozenSelection, Issue, NaturalKey,
    SelectionSet, Severity, VerbosityMode,
};
