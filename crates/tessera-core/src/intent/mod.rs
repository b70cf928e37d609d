//! The structured creative intent consumed by the pipeline.

pub mod dominance;
pub mod field;
#[allow(clippy::module_inception)]
pub mod intent;
pub mod request;
pub mod vocabulary;

pub use dominance::DominanceOrder;
pub use field::{Dimension, IntentField};
pub use intent::{
    Intent, IntentBuilder, IntentSpec, LightingSpec, SceneSpec, StylingSpec, SubjectSpec,
    VisualStyleSpec,
};
pub use request::{AttributeCode, FieldRequest, MAX_PHRASE_LEN, UNSPECIFIED_MARKER};
pub use vocabulary::KeywordVocabulary;
