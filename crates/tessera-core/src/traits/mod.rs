pub mod history;
pub mod repository;

pub use history::{CompositionRecord, ICompositionLog, UsageStats};
pub use repository::{
    rank_elements, ElementQuery, IElementCurator, IElementRepository,
    MIN_KEYWORD_SEARCH_TEMPLATE_CHARS,
};
