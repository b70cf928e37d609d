//! # tessera-composition
//!
//! Renders a frozen selection into the final descriptive text.
//!
//! - `render`: per-element text for `simple`, `detailed` and `auto`
//! - `dedup`: word-boundary phrase de-duplication across fragments
//! - `budget`: fragment-count and character ceilings, tail first

pub mod budget;
pub mod composer;
pub mod dedup;
pub mod render;

pub use budget::Budget;
pub use composer::{ComposeContext, Composer};
pub use dedup::PhraseLedger;
pub use render::{effective_mode, render};
