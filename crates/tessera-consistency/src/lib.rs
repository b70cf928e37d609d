//! # tessera-consistency
//!
//! Conflict rules as data, the Consistency Checker and the Conflict Resolver.
//!
//! ```text
//! RuleTable (TOML, versioned)
//!   └── ConsistencyChecker::check  → Vec<Issue>      (pure)
//!         └── ConflictResolver::resolve → ResolutionOutcome
//!               ├── re-query via RequestScope
//!               ├── score + rank via Selector
//!               └── reject candidates that would fire any rule
//! ```

pub mod checker;
pub mod resolver;
pub mod rules;

pub use checker::{ConsistencyChecker, FieldTokens};
pub use resolver::{ConflictResolver, ResolutionOutcome};
pub use rules::{builtin_rules, load_rules, parse_rules};
