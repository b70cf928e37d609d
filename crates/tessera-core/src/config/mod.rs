pub mod composition_config;
pub mod defaults;
pub mod observability_config;
pub mod repository_config;
pub mod resolution_config;
pub mod selection_config;
pub mod tessera_config;

pub use composition_config::CompositionConfig;
pub use observability_config::ObservabilityConfig;
pub use repository_config::RepositoryConfig;
pub use resolution_config::ResolutionConfig;
pub use selection_config::SelectionConfig;
pub use tessera_config::{RulesConfig, TesseraConfig};
