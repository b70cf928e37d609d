//! Tracing setup: subscriber installation, stage spans and structured events.

pub mod events;
pub mod spans;

use std::sync::Once;

use tessera_core::config::ObservabilityConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding per-crate filter directives.
pub const LOG_ENV_VAR: &str = "TESSERA_LOG";

/// Initialize tracing with the default observability settings.
///
/// Reads `TESSERA_LOG` for filter directives, e.g.
/// `TESSERA_LOG=tessera_selection=debug,tessera_storage=warn`.
/// Falls back to `tessera=info` when unset or unparsable.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    init_tracing_with(&ObservabilityConfig::default());
}

/// Initialize tracing from configuration. `TESSERA_LOG` still wins over
/// `log_level`; `json_logs` switches to one JSON object per event.
pub fn init_tracing_with(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(fallback_directive(config)));

        // A subscriber installed by the embedding application is left alone.
        let _ = if config.json_logs {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .with(filter)
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .try_init()
        };
    });
}

/// Filter used when `TESSERA_LOG` is absent. A bare level applies to every
/// `tessera*` target; anything with a directive syntax is taken verbatim.
pub fn fallback_directive(config: &ObservabilityConfig) -> String {
    let level = config.log_level.trim();
    if level.is_empty() {
        "tessera=info".to_string()
    } else if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("tessera={level}")
    }
}
