use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

pub const DEFAULT_LOG_DIRECTIVE: &str = "kakeibo_core=info";

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    init_tracing_with(None);
}

/// Initializes tracing with an explicit filter directive, falling back to
/// `RUST_LOG` plus the crate default when `directive` is absent or invalid.
pub fn init_tracing_with(directive: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let filter = directive
            .and_then(|raw| EnvFilter::try_new(raw).ok())
            .unwrap_or_else(default_filter);

        // Another subscriber may already be installed by the host.
        let _ = fmt().with_env_filter(filter).try_init();
    });
}

fn default_filter() -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match DEFAULT_LOG_DIRECTIVE.parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}
