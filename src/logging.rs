use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// `expense_tracker=info` directive.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("expense_tracker=info,tower_http=info"));

        fmt().with_env_filter(filter).init();
    });
}
