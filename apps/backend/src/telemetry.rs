use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the JSON subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,actix_web=info,actix_server=warn"));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .json()
        .with_current_span(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
