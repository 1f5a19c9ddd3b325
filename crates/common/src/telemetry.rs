use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` wins over `default_level`;
/// `json` switches from human-readable lines to one JSON object per event.
pub fn init_tracing(service_name: &str, default_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let text = (!json).then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
    });
    let structured = json.then(|| fmt::layer().json().with_current_span(false));

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(structured)
        .init();

    tracing::info!("Starting service: {}", service_name);
}
