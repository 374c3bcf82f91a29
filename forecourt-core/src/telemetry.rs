use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber. Later calls are no-ops, so
/// embedders and test binaries can both call it freely.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forecourt=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
