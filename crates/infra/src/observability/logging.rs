//! Global `tracing` subscriber.

use calbridge_domain::LoggingConfig;
use once_cell::sync::OnceCell;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the process-wide subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `config.level` is used as the
/// filter directive. Only the first call has any effect, and an already
/// installed foreign subscriber is left in place.
pub fn init_tracing(config: &LoggingConfig) {
    static INIT: OnceCell<()> = OnceCell::new();

    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let result = if config.json {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_current_span(true))
                .try_init()
        } else {
            tracing_subscriber::registry().with(filter).with(fmt::layer()).try_init()
        };

        if let Err(err) = result {
            tracing::debug!(error = %err, "tracing subscriber already installed");
        }
    });
}
