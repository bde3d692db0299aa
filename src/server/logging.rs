use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_FILTER: &str = "info,sea_orm=warn,sqlx::query=warn";

/// JSON logs rotated daily under `log_dir`, plus human-readable stdout.
/// `RUST_LOG` overrides [`DEFAULT_LOG_FILTER`].
pub fn init_logging(log_dir: &str) {
    let file_appender = rolling::daily(log_dir, "moodboard.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}
