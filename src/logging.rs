use std::fs;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Environment variable naming a directory for JSON log files.
pub const LOG_DIR_ENV: &str = "GIFT_EXCHANGE_LOG_DIR";

/// Initializes logging: human-readable output on stderr, plus a daily rolling
/// JSON file when `GIFT_EXCHANGE_LOG_DIR` is set.
///
/// Stdout is left alone so assignment output can be piped.
pub fn init_logging() {
    let filter = EnvFilter::from_default_env().add_directive(
        "gift_exchange=info"
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into()),
    );

    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let file_layer = std::env::var(LOG_DIR_ENV).ok().map(|dir| {
        let _ = fs::create_dir_all(&dir);
        let file_appender = tracing_appender::rolling::daily(dir, "gift_exchange.log");
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
        // The guard flushes on drop; the subscriber lives for the whole process.
        std::mem::forget(guard);
        fmt::layer().json().with_writer(non_blocking_writer)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();
}
