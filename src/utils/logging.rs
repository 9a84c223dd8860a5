/// Initialize tracing/logging for the application.
///
/// This uses a simple `with_max_level` configuration based on `default_level`.
/// Logs go to stderr so that stdout stays reserved for delivered events.
pub fn init(default_level: &str) {
    let lvl = parse_level(default_level);

    // try_init: tests and repeated calls must not panic
    let _ = tracing_subscriber::fmt()
        .with_max_level(lvl)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub(crate) fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" | "warning" => tracing::Level::WARN,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::INFO,
    }
}
