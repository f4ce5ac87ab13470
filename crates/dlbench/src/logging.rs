use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Logs go to stderr so reports on stdout
/// stay machine readable.
///
/// `verbosity` picks the level used when `RUST_LOG` is unset; `RUST_LOG`
/// always wins, in either direction.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(rust_log.as_deref(), level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn filter(rust_log: Option<&str>, level: Level) -> EnvFilter {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::default().add_directive(level.into()),
    }
}
