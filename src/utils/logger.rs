use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the level filter: RUST_LOG wins, then --verbose, then info
fn build_filter(verbose: bool) -> tracing_subscriber::EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback))
}

/// Initialize logging to stderr (used by one-shot CLI commands)
pub fn init_logger(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .try_init();
}

/// Initialize logging to a file so the TUI screen stays clean
pub fn init_file_logger(path: &Path, verbose: bool) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let _ = tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init();

    Ok(())
}

/// Log an info message with a short tag prefix
pub fn log_info(tag: &str, message: impl std::fmt::Display) {
    info!("[{}] {}", tag, message);
}

/// Log a warning message with a short tag prefix
pub fn log_warn(tag: &str, message: impl std::fmt::Display) {
    warn!("[{}] {}", tag, message);
}

/// Log an error message with a short tag prefix
pub fn log_error(tag: &str, message: impl std::fmt::Display) {
    error!("[{}] {}", tag, message);
}
