use super::messages::macros::is_debug_mode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global `tracing` subscriber.
///
/// Events are written to stderr so they never mix with status output. In
/// debug mode the filter comes from `RUST_LOG`, defaulting to `wsbar=debug`;
/// otherwise only warnings and errors of this crate are shown.
pub fn init_logging() {
    let filter = if is_debug_mode() {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wsbar=debug"))
    } else {
        EnvFilter::new("wsbar=warn")
    };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
