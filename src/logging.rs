//! Logging configuration using tracing
//!
//! Provides structured logging to stderr with support for the RUST_LOG
//! environment variable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber
///
/// Sets up structured logging with:
/// - Filtering via RUST_LOG environment variable (defaults to "info")
/// - Formatted output to stderr
///
/// # Example RUST_LOG values
/// - `RUST_LOG=debug` - Show debug and above
/// - `RUST_LOG=schemascope=trace` - Trace level for the schemascope crate
/// - `RUST_LOG=schemascope=debug,reqwest=warn` - Different levels per crate
///
/// # Errors
/// Returns an error if the subscriber has already been initialized
pub fn init() -> crate::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| {
            crate::SchemascopeError::Other(format!("Failed to initialize tracing: {}", e))
        })?;

    Ok(())
}

/// Initialize logging for tests (no-op if already initialized)
pub fn init_test() {
    let _ = init();
}
