//! Standard tracing subscriber setup for CLI binaries.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "onboard_rt=info";

/// Build the filter used by [`init_tracing`].
///
/// `RUST_LOG` wins when set; otherwise `onboard_rt=info` applies to every workspace crate.
pub fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Initialize a tracing subscriber writing to stderr.
///
/// Stdout is left clean for the JSON and SSE frames the CLI prints.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(std::io::stderr)
        .try_init();
}
