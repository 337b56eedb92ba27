use tracing_subscriber::EnvFilter;

/// Sets up logging to stderr, keeping stdout for the triage report.
///
/// `RUST_LOG` takes precedence over `verbose` when set.
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("close_pending={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
