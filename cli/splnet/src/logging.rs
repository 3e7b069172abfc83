use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins over `level` when it is set and parses.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}

/// Pick the level filter from the command-line flags and the config file.
pub fn resolve_level<'a>(verbose: bool, quiet: bool, configured: &'a str) -> &'a str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        configured
    }
}
