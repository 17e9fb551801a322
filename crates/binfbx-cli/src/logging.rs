//! Diagnostic logging to stderr.

use tracing::level_filters::LevelFilter;

/// Log level for the given `-v` count and `-q` flag. `-q` wins.
pub fn level(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

/// Install the global subscriber. Reports go to stdout, so logs stay on stderr.
pub fn init(verbose: u8, quiet: bool) {
    tracing_subscriber::fmt()
        .with_max_level(level(verbose, quiet))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
