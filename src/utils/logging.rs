use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise only warnings are shown, and
/// `--verbose` turns on debug output for this crate. The driver is held
/// at `error` either way: its slow-statement warning carries the full SQL.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("warn,sqlx=error,dblyser=debug,dba=debug")
    } else {
        EnvFilter::new("warn,sqlx=error")
    }
}
