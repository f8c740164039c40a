//! Diagnostic tracing for the `prd` binary.
//!
//! Tracing goes to stderr. Command results go to stdout and are never
//! filtered, so scripts can parse them regardless of `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects `prd=debug`, and the
/// default is `warn`, which still shows invalid documents and merge warnings.
pub fn init(verbose: bool) {
    let fallback = if verbose { "warn,prd=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .compact(),
        )
        .init();
}
