//! Tracing initialisation for the CLI.
//!
//! `RUST_LOG` wins when set. Otherwise the crate logs at `info`, or `debug`
//! with `--verbose`; `--debug-http` adds HTTP request and response events.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter directives used when `RUST_LOG` is not set.
pub fn default_directives(verbose: bool, debug_http: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let http_level = if debug_http { "debug" } else { "info" };
    format!(
        "warn,dbnomics_ci={level},dbnomics_ci::http={http_level},reqwest={}",
        if debug_http { "debug" } else { "warn" }
    )
}

/// Install the global subscriber writing to stderr. Later calls are ignored.
pub fn init(verbose: bool, debug_http: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, debug_http)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(verbose || debug_http).with_writer(std::io::stderr))
        .try_init()
        .ok();
}
