use std::io::{stderr, stdout};

use tracing::Level;
use tracing_subscriber::{fmt::writer::MakeWriterExt, prelude::*, util::TryInitError, EnvFilter};

use super::*;

/// Install the global subscriber. `RUST_LOG` takes precedence; otherwise
/// the crates in `verbose` log at DEBUG on debug builds and everything
/// else at INFO. WARN and above go to stderr.
pub fn try_init_logger<I, S>(verbose: I) -> Result<(), TryInitError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let writer = stderr
        .with_max_level(Level::WARN)
        .or_else(stdout.with_max_level(Level::TRACE));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .event_format(ContentFormatter::from_env());

    match EnvFilter::try_from_default_env() {
        Ok(env_filter) => tracing_subscriber::registry()
            .with(layer.with_filter(env_filter))
            .try_init(),
        Err(_) => tracing_subscriber::registry()
            .with(layer.with_filter(ContentFilter::new(verbose)))
            .try_init(),
    }
}

#[inline]
pub fn init_logger<I, S>(verbose: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if let Err(e) = try_init_logger(verbose) {
        eprintln!("failed to init logger: {e}");
    }
}
