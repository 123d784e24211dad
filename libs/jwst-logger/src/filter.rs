use tracing::{subscriber::Interest, Level, Metadata};
use tracing_subscriber::layer::{Context, Filter};

/// Default filter when `RUST_LOG` is not set: everything up to INFO, and
/// DEBUG for the crates listed in `verbose` on debug builds.
pub struct ContentFilter {
    verbose: Vec<String>,
}

impl ContentFilter {
    pub fn new<I, S>(verbose: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            verbose: verbose.into_iter().map(|s| s.as_ref().replace('-', "_")).collect(),
        }
    }

    fn is_verbose(&self, target: &str) -> bool {
        self.verbose
            .iter()
            .any(|prefix| target == prefix || target.starts_with(&format!("{prefix}::")))
    }

    fn is_enabled(&self, metadata: &Metadata<'_>) -> bool {
        let level = *metadata.level();
        if level <= Level::INFO {
            return true;
        }
        cfg!(debug_assertions) && level <= Level::DEBUG && self.is_verbose(metadata.target())
    }
}

impl<S> Filter<S> for ContentFilter {
    fn enabled(&self, metadata: &Metadata<'_>, _: &Context<'_, S>) -> bool {
        self.is_enabled(metadata)
    }

    fn callsite_enabled(&self, metadata: &'static Metadata<'static>) -> Interest {
        if self.is_enabled(metadata) {
            Interest::always()
        } else {
            Interest::never()
        }
    }
}
