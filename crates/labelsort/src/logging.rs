//! Scoped logging setup for one invocation.
//!
//! Library code logs through `log` and opens `tracing` spans; the binary owns a
//! [`LoggingContext`] that routes both to stderr for as long as it is alive.

use tracing::level_filters::LevelFilter;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

/// Installed logging for the current thread. Dropping it uninstalls the
/// subscriber after flushing pending output.
pub struct LoggingContext {
    _guard: DefaultGuard,
}

impl LoggingContext {
    /// `verbosity` is the number of `-v` flags minus the number of `-q` flags.
    /// `RUST_LOG` directives take precedence over the derived default level.
    pub fn init(verbosity: i8) -> Self {
        // Only one `log` logger can exist per process; a second init is a no-op.
        let _ = tracing_log::LogTracer::init();

        let filter = EnvFilter::builder()
            .with_default_directive(level_for(verbosity).into())
            .from_env_lossy();

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .finish();

        Self {
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }
}

fn level_for(verbosity: i8) -> LevelFilter {
    match verbosity {
        i8::MIN..=-2 => LevelFilter::ERROR,
        -1 => LevelFilter::WARN,
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
