#![forbid(unsafe_code)]

//! Structured logging facade.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported so
//! downstream crates can log through `tessera_core::debug!` and friends.
//! With `tracing-json` a process-wide JSON subscriber can be installed from
//! an `EnvFilter` directive string.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Default filter directive used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "tessera=info";

/// Errors raised while installing a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    /// The filter directive could not be parsed.
    InvalidFilter { directive: String, reason: String },
    /// A global subscriber was already installed.
    AlreadyInitialized,
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFilter { directive, reason } => {
                write!(f, "invalid log filter {directive:?}: {reason}")
            }
            Self::AlreadyInitialized => write!(f, "a global tracing subscriber is already set"),
        }
    }
}

impl std::error::Error for LoggingError {}

/// Install a JSON subscriber filtered by `directive`, falling back to
/// `RUST_LOG` and then [`DEFAULT_LOG_FILTER`] when `directive` is `None`.
#[cfg(feature = "tracing-json")]
pub fn init_json(directive: Option<&str>) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let directive = directive
        .map(str::to_owned)
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());
    let filter =
        EnvFilter::try_new(&directive).map_err(|err| LoggingError::InvalidFilter {
            directive: directive.clone(),
            reason: err.to_string(),
        })?;
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}
