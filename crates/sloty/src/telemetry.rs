use crate::config::TelemetryConfig;
use std::env;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Variables a filter directive can come from, in priority order.
const RUST_LOG: &str = "RUST_LOG";
const SLOTY_LOG_LEVEL: &str = "SLOTY_LOG_LEVEL";

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter {
        variable: &'static str,
        directive: String,
        source: ParseError,
    },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter {
                variable,
                directive,
                ..
            } => write!(f, "{variable} holds an invalid log filter '{directive}'"),
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "a global log subscriber is already installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// Installs the global subscriber. A non-empty `RUST_LOG` wins over the
/// configured level; a malformed one is reported instead of being skipped.
///
/// Output goes to stderr so command output on stdout stays machine-readable.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let rust_log = env::var(RUST_LOG).ok();
    let env_filter = filter_for(rust_log.as_deref(), &config.log_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

fn filter_for(rust_log: Option<&str>, log_level: &str) -> Result<EnvFilter, TelemetryError> {
    let (variable, directive) = match rust_log.map(str::trim) {
        Some(directive) if !directive.is_empty() => (RUST_LOG, directive),
        _ => (SLOTY_LOG_LEVEL, log_level.trim()),
    };
    EnvFilter::try_new(directive).map_err(|source| TelemetryError::InvalidFilter {
        variable,
        directive: directive.to_string(),
        source,
    })
}
