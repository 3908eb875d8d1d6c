//! Logging setup for Shelf.
//!
//! Library crates only emit `tracing` events; binaries call [`init`] once to
//! install a subscriber that writes them to stderr.

use thiserror::Error;

mod logging;

pub use logging::{init, LogFormat, LogLevel, LogSettings};

/// Errors raised while initialising logging.
#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// The configured filter directive did not parse.
    #[error("invalid log filter '{directive}': {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// Failed to initialise tracing subscriber.
    #[error("failed to initialise tracing subscriber: {0}")]
    TracingSubscriber(#[from] tracing_subscriber::util::TryInitError),
}
