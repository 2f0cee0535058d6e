//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `WhError` as one
//! variant where they need to surface configuration or parse failures.

use thiserror::Error;

/// The base error type for `wh-core`.
#[derive(Debug, Error)]
pub enum WhError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `wh-core`.
pub type WhResult<T> = Result<T, WhError>;
