//! Error types for routing and dispatch.

use thiserror::Error;

/// Router-specific errors.
#[derive(Debug, Error)]
pub enum RouterError {
    /// No route matched the request.
    #[error("no route matched: {method} {path}")]
    NotFound { method: String, path: String },

    /// The controller class or its method could not be resolved.
    #[error("unresolvable handler: {class}{separator}{method}")]
    HandlerUnresolvable {
        class: String,
        separator: String,
        method: String,
    },

    /// Invalid path template.
    #[error("invalid path pattern: {0}")]
    InvalidPattern(String),

    /// Unknown HTTP method.
    #[error("invalid method: {0}")]
    InvalidMethod(String),

    /// Router configuration could not be parsed.
    #[error("invalid router configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl RouterError {
    /// Returns the HTTP status code this error is surfaced as.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } | Self::InvalidMethod(_) => 404,
            Self::HandlerUnresolvable { .. } | Self::InvalidPattern(_) | Self::Config(_) => 500,
        }
    }

    /// Returns the public message shown to clients for this error.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self.status() {
            404 => "Page not found",
            _ => "Internal Server Error",
        }
    }
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
