//! Error rendering.
//!
//! The router reports dispatch failures as a status code and a public
//! message; turning those into a page is left to an [`ErrorRenderer`].

use crate::response::Response;

/// Renders a dispatch failure.
pub trait ErrorRenderer: Send + Sync {
    /// Builds the response for `status` with the public `message`.
    fn render(&self, status: u16, message: &str) -> Response;
}

impl<F> ErrorRenderer for F
where
    F: Fn(u16, &str) -> Response + Send + Sync,
{
    fn render(&self, status: u16, message: &str) -> Response {
        self(status, message)
    }
}

/// Renders the message as a plain text body.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainErrorRenderer;

impl ErrorRenderer for PlainErrorRenderer {
    fn render(&self, status: u16, message: &str) -> Response {
        Response::text(message).with_status(status)
    }
}
