//! Middleware support for request/response processing.

use std::sync::Arc;

use tracing::info;

use crate::request::Request;
use crate::response::Response;

/// Result of a middleware `before` hook.
#[derive(Debug)]
pub enum MiddlewareResult {
    /// Continue to the next middleware or the handler.
    Continue(Request),
    /// Stop processing and return this response.
    Response(Response),
}

/// Trait for middleware wrapping a matched route.
///
/// Middleware can:
/// - Modify the request before it reaches the handler
/// - Short-circuit processing and return a response
/// - Modify the response after the handler runs
///
/// # Example
///
/// ```
/// use oxide_dispatch::{Middleware, MiddlewareResult, Request, Response};
///
/// struct RequireNumericId;
///
/// impl Middleware for RequireNumericId {
///     fn before(&self, req: Request) -> MiddlewareResult {
///         match req.params.parse::<u64>(0) {
///             Some(_) => MiddlewareResult::Continue(req),
///             None => MiddlewareResult::Response(Response::text("bad id").with_status(400)),
///         }
///     }
/// }
/// ```
pub trait Middleware: Send + Sync {
    /// Called before the handler.
    ///
    /// Can modify the request or short-circuit with a response.
    fn before(&self, req: Request) -> MiddlewareResult;

    /// Called after the handler, in reverse chain order.
    fn after(&self, res: Response) -> Response {
        res
    }
}

/// Runs `chain` around `handler`.
///
/// `before` hooks run in order. When one short-circuits, only the `after`
/// hooks of middleware that already ran `before` are applied.
pub(crate) fn run_chain<H>(chain: &[Arc<dyn Middleware>], mut request: Request, handler: H) -> Response
where
    H: FnOnce(&Request) -> Response,
{
    for (entered, mw) in chain.iter().enumerate() {
        match mw.before(request) {
            MiddlewareResult::Continue(req) => request = req,
            MiddlewareResult::Response(res) => {
                return chain[..=entered]
                    .iter()
                    .rev()
                    .fold(res, |res, mw| mw.after(res));
            }
        }
    }

    let response = handler(&request);
    chain.iter().rev().fold(response, |res, mw| mw.after(res))
}

/// Middleware that logs requests and responses.
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn before(&self, req: Request) -> MiddlewareResult {
        info!(method = %req.method, path = %req.path, route = ?req.route_name, "-->");
        MiddlewareResult::Continue(req)
    }

    fn after(&self, res: Response) -> Response {
        info!(status = res.status, "<--");
        res
    }
}
