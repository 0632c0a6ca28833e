#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use oxide_dispatch::{
    ErrorRenderer, Middleware, MiddlewareResult, Params, Request, Response, Router,
    RouterBuilder,
};

/// Shared log of events recorded by handlers, middleware and the error renderer.
pub type Log = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Error renderer recording every `(status, message)` pair it is given.
pub struct RecordingRenderer(pub Log);

impl ErrorRenderer for RecordingRenderer {
    fn render(&self, status: u16, message: &str) -> Response {
        self.0.lock().unwrap().push(format!("{status} {message}"));
        Response::text(message).with_status(status)
    }
}

/// Middleware recording its `before`/`after` hooks.
pub struct Tagged {
    pub tag: &'static str,
    pub log: Log,
}

impl Middleware for Tagged {
    fn before(&self, req: Request) -> MiddlewareResult {
        self.log.lock().unwrap().push(format!("before:{}", self.tag));
        MiddlewareResult::Continue(req)
    }

    fn after(&self, res: Response) -> Response {
        self.log.lock().unwrap().push(format!("after:{}", self.tag));
        res
    }
}

pub fn tagged(tag: &'static str, log: &Log) -> Tagged {
    Tagged {
        tag,
        log: Arc::clone(log),
    }
}

/// Handler recording its invocation and echoing the captured params.
pub fn recording(tag: &'static str, log: &Log) -> impl Fn(&Params) -> Response + Send + Sync {
    let log = Arc::clone(log);
    move |params: &Params| {
        log.lock()
            .unwrap()
            .push(format!("{tag}({})", params.values().join(",")));
        Response::text(tag)
    }
}

pub fn build(builder: RouterBuilder) -> Router {
    builder
        .build()
        .unwrap_or_else(|e| panic!("Failed to build router: {e}"))
}
