//! Route registration, matching and dispatch.
//!
//! Routes are registered on a [`RouterBuilder`] and compiled once by
//! [`RouterBuilder::build`] into an immutable [`Router`]. Matching walks the
//! table in registration order and the first route whose method and pattern
//! match wins.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::RouterConfig;
use crate::error::{Result, RouterError};
use crate::group::GroupAttributes;
use crate::handler::{qualify, split_reference, ControllerRegistry, Handler, HandlerFn, IntoHandler};
use crate::middleware::{run_chain, Middleware};
use crate::path::{substitute, PathPattern};
use crate::render::{ErrorRenderer, PlainErrorRenderer};
use crate::request::{request_path, Method, Params, Request};
use crate::response::Response;

/// A route as registered, before its template is compiled.
struct PendingRoute {
    method: Method,
    template: String,
    handler: Handler,
    middlewares: Vec<Arc<dyn Middleware>>,
    group: Option<String>,
    name: Option<String>,
    namespace: Option<String>,
}

/// Registers routes and compiles them into a [`Router`].
///
/// # Example
///
/// ```
/// use oxide_dispatch::{GroupAttributes, Params, Response, RouterBuilder, RouterConfig};
///
/// let router = RouterBuilder::with_config(RouterConfig::new("https://example.com"))
///     .get("/", |_: &Params| Response::text("home"))
///     .group(GroupAttributes::new("users").prefix("/user"), |r| {
///         r.get("/{id}", |p: &Params| Response::text(format!("user {}", p.get(0).unwrap_or(""))))
///             .name("profile")
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(router.run("GET", "/user/42").body, "user 42");
/// assert_eq!(router.run("GET", "/nope").status, 404);
/// assert_eq!(
///     router.url_for("profile", [("id", "42")]),
///     Some("https://example.com/user/42".to_string())
/// );
/// ```
pub struct RouterBuilder {
    config: RouterConfig,
    routes: Vec<PendingRoute>,
    /// Open groups, innermost last.
    groups: Vec<GroupAttributes>,
    /// Middleware for the next registered route only.
    staged: Vec<Arc<dyn Middleware>>,
    namespace: Option<String>,
    controllers: ControllerRegistry,
    error_renderer: Arc<dyn ErrorRenderer>,
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterBuilder {
    /// Creates a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Creates a builder with the given configuration.
    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            config,
            routes: Vec::new(),
            groups: Vec::new(),
            staged: Vec::new(),
            namespace: None,
            controllers: ControllerRegistry::new(),
            error_renderer: Arc::new(PlainErrorRenderer),
        }
    }

    /// Adds a GET route.
    #[must_use]
    pub fn get(self, path: &str, handler: impl IntoHandler) -> Self {
        self.route(Method::Get, path, handler)
    }

    /// Adds a POST route.
    #[must_use]
    pub fn post(self, path: &str, handler: impl IntoHandler) -> Self {
        self.route(Method::Post, path, handler)
    }

    /// Adds a PUT route.
    #[must_use]
    pub fn put(self, path: &str, handler: impl IntoHandler) -> Self {
        self.route(Method::Put, path, handler)
    }

    /// Adds a PATCH route.
    #[must_use]
    pub fn patch(self, path: &str, handler: impl IntoHandler) -> Self {
        self.route(Method::Patch, path, handler)
    }

    /// Adds a DELETE route.
    #[must_use]
    pub fn delete(self, path: &str, handler: impl IntoHandler) -> Self {
        self.route(Method::Delete, path, handler)
    }

    /// Adds a route with any method.
    ///
    /// The route takes the innermost open group's prefix and middleware, the
    /// current namespace and any staged middleware, which is then cleared.
    #[must_use]
    pub fn route(mut self, method: Method, path: &str, handler: impl IntoHandler) -> Self {
        let group = self.groups.last();
        let template = group.map_or_else(|| path.to_string(), |g| g.apply_prefix(path));

        let mut middlewares = group.map(|g| g.middlewares.clone()).unwrap_or_default();
        middlewares.append(&mut self.staged);

        let route = PendingRoute {
            method,
            template,
            handler: handler.into_handler(),
            middlewares,
            group: group.map(|g| g.name.clone()),
            name: None,
            namespace: self.namespace.clone(),
        };
        self.routes.push(route);
        self
    }

    /// Stages middleware for the next registered route.
    #[must_use]
    pub fn middleware(mut self, mw: impl Middleware + 'static) -> Self {
        self.staged.push(Arc::new(mw));
        self
    }

    /// Names the most recently registered route.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        match self.routes.last_mut() {
            Some(route) => route.name = Some(name),
            None => warn!(name = %name, "name() called before any route was registered"),
        }
        self
    }

    /// Sets the namespace for controller references registered from now on.
    ///
    /// Routes already registered keep the namespace they were registered
    /// with. An empty string clears it.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.namespace = (!namespace.is_empty()).then_some(namespace);
        self
    }

    /// Registers routes inside a group.
    ///
    /// `body` runs immediately with the group open. Groups can be nested, but
    /// only the innermost group's prefix and middleware apply to a route.
    #[must_use]
    pub fn group<F>(mut self, attributes: GroupAttributes, body: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.groups.push(attributes);
        let mut builder = body(self);
        builder.groups.pop();
        builder
    }

    /// Adds controllers that controller references can resolve to.
    #[must_use]
    pub fn controllers(mut self, registry: ControllerRegistry) -> Self {
        self.controllers.extend(registry);
        self
    }

    /// Sets the renderer used by [`Router::run`] for failed dispatches.
    #[must_use]
    pub fn error_renderer(mut self, renderer: impl ErrorRenderer + 'static) -> Self {
        self.error_renderer = Arc::new(renderer);
        self
    }

    /// Compiles every registered route into an immutable router.
    ///
    /// Controller references are resolved here; one that cannot be resolved
    /// is kept and fails when dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] for a malformed path template.
    pub fn build(self) -> Result<Router> {
        if !self.staged.is_empty() {
            warn!(count = self.staged.len(), "staged middleware was never attached to a route");
        }

        let mut routes = Vec::with_capacity(self.routes.len());
        let mut named = HashMap::new();

        for (index, pending) in self.routes.into_iter().enumerate() {
            let pattern = PathPattern::new(&pending.template)?;
            let target = resolve_target(
                &pending.handler,
                pending.namespace.as_deref(),
                &self.config,
                &self.controllers,
            );
            if let Target::Unresolvable { class, method } = &target {
                warn!(
                    route = %pending.template,
                    class = %class,
                    method = %method,
                    "controller reference does not resolve"
                );
            }

            if let Some(name) = &pending.name {
                if named.insert(name.clone(), index).is_some() {
                    warn!(name = %name, "route name registered twice; the later route wins");
                }
            }

            debug!(method = %pending.method, template = %pending.template, "compiled route");
            routes.push(Route {
                method: pending.method,
                pattern,
                handler: pending.handler,
                middlewares: pending.middlewares,
                group: pending.group,
                name: pending.name,
                namespace: pending.namespace,
                target,
            });
        }

        info!(routes = routes.len(), named = named.len(), "router built");

        Ok(Router {
            config: self.config,
            routes,
            named,
            error_renderer: self.error_renderer,
        })
    }
}

/// What a route invokes once its handler has been resolved.
#[derive(Clone)]
enum Target {
    Ready(HandlerFn),
    Unresolvable { class: String, method: String },
}

fn resolve_target(
    handler: &Handler,
    namespace: Option<&str>,
    config: &RouterConfig,
    controllers: &ControllerRegistry,
) -> Target {
    match handler {
        Handler::Inline(callback) => Target::Ready(Arc::clone(callback)),
        Handler::Controller(reference) => {
            let separator = config.callback_separator();
            let Some((class, method)) = split_reference(reference, separator) else {
                return Target::Unresolvable {
                    class: reference.clone(),
                    method: String::new(),
                };
            };
            let class = qualify(namespace, class, config.namespace_separator());
            match controllers.resolve(&class, method) {
                Some(action) => Target::Ready(action),
                None => Target::Unresolvable {
                    class,
                    method: method.to_string(),
                },
            }
        }
    }
}

/// A compiled route.
#[derive(Clone)]
pub struct Route {
    /// HTTP method.
    pub method: Method,
    /// Compiled path pattern, including any group prefix.
    pub pattern: PathPattern,
    /// The handler as registered.
    pub handler: Handler,
    /// Middleware chain: group middleware, then per-route middleware.
    pub middlewares: Vec<Arc<dyn Middleware>>,
    /// Name of the group the route was registered in.
    pub group: Option<String>,
    /// Route name for reverse URL lookup.
    pub name: Option<String>,
    /// Namespace bound at registration.
    pub namespace: Option<String>,
    target: Target,
}

impl Route {
    /// Returns the path template, including any group prefix.
    #[must_use]
    pub fn template(&self) -> &str {
        self.pattern.template()
    }

    /// Returns true if the handler resolved at build time.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self.target, Target::Ready(_))
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("template", &self.template())
            .field("handler", &self.handler)
            .field("middlewares", &self.middlewares.len())
            .field("group", &self.group)
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .finish()
    }
}

/// An immutable, compiled route table.
///
/// `Router` is `Send + Sync` and can be shared across threads.
pub struct Router {
    config: RouterConfig,
    routes: Vec<Route>,
    named: HashMap<String, usize>,
    error_renderer: Arc<dyn ErrorRenderer>,
}

impl Router {
    /// Starts a new builder.
    #[must_use]
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Dispatches a request, rendering any failure through the error renderer.
    ///
    /// `uri` may carry a query string; it is ignored for matching.
    pub fn run(&self, method: &str, uri: &str) -> Response {
        match self.dispatch(method, uri) {
            Ok(response) => response,
            Err(err) => {
                warn!(method = %method, uri = %uri, error = %err, "dispatch failed");
                self.error_renderer.render(err.status(), err.public_message())
            }
        }
    }

    /// Dispatches a request.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::NotFound`] when no route matches (including an
    /// unknown method), and [`RouterError::HandlerUnresolvable`] when the
    /// matched route's controller reference does not resolve.
    pub fn dispatch(&self, method: &str, uri: &str) -> Result<Response> {
        let path = request_path(uri);
        let not_found = || RouterError::NotFound {
            method: method.to_string(),
            path: path.to_string(),
        };

        let parsed: Method = method.parse().map_err(|_| not_found())?;
        let (route, params) = self.find(parsed, path).ok_or_else(not_found)?;

        let action = match &route.target {
            Target::Ready(action) => action,
            Target::Unresolvable { class, method: action } => {
                return Err(RouterError::HandlerUnresolvable {
                    class: class.clone(),
                    separator: self.config.callback_separator().to_string(),
                    method: action.clone(),
                });
            }
        };

        let mut request = Request::new(parsed, path, params);
        request.route_name.clone_from(&route.name);

        Ok(run_chain(&route.middlewares, request, |req| action(&req.params)))
    }

    /// Finds the first route matching `method` and `path`.
    #[must_use]
    pub fn find(&self, method: Method, path: &str) -> Option<(&Route, Params)> {
        let found = self
            .routes
            .iter()
            .filter(|route| route.method == method)
            .find_map(|route| route.pattern.match_path(path).map(|params| (route, params)));

        if let Some((route, params)) = &found {
            debug!(
                method = %method,
                path = %path,
                template = %route.template(),
                params = params.len(),
                "route matched"
            );
        }
        found
    }

    /// Generates a URL for a named route.
    ///
    /// Each `{key}` in the route's template is replaced by its value and the
    /// configured base domain is prepended. Placeholders without a value are
    /// left as they are. Returns `None` for an unknown name.
    pub fn url_for<I, K, V>(&self, name: &str, params: I) -> Option<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let route = self.route_named(name)?;
        let path = substitute(route.template(), params);
        Some(format!("{}{}", self.config.base_domain(), path))
    }

    /// Returns the route registered under `name`.
    #[must_use]
    pub fn route_named(&self, name: &str) -> Option<&Route> {
        self.named.get(name).map(|&index| &self.routes[index])
    }

    /// Returns the routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the routes registered in the named group.
    pub fn group_routes<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a Route> + 'a {
        self.routes
            .iter()
            .filter(move |route| route.group.as_deref() == Some(group))
    }

    /// Returns the router configuration.
    #[must_use]
    pub const fn config(&self) -> &RouterConfig {
        &self.config
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}
