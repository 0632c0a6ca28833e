//! Route groups.

use std::fmt;
use std::sync::Arc;

use crate::middleware::Middleware;

/// Attributes of a route group: a name, an optional path prefix and shared
/// middleware.
#[derive(Clone)]
pub struct GroupAttributes {
    pub(crate) name: String,
    pub(crate) prefix: Option<String>,
    pub(crate) middlewares: Vec<Arc<dyn Middleware>>,
}

impl GroupAttributes {
    /// Creates attributes for a group called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            middlewares: Vec::new(),
        }
    }

    /// Sets the path prefix for routes in this group.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Adds middleware run before every route in this group.
    #[must_use]
    pub fn middleware(mut self, mw: impl Middleware + 'static) -> Self {
        self.middlewares.push(Arc::new(mw));
        self
    }

    /// Adds already shared middleware.
    #[must_use]
    pub fn middleware_arc(mut self, mw: Arc<dyn Middleware>) -> Self {
        self.middlewares.push(mw);
        self
    }

    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies this group's prefix to a route path.
    pub(crate) fn apply_prefix(&self, path: &str) -> String {
        match self.prefix.as_deref() {
            Some(prefix) => join_prefix(prefix, path),
            None => path.to_string(),
        }
    }
}

impl fmt::Debug for GroupAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupAttributes")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}

/// Joins a group prefix and a route path.
///
/// `("/admin", "/")` gives `/admin`, so a group's index route has no
/// trailing slash.
fn join_prefix(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    match path {
        "" | "/" if !prefix.is_empty() => prefix.to_string(),
        _ if path.starts_with('/') => format!("{prefix}{path}"),
        _ => format!("{prefix}/{path}"),
    }
}
