//! Route handlers and the controller registry.
//!
//! A handler is either an inline callback or a controller reference such as
//! `"UserController::show"`. Controller references are resolved against a
//! [`ControllerRegistry`] that maps class names to zero-argument factories and
//! their actions, in place of runtime reflection.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::request::Params;
use crate::response::Response;

/// A type-erased handler callback.
pub type HandlerFn = Arc<dyn Fn(&Params) -> Response + Send + Sync>;

/// The target of a route.
#[derive(Clone)]
pub enum Handler {
    /// A callback invoked with the captured params.
    Inline(HandlerFn),
    /// A `"Class<sep>method"` reference resolved through the controller registry.
    Controller(String),
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(_) => f.write_str("Inline(..)"),
            Self::Controller(reference) => f.debug_tuple("Controller").field(reference).finish(),
        }
    }
}

/// Conversion into a [`Handler`], accepted by every registration method.
///
/// Implemented for closures taking `&Params` and for controller reference strings.
pub trait IntoHandler {
    /// Converts into a handler.
    fn into_handler(self) -> Handler;
}

impl<F> IntoHandler for F
where
    F: Fn(&Params) -> Response + Send + Sync + 'static,
{
    fn into_handler(self) -> Handler {
        Handler::Inline(Arc::new(self))
    }
}

impl IntoHandler for &str {
    fn into_handler(self) -> Handler {
        Handler::Controller(self.to_string())
    }
}

impl IntoHandler for String {
    fn into_handler(self) -> Handler {
        Handler::Controller(self)
    }
}

impl IntoHandler for Handler {
    fn into_handler(self) -> Handler {
        self
    }
}

/// Maps controller class names to their actions.
///
/// # Example
///
/// ```
/// use oxide_dispatch::{ControllerRegistry, Params, Response};
///
/// #[derive(Default)]
/// struct UserController;
///
/// impl UserController {
///     fn show(&self, params: &Params) -> Response {
///         Response::text(format!("user {}", params.get(0).unwrap_or("?")))
///     }
/// }
///
/// let mut registry = ControllerRegistry::new();
/// registry
///     .register("App\\UserController", UserController::default)
///     .action("show", UserController::show);
///
/// assert!(registry.resolve("App\\UserController", "show").is_some());
/// assert!(registry.resolve("App\\UserController", "delete").is_none());
/// ```
#[derive(Default, Clone)]
pub struct ControllerRegistry {
    classes: HashMap<String, HashMap<String, HandlerFn>>,
}

impl ControllerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a controller class built by `factory`.
    ///
    /// A fresh instance is created for every invocation. Registering the same
    /// class again keeps its existing actions.
    pub fn register<C, F>(&mut self, class: impl Into<String>, factory: F) -> ControllerBuilder<'_, C>
    where
        C: 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        ControllerBuilder {
            actions: self.classes.entry(class.into()).or_default(),
            factory: Arc::new(factory),
        }
    }

    /// Returns true if the class is registered.
    #[must_use]
    pub fn contains_class(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// Looks up an action of a registered class.
    #[must_use]
    pub fn resolve(&self, class: &str, method: &str) -> Option<HandlerFn> {
        self.classes.get(class)?.get(method).cloned()
    }

    /// Merges another registry into this one. Actions in `other` win.
    pub fn extend(&mut self, other: Self) {
        for (class, actions) in other.classes {
            self.classes.entry(class).or_default().extend(actions);
        }
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut classes: Vec<_> = self.classes.keys().collect();
        classes.sort();
        f.debug_struct("ControllerRegistry")
            .field("classes", &classes)
            .finish()
    }
}

/// Adds actions to a registered controller class.
pub struct ControllerBuilder<'a, C> {
    actions: &'a mut HashMap<String, HandlerFn>,
    factory: Arc<dyn Fn() -> C + Send + Sync>,
}

impl<C: 'static> ControllerBuilder<'_, C> {
    /// Registers a method callable as `Class<sep>name`.
    pub fn action<F>(self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&C, &Params) -> Response + Send + Sync + 'static,
    {
        let factory = Arc::clone(&self.factory);
        self.actions.insert(
            name.into(),
            Arc::new(move |params: &Params| {
                let controller = factory();
                method(&controller, params)
            }),
        );
        self
    }
}

/// Splits a controller reference into class and method.
pub(crate) fn split_reference<'r>(reference: &'r str, separator: &str) -> Option<(&'r str, &'r str)> {
    reference
        .split_once(separator)
        .filter(|(class, method)| !class.is_empty() && !method.is_empty())
}

/// Joins a namespace and a class name.
pub(crate) fn qualify(namespace: Option<&str>, class: &str, separator: &str) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => {
            format!("{}{separator}{}", ns.trim_end_matches(separator), class)
        }
        _ => class.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Counter {
        id: usize,
    }

    impl Counter {
        fn id(&self, _params: &Params) -> Response {
            Response::text(self.id.to_string())
        }
    }

    #[test]
    fn test_fresh_instance_per_call() {
        static CREATED: AtomicUsize = AtomicUsize::new(0);

        let mut registry = ControllerRegistry::new();
        let _ = registry
            .register("Counter", || Counter {
                id: CREATED.fetch_add(1, Ordering::SeqCst),
            })
            .action("id", Counter::id);

        let action = registry.resolve("Counter", "id").unwrap();
        assert_eq!(action(&Params::new()).body, "0");
        assert_eq!(action(&Params::new()).body, "1");
    }

    #[test]
    fn test_resolve_missing() {
        let mut registry = ControllerRegistry::new();
        let _ = registry.register("Counter", || Counter { id: 0 });
        assert!(registry.contains_class("Counter"));
        assert!(registry.resolve("Counter", "id").is_none());
        assert!(registry.resolve("Other", "id").is_none());
    }

    #[test]
    fn test_extend() {
        let mut a = ControllerRegistry::new();
        let _ = a.register("A", || Counter { id: 1 }).action("id", Counter::id);
        let mut b = ControllerRegistry::new();
        let _ = b.register("B", || Counter { id: 2 }).action("id", Counter::id);
        a.extend(b);
        assert_eq!(a.resolve("B", "id").unwrap()(&Params::new()).body, "2");
        assert!(a.resolve("A", "id").is_some());
    }

    #[test]
    fn test_into_handler() {
        assert!(matches!("A::b".into_handler(), Handler::Controller(r) if r == "A::b"));
        let handler = (|_: &Params| Response::ok()).into_handler();
        assert!(matches!(handler, Handler::Inline(_)));
    }

    #[test]
    fn test_split_reference() {
        assert_eq!(split_reference("User::show", "::"), Some(("User", "show")));
        assert_eq!(split_reference("User@show", "@"), Some(("User", "show")));
        assert_eq!(split_reference("User", "::"), None);
        assert_eq!(split_reference("::show", "::"), None);
    }

    #[test]
    fn test_qualify() {
        assert_eq!(qualify(None, "User", "\\"), "User");
        assert_eq!(qualify(Some(""), "User", "\\"), "User");
        assert_eq!(qualify(Some("App\\Http"), "User", "\\"), "App\\Http\\User");
        assert_eq!(qualify(Some("App\\"), "User", "\\"), "App\\User");
    }
}
