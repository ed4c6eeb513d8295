//! Route resolution seam.
//!
//! Matching a path to a view is the host's business. The controller only
//! needs something that answers "which handler owns this path?":
//!
//! ```
//! use gpui_navguard::{resolver_fn, RouteData, RouteResolver};
//!
//! let resolver = resolver_fn(|path| match path {
//!     "/" => Some(RouteData::new("Index")),
//!     "/Record/Editor" => Some(RouteData::new("RecordEditor")),
//!     _ => None,
//! });
//!
//! assert_eq!(resolver.resolve("/Record/Editor").unwrap().handler, "RecordEditor");
//! assert!(resolver.resolve("/nope").is_none());
//! ```

use crate::params::RouteParams;

/// A successful route lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteData {
    /// Identifies the view type that owns the path.
    pub handler: String,
    /// Path parameters extracted by the resolver.
    pub params: RouteParams,
}

impl RouteData {
    /// Route data without parameters.
    pub fn new(handler: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            params: RouteParams::new(),
        }
    }

    /// Attach path parameters.
    pub fn with_params(mut self, params: RouteParams) -> Self {
        self.params = params;
        self
    }
}

/// Looks up the handler for a bare, base-relative path such as
/// `/Record/Editor`.
pub trait RouteResolver: 'static {
    /// Return the owning handler, or `None` when nothing matches.
    fn resolve(&self, path: &str) -> Option<RouteData>;
}

/// Create a resolver from a closure.
pub const fn resolver_fn<F>(f: F) -> FnResolver<F>
where
    F: Fn(&str) -> Option<RouteData> + 'static,
{
    FnResolver { f }
}

/// Resolver created by [`resolver_fn`].
pub struct FnResolver<F> {
    f: F,
}

impl<F> RouteResolver for FnResolver<F>
where
    F: Fn(&str) -> Option<RouteData> + 'static,
{
    fn resolve(&self, path: &str) -> Option<RouteData> {
        (self.f)(path)
    }
}
