//! Route groups.
//!
//! A [`Group`] is a path prefix plus a middleware stack. Routes registered
//! through it get the prefix prepended and the stack applied before they
//! reach the router. Groups nest; a child group starts with a copy of its
//! parent's stack, so middleware added to the child never leaks upward.
//!
//! ```
//! use pathmux::Router;
//!
//! let mut router: Router<String> = Router::new();
//! {
//!     let mut api = router.group("/api").unwrap();
//!     api.use_middleware(|h: String| format!("auth({h})"));
//!
//!     let mut v1 = api.group("/v1/").unwrap();
//!     v1.get("/users/:id", "user".to_string()).unwrap();
//!     assert_eq!(v1.path(), "/api/v1");
//! }
//!
//! let result = router.lookup("GET", "/api/v1/users/3", "");
//! assert_eq!(result.handler().map(String::as_str), Some("auth(user)"));
//! assert_eq!(result.route(), Some("/api/v1/users/:id"));
//! ```

use crate::error::RouteError;
use crate::handler::{with_middlewares, Handler, Middleware};
use crate::router::{method_shortcuts, Router};
use std::fmt;
use std::sync::Arc;

/// Prefix and middleware shared by a set of routes.
pub struct Group<'r, H> {
    router: &'r mut Router<H>,
    path: String,
    stack: Vec<Middleware<H>>,
}

/// Append `prefix` to a group path. The prefix must be non-empty and start
/// with `/`; a trailing `/` on the result is dropped.
pub(crate) fn join_prefix(parent: &str, prefix: &str) -> Result<String, RouteError> {
    if !prefix.starts_with('/') {
        return Err(RouteError::InvalidGroupPath {
            prefix: prefix.to_string(),
        });
    }
    let mut path = format!("{parent}{prefix}");
    if path.ends_with('/') {
        path.pop();
    }
    Ok(path)
}

impl<'r, H> Group<'r, H> {
    pub(crate) fn new(router: &'r mut Router<H>, path: String, stack: Vec<Middleware<H>>) -> Self {
        Self {
            router,
            path,
            stack,
        }
    }

    /// Full prefix of this group.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Append a middleware to this group's stack.
    pub fn use_middleware(&mut self, middleware: impl Fn(H) -> H + Send + Sync + 'static) {
        self.stack.push(Arc::new(middleware));
    }

    /// Create a nested group below this one.
    pub fn group(&mut self, prefix: &str) -> Result<Group<'_, H>, RouteError> {
        let path = join_prefix(&self.path, prefix)?;
        Ok(Group {
            router: &mut *self.router,
            path,
            stack: self.stack.clone(),
        })
    }
}

impl<H: Handler + Clone> Group<'_, H> {
    /// Register a route below this group's prefix. `pattern` may be empty to
    /// address the prefix itself.
    pub fn handle(&mut self, method: &str, pattern: &str, handler: H) -> Result<(), RouteError> {
        let handler = with_middlewares(handler, &self.stack);
        self.router.add_route(method, &self.path, pattern, handler)
    }

    method_shortcuts! {
        get => "GET",
        post => "POST",
        put => "PUT",
        delete => "DELETE",
        patch => "PATCH",
        head => "HEAD",
        options => "OPTIONS",
    }
}

impl<H> fmt::Debug for Group<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("path", &self.path)
            .field("middleware", &self.stack.len())
            .finish()
    }
}
