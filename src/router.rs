//! The router: route registration and request lookup.
//!
//! [`Router`] owns the trie. Registration goes through [`Router::handle`] (or
//! a method shortcut, or a [`Group`]); lookup goes through [`Router::lookup`],
//! which turns a method and request target into a [`LookupResult`].
//!
//! # Routing rules
//!
//! At each position in the path the most specific route kind wins:
//!
//! 1. static text
//! 2. `:name` wildcards (one non-empty segment)
//! 3. `~regex` routes, tried in registration order against the rest of the path
//! 4. `*name` catch-alls
//!
//! A branch that matches the path but has no handler for the method does not
//! stop the search. If no branch has a handler, the result is
//! [`LookupResult::MethodNotAllowed`] listing what the best matching route
//! does accept.
//!
//! # Trailing slashes
//!
//! A pattern registered with a trailing slash makes requests without one
//! redirect to the slashed form, and the other way round. The flag is stored
//! once per route, so it applies to every method at that route. Catch-all
//! routes are exempt unless
//! [`remove_catch_all_trailing_slash`](RouterConfig::remove_catch_all_trailing_slash)
//! is set.
//!
//! # Example
//!
//! ```
//! use pathmux::{LookupResult, Router};
//!
//! let mut router = Router::new();
//! router.get("/about", "about").unwrap();
//! router.get("/posts/", "post index").unwrap();
//! router.get("/posts/:id", "post").unwrap();
//!
//! match router.lookup("GET", "/posts/42", "/posts/42") {
//!     LookupResult::Found(m) => {
//!         assert_eq!(m.handler, "post");
//!         assert_eq!(m.route, "/posts/:id");
//!         assert_eq!(m.params.get("id"), Some("42"));
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//!
//! match router.lookup("GET", "/posts?page=2", "/posts") {
//!     LookupResult::Redirect(r) => assert_eq!(r.location, "/posts/?page=2"),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use crate::config::{PathSource, RouterConfig};
use crate::error::{HandlerPanic, RouteError};
use crate::group::{join_prefix, Group};
use crate::handler::{registered_methods, with_middlewares, Handler, Middleware};
use crate::node::{Node, RouteKind};
use crate::params::Params;
use crate::path::{clean_path, encode_path, escape_route, unescape, RequestTarget};
use crate::recovery::{run_recovering, PanicHandler};
use crate::{debug_log, trace_log, warn_log};
use http::StatusCode;
use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_ROUTER_ID: AtomicU64 = AtomicU64::new(0);

/// Generates `get`, `post`, … shortcuts for a type with a `handle` method.
macro_rules! method_shortcuts {
    ($($name:ident => $method:literal),* $(,)?) => {
        $(
            #[doc = concat!("Shortcut for `handle(\"", $method, "\", pattern, handler)`.")]
            pub fn $name(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
                self.handle($method, pattern, handler)
            }
        )*
    };
}

pub(crate) use method_shortcuts;

// ============================================================================
// Lookup results
// ============================================================================

/// A successful match.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch<H> {
    /// Handler to run, middleware already applied.
    pub handler: H,
    /// Pattern of the matched route as it was registered.
    pub route: String,
    /// Kind of the last token of the matched route.
    pub kind: RouteKind,
    /// Captured parameters in pattern order.
    pub params: Params,
}

/// A redirect to the canonical form of the requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// `301`, `307` or `308`, from the [`RedirectBehavior`](crate::RedirectBehavior)
    /// for the request method.
    pub status: StatusCode,
    /// Decoded target path.
    pub path: String,
    /// Value for the `Location` header: encoded path plus the original query
    /// and fragment.
    pub location: String,
}

impl Redirect {
    fn new(status: StatusCode, path: String, target: &RequestTarget<'_>) -> Self {
        let mut location = encode_path(&path).into_owned();
        if let Some(query) = target.query.filter(|q| !q.is_empty()) {
            location.push('?');
            location.push_str(query);
        }
        if let Some(fragment) = target.fragment.filter(|f| !f.is_empty()) {
            location.push('#');
            location.push_str(fragment);
        }
        Self {
            status,
            path,
            location,
        }
    }
}

/// Outcome of [`Router::lookup`].
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult<H> {
    /// A route with a valid handler for the method matched.
    Found(RouteMatch<H>),
    /// The request should be sent to the canonical path instead.
    Redirect(Redirect),
    /// No route matches the path.
    NotFound,
    /// The path matched a route that has no handler for the method.
    MethodNotAllowed {
        /// Pattern of the route that matched.
        route: Option<String>,
        /// Methods the route does handle, sorted.
        allowed: Vec<String>,
    },
}

impl<H> LookupResult<H> {
    /// `true` for a match or for a redirect that leads to one.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_) | Self::Redirect(_))
    }

    /// HTTP status a server would answer with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Found(_) => StatusCode::OK,
            Self::Redirect(redirect) => redirect.status,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Handler of a [`Found`](Self::Found) result.
    pub fn handler(&self) -> Option<&H> {
        match self {
            Self::Found(m) => Some(&m.handler),
            _ => None,
        }
    }

    /// Parameters of a [`Found`](Self::Found) result.
    pub fn params(&self) -> Option<&Params> {
        match self {
            Self::Found(m) => Some(&m.params),
            _ => None,
        }
    }

    /// Matched route pattern, if the path matched one.
    pub fn route(&self) -> Option<&str> {
        match self {
            Self::Found(m) => Some(&m.route),
            Self::MethodNotAllowed { route, .. } => route.as_deref(),
            _ => None,
        }
    }

    /// Consume the result, keeping only a match.
    pub fn into_match(self) -> Option<RouteMatch<H>> {
        match self {
            Self::Found(m) => Some(m),
            _ => None,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

/// HTTP path router over handlers of type `H`.
pub struct Router<H> {
    root: Node<H>,
    config: RouterConfig,
    stack: Vec<Middleware<H>>,
    options_handler: Option<H>,
    panic_handler: Option<PanicHandler>,
    id: u64,
    generation: u64,
}

impl<H> Router<H> {
    /// Create an empty router with the default [`RouterConfig`].
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Create an empty router with `config`.
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            root: Node::root(),
            config,
            stack: Vec::new(),
            options_handler: None,
            panic_handler: None,
            id: NEXT_ROUTER_ID.fetch_add(1, Ordering::Relaxed),
            generation: 0,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Mutable access to the configuration. Counts as a change of the route
    /// table for caching purposes.
    pub fn config_mut(&mut self) -> &mut RouterConfig {
        self.generation += 1;
        &mut self.config
    }

    /// Counter bumped by every change that can alter lookup results.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Append a middleware to the root stack. Only routes registered
    /// afterwards, and groups created afterwards, are wrapped.
    pub fn use_middleware(&mut self, middleware: impl Fn(H) -> H + Send + Sync + 'static) {
        self.stack.push(Arc::new(middleware));
    }

    /// Handler for `OPTIONS` requests whose route has no `OPTIONS` handler.
    pub fn set_options_handler(&mut self, handler: H) {
        self.options_handler = Some(handler);
        self.generation += 1;
    }

    /// Install the hook that makes [`serve`](Self::serve) catch handler
    /// panics.
    pub fn set_panic_handler(&mut self, hook: impl Fn(&HandlerPanic) + Send + Sync + 'static) {
        self.panic_handler = Some(Arc::new(hook));
    }

    /// Text rendering of the trie, one node per line.
    ///
    /// Each line shows the priority, the node's path (prefixed with `:`, `~`
    /// or `*` for dynamic nodes), the number of static children, the
    /// registered methods and the parameter names.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.root.dump_tree("", &mut out);
        out
    }

    /// Identity of this router, unique within the process.
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn panic_hook(&self) -> Option<PanicHandler> {
        self.panic_handler.clone()
    }
}

impl<H: Handler + Clone> Router<H> {
    /// Register `handler` for `method` requests matching `pattern`.
    ///
    /// # Pattern syntax
    ///
    /// | Token        | Matches                                              |
    /// |--------------|------------------------------------------------------|
    /// | `text`       | the literal text                                     |
    /// | `:name`      | one non-empty segment, bound to `name`               |
    /// | `*name`      | the rest of the path, bound to `name` (last only)    |
    /// | `~regex`     | the rest of the path if `regex` matches (last only); named groups become parameters |
    /// | `\:` `\*` `\~` `\\` | a literal `:`, `*`, `~` or `\`                |
    pub fn handle(&mut self, method: &str, pattern: &str, handler: H) -> Result<(), RouteError> {
        let handler = with_middlewares(handler, &self.stack);
        self.add_route(method, "", pattern, handler)
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

    /// Create a group whose routes share `prefix` and a copy of the current
    /// middleware stack.
    pub fn group(&mut self, prefix: &str) -> Result<Group<'_, H>, RouteError> {
        let path = join_prefix("", prefix)?;
        let stack = self.stack.clone();
        Ok(Group::new(self, path, stack))
    }

    /// Insert a route whose handler is already wrapped in middleware.
    pub(crate) fn add_route(
        &mut self,
        method: &str,
        prefix: &str,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        self.generation += 1;
        self.try_add_route(method, prefix, pattern, handler)
            .map_err(|err| {
                warn_log!("Rejected route {} {}{}: {}", method, prefix, pattern, err);
                err
            })
    }

    fn try_add_route(
        &mut self,
        method: &str,
        prefix: &str,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        if !pattern.is_empty() && !pattern.starts_with('/') {
            return Err(RouteError::MissingLeadingSlash {
                pattern: pattern.to_string(),
            });
        }

        let full_path = format!("{prefix}{pattern}");
        if full_path.is_empty() {
            return Err(RouteError::EmptyPath);
        }

        let mut path = full_path.as_str();
        let mut add_slash = false;
        if path.len() > 1 && self.config.redirect_trailing_slash {
            if let Some(stripped) = path.strip_suffix('/') {
                path = stripped;
                add_slash = true;
            }
        }

        if self.config.escape_added_routes {
            let escaped = escape_route(path);
            if escaped != path {
                self.insert(method, &full_path, &escaped, handler.clone(), add_slash)?;
            }
        }
        self.insert(method, &full_path, path, handler, add_slash)?;

        debug_log!("Registered {} {}", method, full_path);
        Ok(())
    }

    fn insert(
        &mut self,
        method: &str,
        full_path: &str,
        path: &str,
        handler: H,
        add_slash: bool,
    ) -> Result<(), RouteError> {
        let path = if self.config.case_insensitive {
            Cow::Owned(fold_case(path))
        } else {
            Cow::Borrowed(path)
        };
        let head_can_use_get = self.config.head_can_use_get;

        let node = self
            .root
            .add_path(full_path, &path[1..], Vec::new(), false)?;
        if add_slash {
            node.add_slash = true;
        }

        let implicit_head = (head_can_use_get
            && method == "GET"
            && !node.handlers.contains_key("HEAD"))
        .then(|| handler.clone());

        node.set_handler(full_path, method, handler, false)?;
        node.full_path.get_or_insert_with(|| full_path.to_string());
        if let Some(head) = implicit_head {
            node.set_handler(full_path, "HEAD", head, true)?;
        }
        Ok(())
    }

    /// Find the route for a request.
    ///
    /// `request_uri` is the raw request target (path, optional `?query`).
    /// `url_path` is the decoded path; pass `""` to have it decoded from
    /// `request_uri`. Which of the two is matched against depends on
    /// [`RouterConfig::path_source`]; redirects are built from the decoded
    /// path and keep the query of `request_uri`.
    pub fn lookup(&self, method: &str, request_uri: &str, url_path: &str) -> LookupResult<H> {
        let target = RequestTarget::parse(request_uri);
        let decoded = if url_path.is_empty() {
            unescape(target.path)
        } else {
            Cow::Borrowed(url_path)
        };

        let mut path: Cow<'_, str> = match self.config.path_source {
            PathSource::RequestUri if !target.path.is_empty() => Cow::Borrowed(target.path),
            _ => decoded.clone(),
        };
        let mut unescaped = decoded;
        if self.config.case_insensitive {
            path = Cow::Owned(path.to_lowercase());
            unescaped = Cow::Owned(unescaped.to_lowercase());
        }

        if path.is_empty() {
            trace_log!("Lookup {} {:?}: empty path", method, request_uri);
            return LookupResult::NotFound;
        }

        let trailing_slash = path.len() > 1 && path.ends_with('/');
        if trailing_slash && self.config.redirect_trailing_slash {
            path = strip_trailing_slash(path);
            unescaped = strip_trailing_slash(unescaped);
        }

        let behavior = self.config.redirect_behavior_for(method);
        let found = path
            .strip_prefix('/')
            .and_then(|rest| self.root.search(method, rest));

        let found = match found {
            Some(found) => found,
            None if self.config.redirect_clean_path => {
                let cleaned = clean_path(&unescaped);
                let Some(found) = self.root.search(method, &cleaned[1..]) else {
                    trace_log!("Lookup {} {}: not found", method, request_uri);
                    return LookupResult::NotFound;
                };
                // A target that is already the encoded clean path would
                // redirect to itself.
                let redirect_status = behavior
                    .status_code()
                    .filter(|_| encode_path(&cleaned) != target.path);
                if let Some(status) = redirect_status {
                    debug_log!("Redirecting {} {} to clean path {}", method, request_uri, cleaned);
                    return LookupResult::Redirect(Redirect::new(
                        status,
                        cleaned.into_owned(),
                        &target,
                    ));
                }
                found
            }
            None => {
                trace_log!("Lookup {} {}: not found", method, request_uri);
                return LookupResult::NotFound;
            }
        };

        let node = found.node;
        let handler = match found.handler {
            Some(handler) => handler,
            None => match self
                .options_handler
                .as_ref()
                .filter(|h| method == "OPTIONS" && h.is_valid())
            {
                Some(handler) => handler,
                None => {
                    let allowed = registered_methods(&node.handlers);
                    trace_log!(
                        "Lookup {} {}: method not allowed, allowed {:?}",
                        method,
                        request_uri,
                        allowed
                    );
                    return LookupResult::MethodNotAllowed {
                        route: node.full_path.clone(),
                        allowed,
                    };
                }
            },
        };

        let check_slash =
            node.kind != RouteKind::CatchAll || self.config.remove_catch_all_trailing_slash;
        if check_slash && self.config.redirect_trailing_slash && trailing_slash != node.add_slash {
            if let Some(status) = behavior.status_code() {
                let redirect_path = if node.add_slash {
                    format!("{unescaped}/")
                } else if path.as_ref() != "/" {
                    unescaped.to_string()
                } else {
                    String::new()
                };
                if !redirect_path.is_empty() {
                    debug_log!(
                        "Redirecting {} {} to {} (trailing slash)",
                        method,
                        request_uri,
                        redirect_path
                    );
                    return LookupResult::Redirect(Redirect::new(status, redirect_path, &target));
                }
            }
        }

        let route = node.full_path.clone().unwrap_or_default();
        let kind = node.kind;
        let params = found.into_params();
        trace_log!("Lookup {} {}: matched {}", method, request_uri, route);

        LookupResult::Found(RouteMatch {
            handler: handler.clone(),
            route,
            kind,
            params,
        })
    }

    /// Look up a request and hand the result to `dispatch`.
    ///
    /// With a panic hook installed, a panic inside `dispatch` is caught,
    /// passed to the hook and returned as [`HandlerPanic`]. Without one it
    /// propagates.
    pub fn serve<R>(
        &self,
        method: &str,
        request_uri: &str,
        url_path: &str,
        dispatch: impl FnOnce(LookupResult<H>) -> R,
    ) -> Result<R, HandlerPanic> {
        let result = self.lookup(method, request_uri, url_path);
        run_recovering(self.panic_handler.as_ref(), method, request_uri, move || {
            dispatch(result)
        })
    }
}

/// Lower-case a pattern up to its `~regex` token; the regex source keeps its
/// case so classes like `\D` or `\p{Lu}` keep their meaning.
fn fold_case(pattern: &str) -> String {
    match pattern.find("/~") {
        Some(i) => {
            let (head, regex) = pattern.split_at(i + 1);
            format!("{}{regex}", head.to_lowercase())
        }
        None => pattern.to_lowercase(),
    }
}

fn strip_trailing_slash(path: Cow<'_, str>) -> Cow<'_, str> {
    match path {
        Cow::Borrowed(p) => Cow::Borrowed(p.strip_suffix('/').unwrap_or(p)),
        Cow::Owned(mut p) => {
            if p.ends_with('/') {
                p.pop();
            }
            Cow::Owned(p)
        }
    }
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for Router<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .field("middleware", &self.stack.len())
            .field("options_handler", &self.options_handler.is_some())
            .field("panic_handler", &self.panic_handler.is_some())
            .field("generation", &self.generation)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedirectBehavior;

    fn found(result: LookupResult<&'static str>) -> RouteMatch<&'static str> {
        match result {
            LookupResult::Found(m) => m,
            other => panic!("expected a match, got {other:?}"),
        }
    }

    fn redirect(result: LookupResult<&'static str>) -> Redirect {
        match result {
            LookupResult::Redirect(r) => r,
            other => panic!("expected a redirect, got {other:?}"),
        }
    }

    #[test]
    fn test_static_match_has_no_params() {
        let mut router = Router::new();
        router.get("/about", "about").unwrap();

        let m = found(router.lookup("GET", "/about", "/about"));
        assert_eq!(m.handler, "about");
        assert_eq!(m.route, "/about");
        assert_eq!(m.kind, RouteKind::Static);
        assert!(m.params.is_empty());
    }

    #[test]
    fn test_query_is_ignored_for_matching() {
        let mut router = Router::new();
        router.get("/search", "search").unwrap();
        assert!(router.lookup("GET", "/search?q=rust", "/search").is_found());
        assert!(router.lookup("GET", "/search?", "/search").is_found());
    }

    #[test]
    fn test_missing_leading_slash() {
        let mut router: Router<&'static str> = Router::new();
        assert!(matches!(
            router.get("users", "x"),
            Err(RouteError::MissingLeadingSlash { .. })
        ));
        assert!(matches!(router.get("", "x"), Err(RouteError::EmptyPath)));
    }

    #[test]
    fn test_head_uses_get() {
        let mut router = Router::new();
        router.get("/page", "page").unwrap();
        assert_eq!(found(router.lookup("HEAD", "/page", "")).handler, "page");

        router.head("/page", "head").unwrap();
        assert_eq!(found(router.lookup("HEAD", "/page", "")).handler, "head");
        assert!(router.head("/page", "again").is_err());
    }

    #[test]
    fn test_head_can_use_get_disabled() {
        let mut router = Router::with_config(RouterConfig::new().with_head_can_use_get(false));
        router.get("/page", "page").unwrap();
        assert_eq!(
            router.lookup("HEAD", "/page", "").status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_method_not_allowed_lists_methods() {
        let mut router = Router::new();
        router.post("/form", "submit").unwrap();
        router.put("/form", "replace").unwrap();

        match router.lookup("GET", "/form", "/form") {
            LookupResult::MethodNotAllowed { route, allowed } => {
                assert_eq!(route.as_deref(), Some("/form"));
                assert_eq!(allowed, vec!["POST", "PUT"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_options_handler_fills_gap() {
        let mut router = Router::new();
        router.get("/cors", "get").unwrap();
        router.set_options_handler("preflight");

        let m = found(router.lookup("OPTIONS", "/cors", "/cors"));
        assert_eq!(m.handler, "preflight");
        assert_eq!(m.route, "/cors");
        assert_eq!(
            router.lookup("DELETE", "/cors", "/cors").status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_trailing_slash_redirects() {
        let mut router = Router::new();
        router.get("/about", "about").unwrap();
        router.get("/posts/", "posts").unwrap();
        router.post("/posts", "new post").unwrap();

        let r = redirect(router.lookup("GET", "/about/", "/about/"));
        assert_eq!(r.status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(r.location, "/about");

        let r = redirect(router.lookup("GET", "/posts?a=1#top", "/posts"));
        assert_eq!(r.path, "/posts/");
        assert_eq!(r.location, "/posts/?a=1#top");

        // The slash flag is per route, not per method.
        let r = redirect(router.lookup("POST", "/posts", "/posts"));
        assert_eq!(r.location, "/posts/");

        assert_eq!(found(router.lookup("GET", "/posts/", "/posts/")).route, "/posts/");
    }

    #[test]
    fn test_trailing_slash_redirect_disabled() {
        let mut router =
            Router::with_config(RouterConfig::new().with_redirect_trailing_slash(false));
        router.get("/about", "about").unwrap();
        router.get("/posts/", "posts").unwrap();

        assert_eq!(router.lookup("GET", "/about/", "").status(), StatusCode::NOT_FOUND);
        assert_eq!(router.lookup("GET", "/posts", "").status(), StatusCode::NOT_FOUND);
        assert!(router.lookup("GET", "/posts/", "").is_found());
    }

    #[test]
    fn test_use_handler_skips_redirect() {
        let mut router = Router::with_config(
            RouterConfig::new().with_redirect_behavior(RedirectBehavior::UseHandler),
        );
        router.get("/about", "about").unwrap();
        assert_eq!(found(router.lookup("GET", "/about/", "")).handler, "about");
    }

    #[test]
    fn test_catch_all_keeps_trailing_slash() {
        let mut router = Router::new();
        router.get("/files/*path", "files").unwrap();
        let m = found(router.lookup("GET", "/files/a/b/", "/files/a/b/"));
        assert_eq!(m.params.get("path"), Some("a/b"));

        let mut router = Router::with_config(
            RouterConfig::new().with_remove_catch_all_trailing_slash(true),
        );
        router.get("/files/*path", "files").unwrap();
        let r = redirect(router.lookup("GET", "/files/a/b/", "/files/a/b/"));
        assert_eq!(r.location, "/files/a/b");
    }

    #[test]
    fn test_clean_path_redirect() {
        let mut router = Router::new();
        router.get("/users/:id", "user").unwrap();

        let r = redirect(router.lookup("GET", "/users/../users//7?x=y", "/users/../users//7"));
        assert_eq!(r.path, "/users/7");
        assert_eq!(r.location, "/users/7?x=y");

        let router_off = {
            let mut r = Router::with_config(RouterConfig::new().with_redirect_clean_path(false));
            r.get("/users/:id", "user").unwrap();
            r
        };
        assert_eq!(
            router_off.lookup("GET", "/users//7", "/users//7").status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_clean_path_with_use_handler_serves_match() {
        let mut router = Router::with_config(
            RouterConfig::new().with_method_redirect_behavior("GET", RedirectBehavior::UseHandler),
        );
        router.get("/users/:id", "user").unwrap();
        let m = found(router.lookup("GET", "/x/../users/7", "/x/../users/7"));
        assert_eq!(m.params.get("id"), Some("7"));
    }

    #[test]
    fn test_method_redirect_behavior() {
        let mut router = Router::with_config(
            RouterConfig::new()
                .with_redirect_behavior(RedirectBehavior::Redirect307)
                .with_method_redirect_behavior("POST", RedirectBehavior::Redirect308),
        );
        router.get("/a/", "a").unwrap();
        router.post("/a/", "a").unwrap();
        assert_eq!(
            router.lookup("GET", "/a", "/a").status(),
            StatusCode::TEMPORARY_REDIRECT
        );
        assert_eq!(
            router.lookup("POST", "/a", "/a").status(),
            StatusCode::PERMANENT_REDIRECT
        );
    }

    #[test]
    fn test_path_source() {
        let mut router = Router::new();
        router.get("/a/:b", "ab").unwrap();

        // The raw target keeps the encoded slash inside one segment.
        let m = found(router.lookup("GET", "/a/x%2Fy", "/a/x/y"));
        assert_eq!(m.params.get("b"), Some("x/y"));

        let mut router =
            Router::with_config(RouterConfig::new().with_path_source(PathSource::UrlPath));
        router.get("/a/:b", "ab").unwrap();
        assert_eq!(
            router.lookup("GET", "/a/x%2Fy", "/a/x/y").status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_case_insensitive() {
        let mut router =
            Router::with_config(RouterConfig::new().with_case_insensitive(true));
        router.get("/Users/:ID", "user").unwrap();

        let m = found(router.lookup("GET", "/USERS/Bob", "/USERS/Bob"));
        assert_eq!(m.route, "/Users/:ID");
        assert_eq!(m.params.get("id"), Some("bob"));
    }

    #[test]
    fn test_escape_added_routes() {
        let mut router =
            Router::with_config(RouterConfig::new().with_escape_added_routes(true));
        router.get("/hello world/:name", "greet").unwrap();

        let m = found(router.lookup("GET", "/hello%20world/bob", "/hello world/bob"));
        assert_eq!(m.params.get("name"), Some("bob"));
        assert_eq!(m.route, "/hello world/:name");

        let m = found(router.lookup(
            "GET",
            "/hello world/bob",
            "/hello world/bob",
        ));
        assert_eq!(m.handler, "greet");
    }

    #[test]
    fn test_root_middleware_applies_to_later_routes() {
        let mut router: Router<String> = Router::new();
        router.get("/before", "before".to_string()).unwrap();
        router.use_middleware(|h: String| format!("logged({h})"));
        router.get("/after", "after".to_string()).unwrap();

        assert_eq!(
            router.lookup("GET", "/before", "").handler().map(String::as_str),
            Some("before")
        );
        assert_eq!(
            router.lookup("GET", "/after", "").handler().map(String::as_str),
            Some("logged(after)")
        );
    }

    #[test]
    fn test_invalid_handler_is_method_not_allowed() {
        let mut router = Router::new();
        router.get("/empty", "").unwrap();
        assert_eq!(
            router.lookup("GET", "/empty", "").status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_generation_changes_on_registration() {
        let mut router = Router::new();
        let before = router.generation();
        router.get("/a", "a").unwrap();
        assert!(router.generation() > before);
        let before = router.generation();
        let _ = router.get("/a", "a");
        assert!(router.generation() > before);
    }

    #[test]
    fn test_serve_passes_result_to_dispatch() {
        let mut router = Router::new();
        router.get("/hello/:name", "hello").unwrap();

        let out = router
            .serve("GET", "/hello/ann", "", |result| {
                let m = result.into_match().unwrap();
                format!("{} {}", m.handler, m.params.get("name").unwrap())
            })
            .unwrap();
        assert_eq!(out, "hello ann");
    }

    #[test]
    fn test_serve_recovers_with_hook() {
        let mut router = Router::new();
        router.get("/boom", "boom").unwrap();
        router.set_panic_handler(|_| {});

        let err = router
            .serve("GET", "/boom", "", |_| -> () { panic!("exploded") })
            .unwrap_err();
        assert_eq!(err.message, "exploded");
        assert_eq!(err.request_uri, "/boom");
    }

    #[test]
    fn test_dump() {
        let mut router = Router::new();
        router.get("/a/:id", "a").unwrap();
        let dump = router.dump();
        assert!(dump.contains(":wildcard"));
        assert!(dump.contains("[GET HEAD]"));
        assert!(dump.contains("params [id]"));
    }
}
