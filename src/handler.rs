//! Handler capability and middleware.
//!
//! The router never calls handlers. It stores values of any type `H` that
//! implements [`Handler`] and hands the matching one back from a lookup, so
//! the same trie can route closures, boxed services, opaque ids or anything
//! else a server layer wants to dispatch on.
//!
//! The only thing the matcher needs to know about a handler is whether the
//! slot is usable: a match whose handler is not valid keeps searching lower
//! priority branches and, failing that, produces a 405.

use std::collections::HashMap;
use std::sync::Arc;

/// A value that can be registered as a route target.
///
/// # Example
///
/// ```
/// use pathmux::Handler;
///
/// #[derive(Clone)]
/// struct Endpoint(Option<fn() -> &'static str>);
///
/// impl Handler for Endpoint {
///     fn is_valid(&self) -> bool {
///         self.0.is_some()
///     }
/// }
///
/// assert!(Endpoint(Some(|| "hi")).is_valid());
/// assert!(!Endpoint(None).is_valid());
/// ```
pub trait Handler {
    /// Whether this slot holds something that can serve a request.
    fn is_valid(&self) -> bool {
        true
    }
}

impl<T: ?Sized> Handler for Arc<T> {}

impl<T: ?Sized> Handler for Box<T> {}

impl<H: Handler> Handler for Option<H> {
    fn is_valid(&self) -> bool {
        self.as_ref().is_some_and(Handler::is_valid)
    }
}

impl Handler for &'static str {
    fn is_valid(&self) -> bool {
        !self.is_empty()
    }
}

impl Handler for String {
    fn is_valid(&self) -> bool {
        !self.is_empty()
    }
}

impl Handler for usize {}

/// Wraps a handler in another handler of the same type.
pub type Middleware<H> = Arc<dyn Fn(H) -> H + Send + Sync>;

/// Apply a middleware stack so the first entry ends up outermost.
pub(crate) fn with_middlewares<H>(mut handler: H, stack: &[Middleware<H>]) -> H {
    for middleware in stack.iter().rev() {
        handler = middleware(handler);
    }
    handler
}

/// Methods registered in a handler map, sorted.
pub(crate) fn registered_methods<H>(handlers: &HashMap<String, H>) -> Vec<String> {
    let mut methods: Vec<String> = handlers.keys().cloned().collect();
    methods.sort();
    methods
}
