//! A router that accepts new routes while serving.
//!
//! A plain [`Router`] is built up front and then only read, which needs no
//! locking. [`SharedRouter`] is the opt-in alternative for registering routes
//! after traffic has started: every access goes through a reader-writer lock,
//! so lookups take a read lock and registration a write lock.
//!
//! ```
//! use pathmux::Router;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let shared = Arc::new(Router::new().into_shared());
//! shared.handle("GET", "/ping", "pong").unwrap();
//!
//! let reader = Arc::clone(&shared);
//! let status = thread::spawn(move || reader.lookup("GET", "/ping", "").status())
//!     .join()
//!     .unwrap();
//! assert_eq!(status.as_u16(), 200);
//! ```

use crate::error::{HandlerPanic, RouteError};
use crate::handler::Handler;
use crate::info_log;
use crate::recovery::run_recovering;
use crate::router::{LookupResult, Router};
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, LookupCache};
#[cfg(feature = "cache")]
use std::sync::Mutex;

/// [`Router`] behind a reader-writer lock.
pub struct SharedRouter<H> {
    router: RwLock<Router<H>>,
    #[cfg(feature = "cache")]
    cache: Option<Mutex<LookupCache<H>>>,
}

impl<H> Router<H> {
    /// Wrap the router for concurrent registration and lookup.
    pub fn into_shared(self) -> SharedRouter<H> {
        SharedRouter::new(self)
    }
}

impl<H> SharedRouter<H> {
    /// Wrap `router`. No lookup cache is attached; see
    /// [`with_cache`](Self::with_cache).
    pub fn new(router: Router<H>) -> Self {
        info_log!(
            "Shared router ready at generation {}",
            router.generation()
        );
        Self {
            router: RwLock::new(router),
            #[cfg(feature = "cache")]
            cache: None,
        }
    }

    /// Memoize lookups in an LRU cache of `capacity` entries. Registration
    /// through this wrapper invalidates it.
    #[cfg(feature = "cache")]
    pub fn with_cache(mut self, capacity: usize) -> Self {
        self.cache = Some(Mutex::new(LookupCache::with_capacity(capacity)));
        self
    }

    /// Statistics of the lookup cache, if one is configured.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| {
            cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .stats()
                .clone()
        })
    }

    // Poisoning is ignored; a failed registration leaves the trie usable.
    fn read(&self) -> RwLockReadGuard<'_, Router<H>> {
        self.router.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Router<H>> {
        self.router.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the router, for groups, middleware
    /// and configuration changes.
    pub fn update<R>(&self, f: impl FnOnce(&mut Router<H>) -> R) -> R {
        f(&mut self.write())
    }

    /// See [`Router::generation`].
    pub fn generation(&self) -> u64 {
        self.read().generation()
    }

    /// See [`Router::dump`].
    pub fn dump(&self) -> String {
        self.read().dump()
    }

    /// Unwrap the router.
    pub fn into_inner(self) -> Router<H> {
        self.router
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<H: Handler + Clone> SharedRouter<H> {
    /// See [`Router::handle`].
    pub fn handle(&self, method: &str, pattern: &str, handler: H) -> Result<(), RouteError> {
        self.write().handle(method, pattern, handler)
    }

    /// See [`Router::lookup`].
    pub fn lookup(&self, method: &str, request_uri: &str, url_path: &str) -> LookupResult<H> {
        let router = self.read();

        #[cfg(feature = "cache")]
        if let Some(cache) = &self.cache {
            let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
            return router.lookup_cached(&mut cache, method, request_uri, url_path);
        }

        router.lookup(method, request_uri, url_path)
    }

    /// See [`Router::serve`]. The read lock is released before `dispatch`
    /// runs, so handlers may register routes.
    pub fn serve<R>(
        &self,
        method: &str,
        request_uri: &str,
        url_path: &str,
        dispatch: impl FnOnce(LookupResult<H>) -> R,
    ) -> Result<R, HandlerPanic> {
        let result = self.lookup(method, request_uri, url_path);
        let hook = self.read().panic_hook();
        run_recovering(hook.as_ref(), method, request_uri, move || dispatch(result))
    }
}

impl<H> From<Router<H>> for SharedRouter<H> {
    fn from(router: Router<H>) -> Self {
        Self::new(router)
    }
}

impl<H> fmt::Debug for SharedRouter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRouter")
            .field("router", &*self.read())
            .finish()
    }
}
