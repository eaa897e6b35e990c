//! Test utilities for router integration tests
//!
//! Provides fixtures, helpers, and assertion utilities shared by the test
//! crates under `tests/`.

#![allow(dead_code)]

use pathmux::*;

/// Initialise `env_logger` once so `RUST_LOG=pathmux=trace` shows router logs.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Router whose handler for every route is the route's own pattern.
pub fn router_with(routes: &[(&str, &'static str)]) -> Router<&'static str> {
    router_with_config(RouterConfig::default(), routes)
}

pub fn router_with_config(
    config: RouterConfig,
    routes: &[(&str, &'static str)],
) -> Router<&'static str> {
    init_logging();
    let mut router = Router::with_config(config);
    for &(method, pattern) in routes {
        router
            .handle(method, pattern, pattern)
            .unwrap_or_else(|e| panic!("registering {method} {pattern}: {e}"));
    }
    router
}

/// Config that matches the trie exactly: no redirects of any kind.
pub fn exact_config() -> RouterConfig {
    RouterConfig::default()
        .with_redirect_trailing_slash(false)
        .with_redirect_clean_path(false)
}

/// Assert that a lookup matched `route` with exactly `params`, in order.
pub fn assert_found<H: std::fmt::Debug>(
    result: &LookupResult<H>,
    route: &str,
    params: &[(&str, &str)],
) {
    match result {
        LookupResult::Found(m) => {
            assert_eq!(m.route, route, "matched the wrong route");
            let got: Vec<(&str, &str)> = m.params.iter().collect();
            assert_eq!(got, params, "wrong parameters for route {route}");
        }
        other => panic!("expected a match for {route}, got {other:?}"),
    }
}

/// Assert that a lookup produced a redirect with `status` to `location`.
pub fn assert_redirect<H: std::fmt::Debug>(result: &LookupResult<H>, status: u16, location: &str) {
    match result {
        LookupResult::Redirect(r) => {
            assert_eq!(r.status.as_u16(), status, "wrong redirect status");
            assert_eq!(r.location, location, "wrong redirect location");
        }
        other => panic!("expected a redirect to {location}, got {other:?}"),
    }
}

pub fn assert_not_found<H: std::fmt::Debug>(result: &LookupResult<H>) {
    assert!(
        matches!(result, LookupResult::NotFound),
        "expected not found, got {result:?}"
    );
}

/// Assert a 405 whose `Allow` list is `allowed`.
pub fn assert_method_not_allowed<H: std::fmt::Debug>(result: &LookupResult<H>, allowed: &[&str]) {
    match result {
        LookupResult::MethodNotAllowed { allowed: got, .. } => {
            assert_eq!(got, allowed, "wrong allowed methods");
        }
        other => panic!("expected method not allowed, got {other:?}"),
    }
}
