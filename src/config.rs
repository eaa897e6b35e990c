//! Router configuration.
//!
//! [`RouterConfig`] is a plain struct with public fields and chainable
//! `with_*` setters. With the `serde` feature it can be read from any serde
//! format; missing keys take their default values.
//!
//! ```
//! use pathmux::{PathSource, RedirectBehavior, RouterConfig};
//!
//! let config = RouterConfig::default()
//!     .with_redirect_behavior(RedirectBehavior::Redirect308)
//!     .with_method_redirect_behavior("GET", RedirectBehavior::Redirect301)
//!     .with_path_source(PathSource::UrlPath);
//!
//! assert_eq!(config.redirect_behavior_for("POST"), RedirectBehavior::Redirect308);
//! assert_eq!(config.redirect_behavior_for("GET"), RedirectBehavior::Redirect301);
//! ```

use http::StatusCode;
use std::collections::HashMap;

/// How the router answers a request that needs a redirect (trailing slash or
/// unclean path).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RedirectBehavior {
    /// `301 Moved Permanently`. Clients may turn the method into `GET`.
    #[default]
    Redirect301,
    /// `307 Temporary Redirect`. Method and body are kept.
    Redirect307,
    /// `308 Permanent Redirect`. Method and body are kept.
    Redirect308,
    /// No redirect: serve the matched route directly.
    UseHandler,
}

impl RedirectBehavior {
    /// Status code to send, or `None` for [`UseHandler`](Self::UseHandler).
    pub fn status_code(self) -> Option<StatusCode> {
        match self {
            Self::Redirect301 => Some(StatusCode::MOVED_PERMANENTLY),
            Self::Redirect307 => Some(StatusCode::TEMPORARY_REDIRECT),
            Self::Redirect308 => Some(StatusCode::PERMANENT_REDIRECT),
            Self::UseHandler => None,
        }
    }
}

/// Where the lookup path is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathSource {
    /// The raw request target, still percent-encoded; any `?query` is
    /// dropped. Encoded slashes inside a segment stay inside it.
    #[default]
    RequestUri,
    /// The already-decoded URL path.
    UrlPath,
}

/// Behaviour switches for a [`Router`](crate::Router).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[allow(clippy::struct_excessive_bools)]
pub struct RouterConfig {
    /// Registering `GET` also registers the handler for `HEAD` unless a
    /// `HEAD` handler exists. An explicit `HEAD` may replace it later.
    pub head_can_use_get: bool,

    /// Redirect `/foo` to `/foo/` (or the reverse) when only the other form
    /// is registered.
    pub redirect_trailing_slash: bool,

    /// Apply the trailing-slash redirect to catch-all routes too.
    pub remove_catch_all_trailing_slash: bool,

    /// When nothing matches, retry with the cleaned path and redirect to it.
    pub redirect_clean_path: bool,

    /// Default redirect policy.
    pub redirect_behavior: RedirectBehavior,

    /// Per-method overrides of [`redirect_behavior`](Self::redirect_behavior).
    pub redirect_method_behavior: HashMap<String, RedirectBehavior>,

    /// Whether lookups match the raw request target or the decoded path.
    pub path_source: PathSource,

    /// Also register the percent-escaped form of every pattern, so raw
    /// request targets with escapes still match routes written unescaped.
    pub escape_added_routes: bool,

    /// Lower-case patterns at registration and paths at lookup.
    pub case_insensitive: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            head_can_use_get: true,
            redirect_trailing_slash: true,
            remove_catch_all_trailing_slash: false,
            redirect_clean_path: true,
            redirect_behavior: RedirectBehavior::Redirect301,
            redirect_method_behavior: HashMap::new(),
            path_source: PathSource::RequestUri,
            escape_added_routes: false,
            case_insensitive: false,
        }
    }
}

impl RouterConfig {
    /// Same as [`RouterConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set [`head_can_use_get`](Self::head_can_use_get).
    pub fn with_head_can_use_get(mut self, enabled: bool) -> Self {
        self.head_can_use_get = enabled;
        self
    }

    /// Set [`redirect_trailing_slash`](Self::redirect_trailing_slash).
    pub fn with_redirect_trailing_slash(mut self, enabled: bool) -> Self {
        self.redirect_trailing_slash = enabled;
        self
    }

    /// Set [`remove_catch_all_trailing_slash`](Self::remove_catch_all_trailing_slash).
    pub fn with_remove_catch_all_trailing_slash(mut self, enabled: bool) -> Self {
        self.remove_catch_all_trailing_slash = enabled;
        self
    }

    /// Set [`redirect_clean_path`](Self::redirect_clean_path).
    pub fn with_redirect_clean_path(mut self, enabled: bool) -> Self {
        self.redirect_clean_path = enabled;
        self
    }

    /// Set the default [`redirect_behavior`](Self::redirect_behavior).
    pub fn with_redirect_behavior(mut self, behavior: RedirectBehavior) -> Self {
        self.redirect_behavior = behavior;
        self
    }

    /// Override the redirect policy for one method.
    pub fn with_method_redirect_behavior(
        mut self,
        method: impl Into<String>,
        behavior: RedirectBehavior,
    ) -> Self {
        self.redirect_method_behavior.insert(method.into(), behavior);
        self
    }

    /// Set [`path_source`](Self::path_source).
    pub fn with_path_source(mut self, source: PathSource) -> Self {
        self.path_source = source;
        self
    }

    /// Set [`escape_added_routes`](Self::escape_added_routes).
    pub fn with_escape_added_routes(mut self, enabled: bool) -> Self {
        self.escape_added_routes = enabled;
        self
    }

    /// Set [`case_insensitive`](Self::case_insensitive).
    pub fn with_case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    /// Redirect policy for `method`, honouring per-method overrides.
    pub fn redirect_behavior_for(&self, method: &str) -> RedirectBehavior {
        self.redirect_method_behavior
            .get(method)
            .copied()
            .unwrap_or(self.redirect_behavior)
    }
}
