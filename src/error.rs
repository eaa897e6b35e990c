//! Error types for the router.
//!
//! Two kinds of failure are reported as Rust errors:
//!
//! - [`RouteError`]: a route could not be registered. These are programming
//!   errors in the routing table (malformed patterns, ambiguous parameter
//!   names, duplicate handlers) and are returned from every registration call.
//! - [`HandlerPanic`]: a handler panicked while serving a request and the
//!   router's panic hook converted the unwind into a value.
//!
//! Request-time outcomes such as "not found" or "method not allowed" are not
//! errors; they are variants of [`LookupResult`](crate::LookupResult).
//!
//! # Examples
//!
//! ```
//! use pathmux::{Router, RouteError};
//!
//! let mut router = Router::new();
//! router.get("/users/:id", "show").unwrap();
//!
//! let err = router.get("/users/:id", "show again").unwrap_err();
//! assert!(matches!(err, RouteError::DuplicateHandler { .. }));
//! ```

use thiserror::Error;

/// Reasons a route registration is rejected.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RouteError {
    /// The pattern (after prefixing with the group path) is empty.
    #[error("cannot register an empty path")]
    EmptyPath,

    /// The pattern does not start with `/`.
    #[error("path {pattern:?} must start with a slash")]
    MissingLeadingSlash { pattern: String },

    /// A group was created with an empty or malformed prefix.
    #[error("group path {prefix:?} must be non-empty and start with a slash")]
    InvalidGroupPath { prefix: String },

    /// A `:name` or `*name` token has no name.
    #[error("parameter without a name in {pattern:?}")]
    EmptyParamName { pattern: String },

    /// Something follows a `*name` token.
    #[error("catch-all must be the last segment in {pattern:?}")]
    CatchAllNotLast { pattern: String },

    /// Two catch-alls with different names at the same position.
    #[error("catch-all *{new} in {pattern:?} conflicts with existing catch-all *{existing}")]
    ConflictingCatchAll {
        pattern: String,
        existing: String,
        new: String,
    },

    /// Two routes end at the same node with different parameter names.
    #[error("parameters {new:?} in {pattern:?} are ambiguous with {existing:?}")]
    AmbiguousParams {
        pattern: String,
        existing: Vec<String>,
        new: Vec<String>,
    },

    /// A `~regex` token failed to compile.
    #[error("regular expression in {pattern:?} is invalid")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The node already has a handler for this method.
    #[error("{pattern:?} already handles {method}")]
    DuplicateHandler { pattern: String, method: String },
}

impl RouteError {
    /// The pattern the error refers to, when there is one.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::EmptyPath => None,
            Self::InvalidGroupPath { prefix } => Some(prefix),
            Self::MissingLeadingSlash { pattern }
            | Self::EmptyParamName { pattern }
            | Self::CatchAllNotLast { pattern }
            | Self::ConflictingCatchAll { pattern, .. }
            | Self::AmbiguousParams { pattern, .. }
            | Self::InvalidRegex { pattern, .. }
            | Self::DuplicateHandler { pattern, .. } => Some(pattern),
        }
    }
}

/// A handler panic caught by [`Router::serve`](crate::Router::serve).
#[derive(Debug, Clone, Error)]
#[error("handler for {method} {request_uri} panicked: {message}")]
pub struct HandlerPanic {
    /// Request method.
    pub method: String,
    /// Raw request target as passed to the router.
    pub request_uri: String,
    /// Panic payload rendered as text.
    pub message: String,
}

// ============================================================================
// Tests
// ============================================================================
