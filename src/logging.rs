//! Logging abstraction layer.
//!
//! The router logs through a small set of macros that forward to either the
//! [`log`](https://docs.rs/log) or [`tracing`](https://docs.rs/tracing) crate,
//! depending on which feature is enabled. Enable at most one of them.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! With neither feature enabled every macro expands to nothing.
//!
//! What gets logged where:
//!
//! - `debug_log!`: route registration, redirect decisions, cache invalidation.
//! - `trace_log!`: per-request lookup outcomes (hot path, off by default in
//!   most subscribers).
//! - `warn_log!`: registrations rejected with a [`RouteError`](crate::RouteError).
//! - `error_log!`: handler panics caught by the recovery hook.
//!
//! ```ignore
//! use pathmux::{debug_log, trace_log};
//!
//! debug_log!("Registered {} {}", method, pattern);
//! trace_log!("Lookup {} {} -> {}", method, path, status);
//! ```

/// Emit a **trace**-level log message.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!($($arg)*);
    };
}

/// Emit a **debug**-level log message.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
    };
}

/// Emit an **info**-level log message.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
        #[cfg(feature = "log")]
        ::log::info!($($arg)*);
    };
}

/// Emit a **warn**-level log message.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!($($arg)*);
    };
}

/// Emit an **error**-level log message.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
        #[cfg(feature = "log")]
        ::log::error!($($arg)*);
    };
}
