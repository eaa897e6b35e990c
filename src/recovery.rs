//! Panic recovery around handler dispatch.
//!
//! The router does not run handlers itself, but [`Router::serve`] runs the
//! caller's dispatch closure. When a [`PanicHandler`] is installed, a panic
//! inside that closure is caught, reported to the hook and turned into a
//! [`HandlerPanic`] value. Without a hook the panic unwinds into the caller
//! unchanged.
//!
//! [`Router::serve`]: crate::Router::serve

use crate::error::HandlerPanic;
use crate::error_log;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Hook called with every panic caught by [`Router::serve`](crate::Router::serve).
pub type PanicHandler = Arc<dyn Fn(&HandlerPanic) + Send + Sync>;

/// Render a panic payload as text.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run `f`, catching a panic when `hook` is set.
pub(crate) fn run_recovering<R>(
    hook: Option<&PanicHandler>,
    method: &str,
    request_uri: &str,
    f: impl FnOnce() -> R,
) -> Result<R, HandlerPanic> {
    let Some(hook) = hook else {
        return Ok(f());
    };

    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let panic = HandlerPanic {
            method: method.to_string(),
            request_uri: request_uri.to_string(),
            message: panic_message(&*payload),
        };
        error_log!("{}", panic);
        hook(&panic);
        panic
    })
}
