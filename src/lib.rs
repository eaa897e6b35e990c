//! # pathmux
//!
//! An HTTP path router built on a patricia trie.
//!
//! Routes are `(method, pattern)` pairs bound to a handler value of any type
//! implementing [`Handler`]. A lookup takes a method and request target and
//! returns a [`LookupResult`]: the handler with its captured [`Params`], a
//! [`Redirect`] to the canonical path, not found, or method not allowed.
//!
//! ## Pattern syntax
//!
//! ```text
//! /about                       static
//! /users/:id                   one segment, bound to `id`
//! /files/*path                 rest of the path, bound to `path` (last token)
//! /images/~^(?P<name>.+)\.png$ regex on the rest of the path (last token)
//! /literal/\*star              a literal `*`; also `\:`, `\~` and `\\`
//! ```
//!
//! Static text beats a wildcard, a wildcard beats a regex, and a regex beats a
//! catch-all. A more specific branch that matches the path but has no handler
//! for the method lets the search fall through to less specific ones.
//!
//! ## Quick start
//!
//! ```
//! use pathmux::{LookupResult, Router};
//!
//! let mut router = Router::new();
//! router.get("/", "index").unwrap();
//! router.get("/:year/:month", "archive").unwrap();
//! router.get("/images/*path", "static files").unwrap();
//! router.get(r"/images/~^(?P<category>\w+)-(?P<name>.+)$", "image").unwrap();
//!
//! let result = router.lookup("GET", "/images/cats-tom.jpg", "");
//! let params = result.params().unwrap();
//! assert_eq!(result.handler(), Some(&"image"));
//! assert_eq!(params.get("category"), Some("cats"));
//! assert_eq!(params.get("name"), Some("tom.jpg"));
//!
//! let result = router.lookup("GET", "/images/2014/05/may.jpg", "");
//! assert_eq!(result.params().unwrap().get("path"), Some("2014/05/may.jpg"));
//!
//! assert!(matches!(
//!     router.lookup("POST", "/2014/05", ""),
//!     LookupResult::MethodNotAllowed { .. }
//! ));
//! ```
//!
//! ## Feature flags
//!
//! | Feature   | Default | Effect                                          |
//! |-----------|---------|-------------------------------------------------|
//! | `log`     | yes     | log through the `log` crate                     |
//! | `tracing` | no      | log through the `tracing` crate                 |
//! | `cache`   | yes     | [`LookupCache`] and [`Router::lookup_cached`]   |
//! | `serde`   | no      | `Serialize`/`Deserialize` for [`RouterConfig`]  |

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod logging;

mod config;
mod error;
mod group;
mod handler;
mod matching;
mod node;
mod params;
mod path;
mod recovery;
mod router;
mod shared;
mod tree;

#[cfg(feature = "cache")]
#[cfg_attr(docsrs, doc(cfg(feature = "cache")))]
pub mod cache;

pub use config::{PathSource, RedirectBehavior, RouterConfig};
pub use error::{HandlerPanic, RouteError};
pub use group::Group;
pub use handler::{Handler, Middleware};
pub use node::RouteKind;
pub use params::Params;
pub use path::{clean_path, encode_path, escape_route, unescape, RequestTarget};
pub use recovery::{panic_message, PanicHandler};
pub use router::{LookupResult, Redirect, RouteMatch, Router};
pub use shared::SharedRouter;

#[cfg(feature = "cache")]
pub use cache::{CacheStats, LookupCache};
