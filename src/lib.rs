//! Response header patching middleware for tower and axum.
//!
//! A [`HeaderPolicy`] describes what to do with outgoing response headers:
//! keep an allow-list, strip a deny-list, set static overrides, and finally
//! hand the whole map to a callback. [`patch_headers`] turns a policy into a
//! tower layer that applies it once the downstream service has committed its
//! headers and before any body byte is sent.
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use patch_headers::{patch_headers, HeaderPolicy};
//!
//! let app: Router = Router::new()
//!     .route("/", get(|| async { "hello" }))
//!     .layer(patch_headers(HeaderPolicy::new().remove(["server", "x-powered-by"])));
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod patch;

pub use config::PatchConfig;
pub use http::{middleware, patch_headers, patch_headers_middleware, HttpServer, PatchHeaders, PatchHeadersLayer};
pub use lifecycle::Shutdown;
pub use patch::{patch, HeaderCallback, HeaderPolicy, PolicyError};
