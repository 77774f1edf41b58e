//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Request
//!     → middleware/layer.rs (call inner service immediately)
//!     → downstream handler commits status + headers
//!     → intercept.rs (hijack: substitute response, body unpolled)
//!     → patch::patch over the substitute headers
//!     → intercept.rs (pipe: original body into the real response)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Header mutation happens before the body is ever polled
//! - Inner service errors pass through untouched
//! - server.rs hosts a demo handler; the middleware works in any tower stack

pub mod intercept;
pub mod middleware;
pub mod server;

pub use intercept::{hijack, Interception, Substitute};
pub use middleware::{
    middleware, patch_headers, patch_headers_middleware, PatchHeaders, PatchHeadersLayer,
};
pub use server::HttpServer;
