//! Header patching subsystem.
//!
//! # Data Flow
//! ```text
//! PolicyConfig (file) or builder calls
//!     → policy.rs (HeaderPolicy, validated header names/values)
//!     → shared via Arc by the middleware
//!
//! Committed response headers
//!     → patcher.rs: allow → remove → static → callback
//!     → patched HeaderMap
//! ```
//!
//! # Design Decisions
//! - Patching is a pure function over `HeaderMap`, no I/O
//! - Absent policy fields disable their stage; empty ones do not
//! - Static `None` values are skipped, never treated as removal

pub mod patcher;
pub mod policy;

pub use patcher::patch;
pub use policy::{HeaderCallback, HeaderPolicy, PolicyError, StaticHeader};
