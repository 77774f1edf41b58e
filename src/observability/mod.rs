//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! patch/, http/ emit tracing events
//!     → logging.rs (EnvFilter + fmt layer)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Structured fields, not formatted strings, for header counts and addresses
//! - Per-request spans come from tower-http's TraceLayer

pub mod logging;
