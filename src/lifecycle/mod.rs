//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Ctrl+C → Shutdown::trigger_on_ctrl_c
//!     → broadcast → server stops accepting → in-flight requests drain → exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
