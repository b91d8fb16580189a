//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM / Ctrl+C → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → every subscriber wakes → server stops accepting → in-flight requests drain
//! ```
//!
//! # Design Decisions
//! - Broadcast channel so any number of tasks can wait on one trigger
//! - Feed pipelines already spawned are not awaited on exit; their only
//!   side effect is a cache write

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
