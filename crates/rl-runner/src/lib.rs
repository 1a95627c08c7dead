//! Process supervisor: runs one command at a time in a pseudo-terminal.
//!
//! The [`Supervisor`] owns the child lifecycle. It starts the command inside
//! a pty so interactive and colored output behaves as in a real terminal,
//! streams output chunks onto the [`EventBus`](rl_core::EventBus) in read
//! order, and coalesces restart requests through a
//! [`Debouncer`](rl_core::Debouncer).
//!
//! # Failure Semantics
//!
//! - A spawn failure emits `Error` and leaves the supervisor ready for the
//!   next restart; there is no automatic retry.
//! - A child that exits or crashes only produces `Stopped`.
//! - Stopping sends SIGTERM to the child's process group and never
//!   escalates to a forced kill.
//! - `stop()` with nothing running is a no-op.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod pty;
pub mod state;
pub mod supervisor;

pub use error::RunError;
pub use state::ProcessState;
pub use supervisor::Supervisor;
