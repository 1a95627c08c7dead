//! Core types, event bus, and debounce timer for reloop.
//!
//! This crate provides the foundational pieces shared across the workspace:
//!
//! - [`Config`] and its sections for the watcher, runner, and TUI
//! - [`Command`], the immutable argv to run
//! - [`EventBus`] and [`BusEvent`], the closed set of lifecycle/output events
//! - [`Debouncer`], a trailing-edge debounce timer
//!
//! # Crate Dependencies
//!
//! ```text
//! rl-cli ──► rl-tui ──► rl-runner ──► rl-core
//!                   └─► rl-watcher ─► rl-core
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod bus;
pub mod command;
pub mod config;
pub mod debounce;
pub mod error;

pub use bus::{BusEvent, EventBus};
pub use command::Command;
pub use config::{ColorScheme, Config, RunnerConfig, TuiConfig, WatchConfig};
pub use debounce::Debouncer;
pub use error::ConfigError;
