//! Change source: watches paths and streams filtered file events.
//!
//! This crate wraps the `notify` crate and bridges it to an async tokio
//! context for the TUI event loop.
//!
//! # Overview
//!
//! - Resolve each watch path with `lstat`; missing paths and symlinks are
//!   skipped with a diagnostic while the rest keep working
//! - Watch directories recursively; watch a single file through its parent
//! - Filter by extension under directories and by exact path for files
//! - Classify every event as write, create, remove, or rename
//!
//! Restart coalescing is not done here; consumers debounce restart
//! requests themselves.
//!
//! # Crate Dependencies
//!
//! ```text
//! rl-cli ──► rl-tui ──► rl-watcher ──► rl-core
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use rl_core::WatchConfig;
//! use rl_watcher::ChangeSource;
//! use tokio::time::{interval, Duration};
//!
//! # async fn example() -> Result<(), rl_watcher::WatchError> {
//! let config = WatchConfig {
//!     paths: vec!["./src".into(), "./config.yml".into()],
//!     extensions: rl_core::WatchConfig::parse_extensions(".go,.tmpl"),
//!     ..WatchConfig::default()
//! };
//! let mut source = ChangeSource::new(&config)?;
//! let mut tick = interval(Duration::from_millis(250));
//!
//! loop {
//!     tokio::select! {
//!         Some(event) = source.recv() => {
//!             if event.triggers_restart() {
//!                 println!("Change detected{event}");
//!             }
//!         }
//!         _ = tick.tick() => {}
//!     }
//! }
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod filter;
pub mod target;
pub mod watcher;

pub use error::WatchError;
pub use events::{ChangeEvent, ChangeKind};
pub use filter::{ExtensionFilter, FileFilter, TargetFilter};
pub use target::{TargetKind, WatchTarget, resolve_targets};
pub use watcher::ChangeSource;
