//! Change source with async event streaming.
//!
//! This module provides the [`ChangeSource`] type that bridges the
//! synchronous `notify` watcher to the async tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    notify thread                                │
//! │  ┌───────────────────┐    ┌────────────────┐    ┌────────────┐  │
//! │  │ RecommendedWatcher│ -> │ ChangeKind map │ -> │ FileFilter │  │
//! │  └───────────────────┘    └────────────────┘    └─────┬──────┘  │
//! └───────────────────────────────────────────────────────│─────────┘
//!                                                         │
//!                                           blocking_send │
//!                                                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Async Runtime (tokio)                        │
//! │  ┌──────────────────┐    ┌────────────────┐                     │
//! │  │ ChangeSource     │    │ mpsc::Receiver │ -> TUI Event Loop   │
//! │  │ (shutdown ctrl)  │    │ (ChangeEvent)  │                     │
//! │  └──────────────────┘    └────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `spawn_blocking` task owns the notify watcher and keeps it alive until
//! the shutdown signal arrives.

use camino::Utf8PathBuf;
use notify::{RecursiveMode, Watcher};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use rl_core::WatchConfig;

use crate::error::WatchError;
use crate::events::{ChangeEvent, ChangeKind};
use crate::filter::{ExtensionFilter, FileFilter, TargetFilter};
use crate::target::{WatchTarget, resolve_targets};

/// Default channel capacity for change events.
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Watches the configured paths and streams filtered [`ChangeEvent`]s.
///
/// # Lifecycle
///
/// 1. **Creation**: [`ChangeSource::new`] resolves every path (skipping
///    missing paths and symlinks), registers the rest with notify, and
///    parks the watcher on a blocking task.
/// 2. **Event Reception**: [`recv`](Self::recv) yields events that already
///    passed the [`TargetFilter`].
/// 3. **Shutdown**: [`shutdown`](Self::shutdown), or drop.
///
/// # Examples
///
/// ```no_run
/// use rl_core::WatchConfig;
/// use rl_watcher::ChangeSource;
///
/// # async fn example() -> Result<(), rl_watcher::WatchError> {
/// let config = WatchConfig {
///     paths: vec!["./src".into()],
///     extensions: vec!["go".into()],
///     ..WatchConfig::default()
/// };
/// let mut source = ChangeSource::new(&config)?;
/// for skipped in source.skipped() {
///     eprintln!("not watching: {skipped}");
/// }
/// while let Some(event) = source.recv().await {
///     println!("Change detected{event}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct ChangeSource {
    /// Sending on this channel stops the blocking task.
    shutdown_tx: Option<oneshot::Sender<()>>,

    /// Handle to the blocking task that owns the watcher.
    task_handle: Option<JoinHandle<()>>,

    /// Event receiver for async consumption.
    event_rx: mpsc::Receiver<ChangeEvent>,

    /// Targets that were registered.
    targets: Vec<WatchTarget>,

    /// Paths that could not be watched.
    skipped: Vec<WatchError>,
}

impl std::fmt::Debug for ChangeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeSource")
            .field("targets", &self.targets)
            .field("skipped", &self.skipped.len())
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl ChangeSource {
    /// Creates a change source for `config`, filtering by its extensions.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Notify`] if the watcher cannot be created.
    /// Individual paths that cannot be watched are reported through
    /// [`skipped`](Self::skipped) instead.
    pub fn new(config: &WatchConfig) -> Result<Self, WatchError> {
        let (targets, skipped) = resolve_targets(&config.paths);
        let filter = TargetFilter::new(
            targets.iter().cloned(),
            ExtensionFilter::from_owned(config.extensions.iter().cloned()),
        );
        Self::with_filter(targets, skipped, config.recursive, filter, DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a change source for pre-resolved targets and a custom filter.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Notify`] if the watcher cannot be created.
    pub fn with_filter<F: FileFilter>(
        targets: Vec<WatchTarget>,
        mut skipped: Vec<WatchError>,
        recursive: bool,
        filter: F,
        channel_capacity: usize,
    ) -> Result<Self, WatchError> {
        let (event_tx, event_rx) = mpsc::channel(channel_capacity);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            forward_event(res, &filter, &event_tx);
        })?;

        let mut registered = Vec::with_capacity(targets.len());
        for target in targets {
            let mode = if target.is_recursive(recursive) {
                RecursiveMode::Recursive
            } else {
                RecursiveMode::NonRecursive
            };
            match watcher.watch(target.watch_root().as_std_path(), mode) {
                Ok(()) => {
                    tracing::info!(path = %target.path, kind = ?target.kind, "Watching");
                    registered.push(target);
                }
                Err(err) => {
                    tracing::warn!(path = %target.path, error = %err, "Failed to watch path");
                    skipped.push(WatchError::Notify(err));
                }
            }
        }

        let task_handle = tokio::task::spawn_blocking(move || {
            // Keep the watcher alive until shutdown.
            let _ = shutdown_rx.blocking_recv();
            drop(watcher);
            tracing::info!("Change source stopped");
        });

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            task_handle: Some(task_handle),
            event_rx,
            targets: registered,
            skipped,
        })
    }

    /// Receives the next change event.
    ///
    /// Returns `None` once the source has been shut down.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.event_rx.recv().await
    }

    /// Tries to receive a change event without waiting.
    pub fn try_recv(&mut self) -> Result<ChangeEvent, mpsc::error::TryRecvError> {
        self.event_rx.try_recv()
    }

    /// Targets that are being watched.
    #[must_use]
    pub fn targets(&self) -> &[WatchTarget] {
        &self.targets
    }

    /// Paths that were skipped, with the reason.
    #[must_use]
    pub fn skipped(&self) -> &[WatchError] {
        &self.skipped
    }

    /// Paths being watched, for display.
    #[must_use]
    pub fn watched_paths(&self) -> Vec<Utf8PathBuf> {
        self.targets.iter().map(|t| t.path.clone()).collect()
    }

    /// Returns `true` if the blocking task is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some() && self.task_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops watching and waits for the blocking task to finish.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::ChannelClosed`] if the blocking task panicked.
    pub async fn shutdown(mut self) -> Result<(), WatchError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.task_handle.take() {
            handle.await.map_err(|_join_error| WatchError::ChannelClosed)?;
        }
        Ok(())
    }
}

impl Drop for ChangeSource {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Maps, filters, and forwards one notify callback.
fn forward_event<F: FileFilter>(
    res: notify::Result<notify::Event>,
    filter: &F,
    tx: &mpsc::Sender<ChangeEvent>,
) {
    let event = match res {
        Ok(event) => event,
        Err(error) => {
            tracing::warn!(error = %error, "Watcher error");
            return;
        }
    };
    let Some(kind) = ChangeKind::from_notify(&event.kind) else {
        return;
    };

    for path in event.paths {
        let path = match Utf8PathBuf::try_from(path) {
            Ok(p) => p,
            Err(e) => {
                let err = WatchError::non_utf8_path(e.into_path_buf());
                tracing::warn!(error = %err, "Skipping file event");
                continue;
            }
        };

        if !filter.should_process(&path) {
            tracing::trace!(path = %path, "Filtered out file event");
            continue;
        }

        if tx.blocking_send(ChangeEvent::new(path, kind)).is_err() {
            tracing::debug!("Event channel closed, dropping file event");
            return;
        }
    }
}
