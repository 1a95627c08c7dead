//! Event types for file change notifications.
//!
//! # Event Flow
//!
//! ```text
//! File System Change
//!        │
//!        ▼
//!  notify::Event (kind + paths)
//!        │  ChangeKind::from_notify
//!        ▼
//!  FileFilter (extension / exact file)
//!        │
//!        ▼
//!  ChangeEvent sent via channel to the TUI loop
//! ```

use std::fmt;
use std::time::Instant;

use camino::Utf8PathBuf;
use notify::EventKind;
use notify::event::ModifyKind;

/// What happened to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The file's contents were written.
    Write,
    /// The path was created.
    Create,
    /// The path was removed.
    Remove,
    /// The path was renamed (either side of the rename).
    Rename,
}

impl ChangeKind {
    /// Maps a raw notify event kind.
    ///
    /// Access, metadata-only, and unclassified events map to `None`.
    ///
    /// ```
    /// use notify::EventKind;
    /// use notify::event::{CreateKind, ModifyKind, DataChange};
    /// use rl_watcher::ChangeKind;
    ///
    /// let write = EventKind::Modify(ModifyKind::Data(DataChange::Content));
    /// assert_eq!(ChangeKind::from_notify(&write), Some(ChangeKind::Write));
    /// assert_eq!(
    ///     ChangeKind::from_notify(&EventKind::Create(CreateKind::File)),
    ///     Some(ChangeKind::Create),
    /// );
    /// ```
    pub const fn from_notify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Create),
            EventKind::Remove(_) => Some(Self::Remove),
            EventKind::Modify(ModifyKind::Name(_)) => Some(Self::Rename),
            EventKind::Modify(ModifyKind::Metadata(_)) => None,
            EventKind::Modify(_) => Some(Self::Write),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
        }
    }

    /// Returns `true` for the kinds that restart the command.
    ///
    /// Only writes and renames count; creations and removals are reported
    /// but do not restart on their own.
    #[inline]
    pub const fn triggers_restart(self) -> bool {
        matches!(self, Self::Write | Self::Rename)
    }

    /// Upper-case label used in the viewer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Write => "WRITE",
            Self::Create => "CREATE",
            Self::Remove => "REMOVE",
            Self::Rename => "RENAME",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file change that passed the filter.
///
/// # Examples
///
/// ```
/// use rl_watcher::{ChangeEvent, ChangeKind};
/// use camino::Utf8PathBuf;
///
/// let event = ChangeEvent::new(Utf8PathBuf::from("src/main.go"), ChangeKind::Write);
/// assert_eq!(event.file_name(), Some("main.go"));
/// assert!(event.triggers_restart());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The path that changed.
    pub path: Utf8PathBuf,

    /// What happened to it.
    pub kind: ChangeKind,

    /// When the event was received.
    pub timestamp: Instant,
}

impl ChangeEvent {
    /// Creates a new event stamped with the current instant.
    #[inline]
    #[must_use]
    pub fn new(path: Utf8PathBuf, kind: ChangeKind) -> Self {
        Self {
            path,
            kind,
            timestamp: Instant::now(),
        }
    }

    /// Returns the file extension, if any.
    #[inline]
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.path.extension()
    }

    /// Returns the file name without the directory path.
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name()
    }

    /// See [`ChangeKind::triggers_restart`].
    #[inline]
    #[must_use]
    pub const fn triggers_restart(&self) -> bool {
        self.kind.triggers_restart()
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.kind, self.path)
    }
}
