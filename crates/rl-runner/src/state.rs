//! Lifecycle state of the supervised process.

use std::fmt;

/// Where the current run is in its lifecycle.
///
/// ```text
/// Idle ─► Starting ─► Running ─► Stopping ─► Stopped
///             │           │                     ▲
///             ▼           └──── stream ends ────┘
///          Errored
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProcessState {
    /// Nothing has run yet.
    #[default]
    Idle,
    /// The child is being spawned.
    Starting,
    /// The child is running and its output is streaming.
    Running,
    /// SIGTERM was sent; waiting for the output stream to close.
    Stopping,
    /// The output stream ended.
    Stopped,
    /// The child could not be spawned.
    Errored,
}

impl ProcessState {
    /// Returns `true` while a child process exists.
    #[inline]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Stopping)
    }

    /// Short lower-case label for the header.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "exited",
            Self::Errored => "error",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_states() {
        assert!(ProcessState::Running.is_active());
        assert!(ProcessState::Stopping.is_active());
        assert!(!ProcessState::Idle.is_active());
        assert!(!ProcessState::Errored.is_active());
    }

    #[test]
    fn test_labels() {
        assert_eq!(ProcessState::default().to_string(), "idle");
        assert_eq!(ProcessState::Stopped.to_string(), "exited");
    }
}
