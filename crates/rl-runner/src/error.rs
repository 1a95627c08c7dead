//! Error types for the rl-runner crate.

/// Errors raised while running the supervised command.
///
/// Every variant is reported to the viewer as an error line; none of them
/// stops the supervisor from accepting the next restart.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The command could not be spawned.
    #[error("failed to start '{command}': {source}")]
    Spawn {
        /// The command line that failed.
        command: String,
        /// Why spawning failed.
        #[source]
        source: anyhow::Error,
    },

    /// Opening, resizing, or reading the pseudo-terminal failed.
    #[error("pseudo-terminal error: {0}")]
    Pty(#[source] anyhow::Error),

    /// Signalling the child failed.
    #[error("failed to signal process {pid}: {reason}")]
    Signal {
        /// The target process id.
        pid: u32,
        /// Why signalling failed.
        reason: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunError {
    /// Wraps a pseudo-terminal failure.
    pub fn pty(source: impl Into<anyhow::Error>) -> Self {
        Self::Pty(source.into())
    }

    /// Returns `true` if the failure happened before the child existed.
    #[must_use]
    pub const fn is_spawn(&self) -> bool {
        matches!(self, Self::Spawn { .. })
    }
}
