//! TUI-specific error types.

use thiserror::Error;

/// Errors that can occur in the TUI.
///
/// Only terminal failures end a session; everything raised by the change
/// source or the supervisor is shown in the viewer and the session goes on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TuiError {
    /// Terminal initialization or operation failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Event channel was closed unexpectedly.
    #[error("event channel closed unexpectedly")]
    ChannelClosed,

    /// File watcher operation failed.
    #[error("watcher error: {0}")]
    Watcher(#[from] rl_watcher::WatchError),

    /// Process supervisor operation failed.
    #[error("runner error: {0}")]
    Runner(#[from] rl_runner::RunError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] rl_core::ConfigError),
}

impl TuiError {
    /// Returns `true` if the session can go on after this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Watcher(_) | Self::Runner(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TuiError::ChannelClosed;
        assert_eq!(err.to_string(), "event channel closed unexpectedly");
    }

    #[test]
    fn test_config_error_from() {
        let err = TuiError::from(rl_core::ConfigError::EmptyCommand);
        assert!(matches!(err, TuiError::Config(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_is_recoverable() {
        let err = TuiError::from(rl_watcher::WatchError::path_not_found("/nope"));
        assert!(err.is_recoverable());
        assert!(!TuiError::ChannelClosed.is_recoverable());
        assert!(!TuiError::Terminal(std::io::Error::other("tty")).is_recoverable());
    }
}
