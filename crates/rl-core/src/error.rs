//! Error types for the rl-core crate.
//!
//! This module provides the [`ConfigError`] type for configuration-related errors
//! that can occur across the workspace.

use camino::Utf8PathBuf;

/// Errors that can occur while assembling and validating a [`Config`].
///
/// # Examples
///
/// ```
/// use rl_core::ConfigError;
///
/// let error = ConfigError::EmptyCommand;
/// assert!(error.to_string().contains("no command"));
/// ```
///
/// [`Config`]: crate::Config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No command was given to run.
    #[error("no command given to run")]
    EmptyCommand,

    /// The provided path is invalid or malformed.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The invalid path.
        path: Utf8PathBuf,
        /// Explanation of why the path is invalid.
        reason: String,
    },

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}
