//! The command to supervise.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::ConfigError;

/// An immutable argv vector: program followed by its arguments.
///
/// Set once at startup and shared by every run.
///
/// # Examples
///
/// ```
/// use rl_core::Command;
///
/// let cmd = Command::new(["npm", "run", "start"]).unwrap();
/// assert_eq!(cmd.program(), "npm");
/// assert_eq!(cmd.args(), ["run", "start"]);
/// assert_eq!(cmd.to_string(), "npm run start");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    argv: SmallVec<[String; 4]>,
}

impl Command {
    /// Creates a command from an argv sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCommand`] if `argv` is empty or its first
    /// element is blank.
    pub fn new<I, S>(argv: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: SmallVec<[String; 4]> = argv.into_iter().map(Into::into).collect();
        match argv.first() {
            Some(program) if !program.trim().is_empty() => Ok(Self { argv }),
            _ => Err(ConfigError::EmptyCommand),
        }
    }

    /// The program to execute.
    #[inline]
    pub fn program(&self) -> &str {
        // Non-empty by construction.
        self.argv.first().map_or("", String::as_str)
    }

    /// Arguments passed to the program.
    #[inline]
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }

    /// The full argv, program included.
    #[inline]
    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}
