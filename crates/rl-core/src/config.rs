//! Configuration structures for reloop.
//!
//! This module provides configuration types for all components of the application:
//!
//! - [`WatchConfig`] - Paths and extensions to watch
//! - [`RunnerConfig`] - The command plus startup delay and restart debounce
//! - [`TuiConfig`] - Terminal UI settings (tick rate, frame rate, colors)
//! - [`Config`] - Root configuration combining all settings
//!
//! Configuration is assembled from command-line flags; nothing is read from
//! or written to disk.

use std::time::Duration;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::error::ConfigError;

/// Color scheme for the TUI.
///
/// Controls the visual appearance of the terminal interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ColorScheme {
    /// Automatically detect based on terminal settings.
    #[default]
    Auto,
    /// Light color scheme (dark text on light background).
    Light,
    /// Dark color scheme (light text on dark background).
    Dark,
}

/// Configuration for the file watcher.
///
/// # Examples
///
/// ```
/// use rl_core::WatchConfig;
///
/// let config = WatchConfig::default();
/// assert!(config.paths.is_empty());
/// assert!(config.recursive);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Paths to watch. Empty means the command runs once with no watching.
    pub paths: Vec<Utf8PathBuf>,

    /// Extensions that qualify a change under a watched directory, without
    /// the leading dot. Empty accepts every file.
    pub extensions: Vec<String>,

    /// Whether to watch directory targets recursively.
    pub recursive: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            extensions: Vec::new(),
            recursive: true,
        }
    }
}

impl WatchConfig {
    /// Parses a comma-separated extension list.
    ///
    /// Each entry is trimmed and a leading dot is dropped; empty entries are
    /// ignored.
    ///
    /// ```
    /// use rl_core::WatchConfig;
    ///
    /// let exts = WatchConfig::parse_extensions(" .go, rs ,,.toml");
    /// assert_eq!(exts, vec!["go", "rs", "toml"]);
    /// ```
    pub fn parse_extensions(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .map(|ext| ext.strip_prefix('.').unwrap_or(ext))
            .filter(|ext| !ext.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Returns `true` if there is anything to watch.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        !self.paths.is_empty()
    }
}

/// Configuration for the process supervisor.
///
/// # Examples
///
/// ```
/// use rl_core::RunnerConfig;
/// use std::time::Duration;
///
/// let config = RunnerConfig::default();
/// assert_eq!(config.startup_delay(), Duration::from_millis(100));
/// assert_eq!(config.restart_debounce(), Duration::from_millis(150));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Program and arguments to run.
    pub command: Vec<String>,

    /// Delay before the very first run, in milliseconds.
    pub startup_delay_ms: u64,

    /// Quiescence window for coalescing restart requests, in milliseconds.
    pub restart_debounce_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            startup_delay_ms: 100,
            restart_debounce_ms: 150,
        }
    }
}

impl RunnerConfig {
    /// Startup delay as a [`Duration`].
    #[inline]
    pub const fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    /// Restart debounce window as a [`Duration`].
    #[inline]
    pub const fn restart_debounce(&self) -> Duration {
        Duration::from_millis(self.restart_debounce_ms)
    }

    /// Builds the [`Command`] to run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCommand`] if no program was given.
    pub fn to_command(&self) -> Result<Command, ConfigError> {
        Command::new(self.command.iter().cloned())
    }
}

/// Configuration for the terminal user interface.
///
/// # Examples
///
/// ```
/// use rl_core::{TuiConfig, ColorScheme};
///
/// let config = TuiConfig::default();
/// assert_eq!(config.tick_rate_ms, 250);
/// assert_eq!(config.color_scheme, ColorScheme::Auto);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick rate in milliseconds.
    pub tick_rate_ms: u64,

    /// Render rate in frames per second.
    pub frame_rate: u32,

    /// Color scheme for the interface.
    pub color_scheme: ColorScheme,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            frame_rate: 30,
            color_scheme: ColorScheme::Auto,
        }
    }
}

impl TuiConfig {
    /// Tick interval as a [`Duration`].
    #[inline]
    pub const fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Render interval as a [`Duration`].
    #[inline]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.max(1)))
    }
}

/// Root configuration for reloop.
///
/// # Examples
///
/// ```
/// use rl_core::Config;
///
/// let mut config = Config::default();
/// assert!(config.validate().is_err());
///
/// config.runner.command = vec!["make".to_owned(), "test".to_owned()];
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File watcher configuration.
    pub watch: WatchConfig,

    /// Process supervisor configuration.
    pub runner: RunnerConfig,

    /// Terminal UI configuration.
    pub tui: TuiConfig,
}

impl Config {
    /// Checks that the configuration can drive a session.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCommand`] when no command is set and
    /// [`ConfigError::InvalidOption`] for zero tick or frame rates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runner.command.is_empty() {
            return Err(ConfigError::EmptyCommand);
        }
        if self.tui.tick_rate_ms == 0 {
            return Err(ConfigError::invalid_option(
                "tick_rate_ms",
                "must be greater than zero",
            ));
        }
        if self.tui.frame_rate == 0 {
            return Err(ConfigError::invalid_option(
                "frame_rate",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_config_defaults() {
        let config = WatchConfig::default();
        assert!(config.paths.is_empty());
        assert!(config.extensions.is_empty());
        assert!(config.recursive);
        assert!(!config.is_enabled());
    }

    #[test]
    fn test_parse_extensions_trims_and_drops_empty() {
        assert_eq!(
            WatchConfig::parse_extensions(".js, .css ,  ,html"),
            vec!["js", "css", "html"]
        );
        assert!(WatchConfig::parse_extensions("").is_empty());
        assert!(WatchConfig::parse_extensions(" , ,").is_empty());
    }

    #[test]
    fn test_runner_config_defaults() {
        let config = RunnerConfig::default();
        assert_eq!(config.startup_delay_ms, 100);
        assert_eq!(config.restart_debounce_ms, 150);
        assert!(matches!(config.to_command(), Err(ConfigError::EmptyCommand)));
    }

    #[test]
    fn test_tui_config_defaults() {
        let config = TuiConfig::default();
        assert_eq!(config.tick_rate(), Duration::from_millis(250));
        assert_eq!(config.frame_rate, 30);
        assert_eq!(config.color_scheme, ColorScheme::Auto);
    }

    #[test]
    fn test_frame_interval_never_divides_by_zero() {
        let config = TuiConfig {
            frame_rate: 0,
            ..TuiConfig::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_validate_rejects_zero_rates() {
        let mut config = Config::default();
        config.runner.command = vec!["true".to_owned()];
        config.tui.frame_rate = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_config_defaults_snapshot() {
        insta::assert_json_snapshot!(Config::default(), @r#"
        {
          "watch": {
            "paths": [],
            "extensions": [],
            "recursive": true
          },
          "runner": {
            "command": [],
            "startup_delay_ms": 100,
            "restart_debounce_ms": 150
          },
          "tui": {
            "tick_rate_ms": 250,
            "frame_rate": 30,
            "color_scheme": "auto"
          }
        }
        "#);
    }

    #[test]
    fn test_config_deserialize_with_missing_fields() {
        let json = r#"{"runner": {"command": ["go", "run", "."]}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.runner.command, vec!["go", "run", "."]);
        assert_eq!(config.runner.startup_delay_ms, 100);
        assert!(config.watch.recursive);
    }

    #[test]
    fn test_color_scheme_serialization() {
        assert_eq!(
            serde_json::to_string(&ColorScheme::Auto).unwrap(),
            r#""auto""#
        );
        assert_eq!(
            serde_json::to_string(&ColorScheme::Dark).unwrap(),
            r#""dark""#
        );
        assert_eq!(
            serde_json::to_string(&ColorScheme::Light).unwrap(),
            r#""light""#
        );
    }
}
