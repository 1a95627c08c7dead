//! CLI entry point for reloop.
//!
//! Runs a command in a pseudo-terminal, restarts it when watched files
//! change, and shows its output in a terminal UI with live filter and
//! search.
//!
//! # Usage
//!
//! ```bash
//! reloop [OPTIONS] <COMMAND>...
//!
//! # Rebuild and rerun a Go service whenever a .go file changes
//! reloop -w . -e go go run .
//!
//! # Go style single-dash long flags work too
//! reloop -watch src -exts rs,toml cargo test
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::Utf8PathBuf;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use rl_core::{ColorScheme, Config, WatchConfig};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Run a command and restart it when files change.
#[derive(Parser, Debug)]
#[command(name = "reloop", version, about, long_about = None)]
#[command(disable_help_flag = true)]
struct Cli {
    /// Path to watch; repeat or separate with commas for more paths.
    #[arg(
        short,
        long = "watch",
        value_name = "PATH",
        env = "RELOOP_WATCH",
        value_delimiter = ','
    )]
    watch: Vec<Utf8PathBuf>,

    /// Comma separated file extensions that trigger a restart.
    ///
    /// Applies to watched directories. Empty means every file.
    #[arg(short, long, value_name = "LIST", env = "RELOOP_EXTS", default_value = "")]
    exts: String,

    /// Delay before the first run, in milliseconds.
    #[arg(short, long, value_name = "MS", env = "RELOOP_DELAY", default_value_t = 100)]
    delay: u64,

    /// Viewer color scheme.
    #[arg(long, value_enum, default_value_t = ThemeArg::Auto)]
    theme: ThemeArg,

    /// Enable verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored diagnostics.
    #[arg(long)]
    no_color: bool,

    /// Print usage and examples.
    #[arg(short, long)]
    help: bool,

    /// The command to run, with its arguments.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<String>,
}

/// Viewer color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    /// Pick for the terminal.
    Auto,
    /// Light text on a dark background.
    Dark,
    /// Dark text on a light background.
    Light,
}

impl From<ThemeArg> for ColorScheme {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Auto => Self::Auto,
            ThemeArg::Dark => Self::Dark,
            ThemeArg::Light => Self::Light,
        }
    }
}

/// Long flags that may be written with a single dash.
const LONG_FLAGS: &[&str] = &[
    "watch", "exts", "delay", "theme", "verbose", "no-color", "help", "version",
];

/// Flags whose value is the next argument.
const VALUE_FLAGS: &[&str] = &["-w", "-e", "-d", "--watch", "--exts", "--delay", "--theme"];

const EXAMPLES: &str = "\
Examples:
  reloop -w . -e go go run .
  reloop -watch src -watch Cargo.toml -exts rs cargo run
  reloop -d 500 -w config.yaml ./server --port 8080
";

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Rewrites Go style single-dash long flags to double-dash.
///
/// Stops at the first positional argument or `--`; everything after that
/// belongs to the command.
fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut out: Vec<String> = args.next().into_iter().collect();
    let mut expects_value = false;

    while let Some(arg) = args.next() {
        if expects_value {
            expects_value = false;
            out.push(arg);
            continue;
        }

        if arg == "--" || !arg.starts_with('-') || arg == "-" {
            out.push(arg);
            out.extend(args);
            break;
        }

        let arg = match arg.strip_prefix('-') {
            Some(rest) if !rest.starts_with('-') && is_long_flag(rest) => format!("-{arg}"),
            _ => arg,
        };
        expects_value = !arg.contains('=') && VALUE_FLAGS.contains(&arg.as_str());
        out.push(arg);
    }

    out
}

fn is_long_flag(flag: &str) -> bool {
    let name = flag.split_once('=').map_or(flag, |(name, _)| name);
    LONG_FLAGS.contains(&name)
}

/// Usage and examples.
fn help_text() -> String {
    format!("{}\n{EXAMPLES}", Cli::command().render_help())
}

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, `info` when stderr is redirected,
/// and nothing at all when stderr is the terminal the UI draws on.
/// Noisy crates like `mio` and `notify` are filtered to `warn` level.
fn init_tracing(verbose: bool, no_color: bool) {
    use std::io::IsTerminal;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug,mio=warn,notify=warn")
        } else if std::io::stderr().is_terminal() {
            EnvFilter::new("off")
        } else {
            EnvFilter::new("info,mio=warn,notify=warn")
        }
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Builds a [`Config`] from CLI arguments.
fn build_config(cli: &Cli) -> Config {
    let mut config = Config::default();
    config.watch = WatchConfig {
        paths: cli.watch.clone(),
        extensions: WatchConfig::parse_extensions(&cli.exts),
        ..WatchConfig::default()
    };
    config.runner.command.clone_from(&cli.command);
    config.runner.startup_delay_ms = cli.delay;
    config.tui.color_scheme = cli.theme.into();
    config
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs the interactive session until quit or SIGTERM.
///
/// # Errors
///
/// Returns an error if the TUI fails.
async fn run_session(config: Config) -> color_eyre::Result<()> {
    info!(
        command = ?config.runner.command,
        paths = config.watch.paths.len(),
        "Starting reloop"
    );

    let shutdown = CancellationToken::new();

    // Handle SIGTERM for graceful shutdown on Unix
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;
        let token = shutdown.clone();
        tokio::spawn(async move {
            if sigterm.recv().await.is_some() {
                info!("Received SIGTERM, shutting down");
                token.cancel();
            }
        });
    }

    rl_tui::run_until(config, shutdown)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("TUI error: {}", e))
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse_from(normalize_args(std::env::args()));

    if cli.help {
        let mut stderr = std::io::stderr().lock();
        write!(stderr, "{}", help_text())?;
        return Ok(());
    }

    if cli.command.is_empty() {
        Cli::command()
            .error(ErrorKind::MissingRequiredArgument, "no command to run")
            .exit();
    }

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Run
    run_session(build_config(&cli)).await
}
