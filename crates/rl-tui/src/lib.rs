//! Terminal user interface for reloop, built on Ratatui.
//!
//! This crate owns the interactive session: it shows the supervised
//! command's output in a scrolling viewer with a live regex filter and
//! search, turns file changes into restart requests, and keeps the
//! terminal and the pseudo-terminal sized together.
//!
//! # Architecture
//!
//! ```text
//! crates/rl-tui/src/
//!   lib.rs           # Session entry point and event loop
//!   app.rs           # Application state and input handling
//!   event.rs         # Event types (Key, Mouse, Paste, Bus, FileChanged, ...)
//!   tui.rs           # Terminal wrapper with async event streaming
//!   action.rs        # User actions (commands from key bindings)
//!   ui.rs            # Layout and rendering orchestration
//!   theme.rs         # Color scheme and styling
//!   error.rs         # TUI-specific error types
//!   viewer/
//!     mod.rs         # Viewer: lines, filter, search, scroll, focus
//!     buffer.rs      # Wrapped content buffer
//!     sanitize.rs    # Escape sequence and control stripping
//!     matcher.rs     # Filter and search over rows
//!     decorate.rs    # Match markers and styled segments
//!     focus.rs       # Focus modes
//!   components/
//!     header.rs      # HeaderBar
//!     log_view.rs    # LogView over the visible rows
//!     prompt.rs      # PromptBar for filter/search editing
//!     status_bar.rs  # StatusBar
//!     help.rs        # HelpPanel overlay
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use rl_core::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), rl_tui::TuiError> {
//!     let mut config = Config::default();
//!     config.runner.command = vec!["go".into(), "run".into(), ".".into()];
//!     rl_tui::run(config).await
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod action;
pub mod app;
pub mod components;
pub mod error;
pub mod event;
pub mod theme;
pub mod tui;
pub mod ui;
pub mod viewer;

use std::sync::Arc;

use ratatui::layout::Rect;
use rl_core::bus::BusReceiver;
use rl_core::{Config, EventBus};
use rl_runner::Supervisor;
use rl_watcher::ChangeSource;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

// Public re-exports
pub use action::Action;
pub use app::{App, StatusMessage};
pub use error::TuiError;
pub use event::Event;
pub use theme::Theme;
pub use tui::Tui;
pub use viewer::{FocusMode, Viewer};

/// Runs an interactive session until the user quits.
///
/// See [`run_until`].
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the terminal fails.
pub async fn run(config: Config) -> Result<(), TuiError> {
    run_until(config, CancellationToken::new()).await
}

/// Runs an interactive session until the user quits or `shutdown` is
/// cancelled.
///
/// This:
///
/// 1. Validates the configuration and builds the command
/// 2. Starts the supervisor and its restart listener
/// 3. Starts the change source if any paths are watched
/// 4. Enters the terminal and runs the main event loop
/// 5. Stops the child, restores the terminal, and stops watching
///
/// Paths that cannot be watched, and a change source that cannot start,
/// are reported in the viewer; the session goes on without them.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the terminal fails.
pub async fn run_until(config: Config, shutdown: CancellationToken) -> Result<(), TuiError> {
    config.validate()?;
    let command = config.runner.to_command()?;

    let bus = Arc::new(EventBus::new());
    // Subscribe before the supervisor starts so no lifecycle event is missed.
    let mut bus_rx = bus.subscribe();

    let supervisor = Supervisor::new(command.clone(), Arc::clone(&bus), &config.runner);
    let listener = supervisor.listen();

    let mut app = App::new(command.to_string(), Arc::clone(&bus));

    let mut change_source = if config.watch.is_enabled() {
        match ChangeSource::new(&config.watch) {
            Ok(source) => {
                info!(paths = source.targets().len(), "Watching for changes");
                app.watched = source.watched_paths();
                app.report_skipped(source.skipped());
                Some(source)
            }
            Err(e) => {
                error!(error = %e, "Failed to start change source");
                app.viewer.push_line(&format!("Error: {e}"));
                app.status = Some(StatusMessage::error(format!("Watcher failed: {e}")));
                None
            }
        }
    } else {
        debug!("No paths to watch");
        None
    };

    let mut tui = Tui::new(&config.tui)?;
    tui.enter()?;
    resize(&mut app, &supervisor, tui.size());

    let first_run = {
        let supervisor = supervisor.clone();
        tokio::spawn(async move { supervisor.run().await })
    };

    let theme = Theme::from_scheme(config.tui.color_scheme);

    info!(command = %command, "Entering main event loop");
    let result = run_event_loop(
        &mut tui,
        &mut app,
        &supervisor,
        &mut change_source,
        &mut bus_rx,
        &theme,
        &shutdown,
    )
    .await;

    first_run.abort();
    listener.abort();
    supervisor.shutdown().await;

    tui.exit()?;

    if let Some(source) = change_source {
        info!("Shutting down change source");
        if let Err(e) = source.shutdown().await {
            error!(error = %e, "Error shutting down change source");
        }
    }

    result
}

/// Runs the main event loop.
async fn run_event_loop(
    tui: &mut Tui,
    app: &mut App,
    supervisor: &Supervisor,
    change_source: &mut Option<ChangeSource>,
    bus_rx: &mut BusReceiver,
    theme: &Theme,
    shutdown: &CancellationToken,
) -> Result<(), TuiError> {
    let mut dirty = true;

    loop {
        let event = tokio::select! {
            () = shutdown.cancelled() => {
                info!("Shutdown requested");
                break;
            }

            // Terminal events
            event = tui.next_event() => match event {
                Some(event) => event,
                None => return Err(TuiError::ChannelClosed),
            },

            // Lifecycle and output events
            Some(event) = bus_rx.recv() => Event::Bus(event),

            // File change events
            Some(change) = async {
                match change_source {
                    Some(source) => source.recv().await,
                    None => std::future::pending().await,
                }
            } => Event::FileChanged(change),
        };

        let action = match event {
            Event::Key(key) => app.handle_key(key),
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            Event::Paste(text) => app.handle_paste(text),
            Event::Resize { width, height } => {
                resize(app, supervisor, Rect::new(0, 0, width, height));
                Action::Render
            }
            Event::Bus(event) => {
                app.handle_bus_event(event);
                dirty = true;
                Action::None
            }
            Event::FileChanged(change) => {
                app.handle_change(&change);
                dirty = true;
                Action::None
            }
            Event::Tick => Action::Tick,
            Event::Render => {
                if dirty {
                    tui.draw(|frame| ui::render(app, frame, theme))?;
                    dirty = false;
                }
                Action::None
            }
            Event::FocusGained | Event::FocusLost => Action::None,
        };

        let redraw = action.needs_render();
        app.update(action);

        if app.should_quit {
            info!("Quit requested");
            break;
        }

        if redraw {
            tui.draw(|frame| ui::render(app, frame, theme))?;
            dirty = false;
        }
    }

    Ok(())
}

/// Sizes the viewer and the pseudo-terminal to the body of `area`.
fn resize(app: &mut App, supervisor: &Supervisor, area: Rect) {
    let body = ui::body_area(area);
    app.set_body_size(body.width, body.height);
    if let Err(e) = supervisor.resize(body.width, body.height) {
        warn!(error = %e, "Failed to resize pseudo-terminal");
    }
}
