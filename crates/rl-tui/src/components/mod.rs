//! UI components for the TUI.
//!
//! This module contains all the widget implementations for rendering
//! different parts of the interface.
//!
//! # Component Types
//!
//! - **Bars**: `HeaderBar`, `StatusBar`, `PromptBar`
//! - **Body**: `LogView` over the viewer's visible rows
//! - **Overlays**: `HelpPanel`

mod header;
mod help;
mod log_view;
mod prompt;
mod status_bar;

pub use header::HeaderBar;
pub use help::HelpPanel;
pub use log_view::LogView;
pub use prompt::PromptBar;
pub use status_bar::StatusBar;
