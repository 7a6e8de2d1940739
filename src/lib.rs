// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. outline::OutlineEntry)
    clippy::module_name_repetitions
)]

//! # Tandem
//!
//! A terminal markdown editor with a live preview pane.
//!
//! Tandem edits markdown files in the terminal with:
//! - A live-rendered preview in a split view
//! - Proportional scroll synchronization between the panes
//! - Outline sidebar with jump-to-heading
//! - Linear undo/redo, find/replace, formatting shortcuts
//! - Debounced draft autosave
//!
//! ## Architecture
//!
//! Tandem uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`document`]: Markdown parsing and preview rendering
//! - [`editor`]: Text buffer, edit history, formatting operations
//! - [`sync`]: Scroll synchronization between source and preview
//! - [`outline`]: Heading extraction for navigation
//! - [`search`]: Find and replace
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod config;
pub mod document;
pub mod draft;
pub mod editor;
pub mod outline;
pub mod search;
pub mod sync;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::Document;
    pub use crate::editor::{EditBuffer, SnapshotHistory};
    pub use crate::sync::{PaneMetrics, ScrollSync, Throttle};
    pub use crate::ui::viewport::Viewport;
}
