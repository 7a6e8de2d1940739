//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, SearchState, ToastLevel, ViewMode};
pub use update::{CursorMove, FormatOp, Message, update};

use std::path::PathBuf;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    view: ViewMode,
    outline_visible: bool,
    scroll_lock: bool,
    word_goal: Option<usize>,
    autosave_enabled: bool,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application, optionally around an existing file.
    pub const fn new(file_path: Option<PathBuf>) -> Self {
        Self {
            file_path,
            view: ViewMode::Split,
            outline_visible: false,
            scroll_lock: true,
            word_goal: None,
            autosave_enabled: true,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Set the initial view mode.
    pub const fn with_view(mut self, view: ViewMode) -> Self {
        self.view = view;
        self
    }

    /// Set initial outline sidebar visibility.
    pub const fn with_outline_visible(mut self, visible: bool) -> Self {
        self.outline_visible = visible;
        self
    }

    /// Enable or disable the scroll-lock preference.
    pub const fn with_scroll_lock(mut self, enabled: bool) -> Self {
        self.scroll_lock = enabled;
        self
    }

    /// Set a word-count goal for the status bar.
    pub const fn with_word_goal(mut self, goal: Option<usize>) -> Self {
        self.word_goal = goal;
        self
    }

    /// Enable or disable draft autosave.
    pub const fn with_autosave(mut self, enabled: bool) -> Self {
        self.autosave_enabled = enabled;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}
