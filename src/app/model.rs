use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::config::ViewModeArg;
use crate::document::Document;
use crate::editor::{EditBuffer, SnapshotHistory};
use crate::outline::OutlineEntry;
use crate::search::SearchMatch;
use crate::sync::{ScrollSync, SyncGate, current_outline_index};
use crate::ui::viewport::Viewport;

/// Columns reserved for the outline sidebar when visible.
pub const OUTLINE_WIDTH: u16 = 28;

/// Which panes are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Source pane only
    Edit,
    /// Source and preview side by side
    Split,
    /// Preview pane only
    Preview,
}

impl ViewMode {
    pub const fn next(self) -> Self {
        match self {
            Self::Edit => Self::Split,
            Self::Split => Self::Preview,
            Self::Preview => Self::Edit,
        }
    }
}

impl From<ViewModeArg> for ViewMode {
    fn from(arg: ViewModeArg) -> Self {
        match arg {
            ViewModeArg::Edit => Self::Edit,
            ViewModeArg::Split => Self::Split,
            ViewModeArg::Preview => Self::Preview,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// State of the find/replace bar.
#[derive(Debug, Default)]
pub struct SearchState {
    /// Current query; `None` when the bar is closed.
    pub query: Option<String>,
    /// Replacement text; `Some` when the replace field has focus.
    pub replacement: Option<String>,
    pub(super) matches: Vec<SearchMatch>,
    pub(super) current: Option<usize>,
}

impl SearchState {
    pub const fn active(&self) -> bool {
        self.query.is_some()
    }

    pub const fn replacing(&self) -> bool {
        self.replacement.is_some()
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn current_match(&self) -> Option<(usize, usize)> {
        self.current.map(|idx| (idx + 1, self.matches.len()))
    }

    pub(super) fn close(&mut self) {
        self.query = None;
        self.replacement = None;
        self.matches.clear();
        self.current = None;
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// The editable source text
    pub buffer: EditBuffer,
    /// Undo/redo snapshots for the buffer
    pub history: SnapshotHistory,
    /// Rendered preview of the buffer
    pub document: Document,
    /// Headings extracted from the source
    pub outline: Vec<OutlineEntry>,
    /// Highlighted outline entry
    pub outline_selected: Option<usize>,
    /// Scroll offset for the outline sidebar
    pub outline_scroll_offset: usize,
    /// Whether the outline sidebar is visible
    pub outline_visible: bool,
    /// Focus: true = outline, false = editor
    pub outline_focused: bool,
    /// Which panes are shown
    pub view_mode: ViewMode,
    /// Scroll synchronizer for split view
    pub sync: ScrollSync,
    /// The user's scroll-lock preference
    pub scroll_lock: bool,
    /// Viewport of the source pane
    pub source_viewport: Viewport,
    /// Viewport of the preview pane
    pub preview_viewport: Viewport,
    /// Path of the document, `None` for an unsaved scratch buffer
    pub file_path: Option<PathBuf>,
    /// Whether the buffer differs from the file on disk
    pub dirty: bool,
    /// Word-count goal shown in the status bar
    pub word_goal: Option<usize>,
    /// Whether draft autosave is enabled
    pub autosave_enabled: bool,
    pub search: SearchState,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    toast: Option<Toast>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Set after first quit attempt with unsaved changes; allows second quit to proceed
    pub quit_confirmed: bool,
    terminal_width: u16,
    terminal_height: u16,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_path", &self.file_path)
            .field("view_mode", &self.view_mode)
            .field("outline_visible", &self.outline_visible)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a new model around initial source text.
    pub fn new(file_path: Option<PathBuf>, source: &str, terminal_size: (u16, u16)) -> Self {
        let mut model = Self {
            buffer: EditBuffer::from_text(source),
            history: SnapshotHistory::new(source),
            document: Document::empty(),
            outline: Vec::new(),
            outline_selected: None,
            outline_scroll_offset: 0,
            outline_visible: false,
            outline_focused: false,
            view_mode: ViewMode::Split,
            sync: ScrollSync::new(),
            scroll_lock: true,
            source_viewport: Viewport::new(0, 0, 0),
            preview_viewport: Viewport::new(0, 0, 0),
            file_path,
            dirty: false,
            word_goal: None,
            autosave_enabled: true,
            search: SearchState::default(),
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            toast: None,
            should_quit: false,
            quit_confirmed: false,
            terminal_width: terminal_size.0,
            terminal_height: terminal_size.1,
        };
        model.apply_layout();
        model.refresh_preview();
        model
    }

    /// Conditions under which scroll sync may run.
    pub const fn sync_gate(&self) -> SyncGate {
        SyncGate {
            split_view: matches!(self.view_mode, ViewMode::Split),
            scroll_lock: self.scroll_lock,
        }
    }

    pub const fn terminal_size(&self) -> (u16, u16) {
        (self.terminal_width, self.terminal_height)
    }

    /// Rows below the panes: status bar plus the find/replace bar when open.
    pub fn footer_rows(&self) -> u16 {
        1 + u16::from(self.search.active())
    }

    /// Column widths as `(outline, source, preview)`.
    pub fn pane_widths(&self) -> (u16, u16, u16) {
        let outline = if self.outline_visible {
            OUTLINE_WIDTH.min(self.terminal_width)
        } else {
            0
        };
        let content = self.terminal_width.saturating_sub(outline);
        match self.view_mode {
            ViewMode::Edit => (outline, content, 0),
            ViewMode::Preview => (outline, 0, content),
            ViewMode::Split => {
                let source = content / 2;
                // One column divider between the panes.
                let preview = content.saturating_sub(source).saturating_sub(1);
                (outline, source, preview)
            }
        }
    }

    /// Resize both pane viewports to the current layout.
    pub(super) fn apply_layout(&mut self) {
        let (_, source_w, preview_w) = self.pane_widths();
        let pane_height = self.terminal_height.saturating_sub(self.footer_rows());
        self.source_viewport.resize(source_w, pane_height);
        self.preview_viewport.resize(preview_w, pane_height);
    }

    pub(super) fn set_terminal_size(&mut self, width: u16, height: u16) {
        self.terminal_width = width;
        self.terminal_height = height;
        self.apply_layout();
    }

    /// Re-render the preview and outline from the current buffer.
    ///
    /// Called after every buffer mutation and on layout changes that affect
    /// the preview wrap width.
    pub(super) fn refresh_preview(&mut self) {
        let source = self.buffer.text();
        let (_, source_w, preview_w) = self.pane_widths();
        let wrap = if preview_w > 0 {
            preview_w
        } else {
            source_w.max(40)
        };
        self.document = Document::render(&source, wrap)
            .unwrap_or_else(|_| Document::parse_error_placeholder(&source));
        self.preview_viewport
            .set_total_lines(self.document.line_count());
        self.source_viewport.set_total_lines(self.buffer.line_count());
        self.outline = crate::outline::extract(&source);
        if self.outline.is_empty() {
            self.outline_selected = None;
            self.outline_scroll_offset = 0;
        } else if let Some(sel) = self.outline_selected {
            self.outline_selected = Some(sel.min(self.outline.len() - 1));
        }
        refresh_search_matches(self, false);
    }

    /// Move the outline highlight to the entry the source pane has most
    /// recently scrolled past. Skipped while a jump's grace window is open.
    pub(super) fn highlight_outline_from_source(&mut self, now: Instant) {
        if self.sync.outline_suppressed(now) {
            return;
        }
        let anchors = crate::outline::line_anchors(&self.outline);
        #[allow(clippy::cast_precision_loss)]
        let position = self.source_viewport.offset() as f64;
        self.set_outline_selected(current_outline_index(&anchors, position));
    }

    /// Same as [`highlight_outline_from_source`](Self::highlight_outline_from_source)
    /// but driven by the preview pane's rendered heading anchors.
    pub(super) fn highlight_outline_from_preview(&mut self, now: Instant) {
        if self.sync.outline_suppressed(now) {
            return;
        }
        let anchors = self.document.heading_anchors();
        #[allow(clippy::cast_precision_loss)]
        let position = self.preview_viewport.offset() as f64;
        self.set_outline_selected(current_outline_index(&anchors, position));
    }

    fn set_outline_selected(&mut self, selected: Option<usize>) {
        self.outline_selected = selected;
        if let Some(sel) = selected {
            let visible = self.outline_visible_rows();
            if sel < self.outline_scroll_offset {
                self.outline_scroll_offset = sel;
            } else if visible > 0 && sel >= self.outline_scroll_offset + visible {
                self.outline_scroll_offset = sel + 1 - visible;
            }
        }
    }

    pub(super) const fn outline_visible_rows(&self) -> usize {
        // Outline pane has a 1-cell border at top and bottom.
        self.terminal_height.saturating_sub(3) as usize
    }

    pub(super) fn max_outline_scroll_offset(&self) -> usize {
        self.outline
            .len()
            .saturating_sub(self.outline_visible_rows())
    }

    /// Keep the source cursor visible after an edit or cursor motion.
    pub(super) fn scroll_cursor_into_view(&mut self) {
        let line = self.buffer.cursor.line;
        self.source_viewport.ensure_visible(line);
    }

    /// Words still to write before the goal is met, `None` without a goal.
    pub fn words_remaining(&self) -> Option<usize> {
        self.word_goal
            .map(|goal| goal.saturating_sub(self.buffer.word_count()))
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Write the buffer to `file_path`.
    ///
    /// # Errors
    ///
    /// Returns an error when there is no path or the write fails.
    pub(super) fn save_to_disk(&mut self) -> Result<()> {
        let Some(path) = self.file_path.clone() else {
            anyhow::bail!("no file name; start tandem with a path to save");
        };
        std::fs::write(&path, self.buffer.text())
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
        self.dirty = false;
        Ok(())
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self {
            buffer: EditBuffer::new(),
            history: SnapshotHistory::default(),
            document: Document::empty(),
            outline: Vec::new(),
            outline_selected: None,
            outline_scroll_offset: 0,
            outline_visible: false,
            outline_focused: false,
            view_mode: ViewMode::Split,
            sync: ScrollSync::new(),
            scroll_lock: true,
            source_viewport: Viewport::new(0, 0, 0),
            preview_viewport: Viewport::new(0, 0, 0),
            file_path: None,
            dirty: false,
            word_goal: None,
            autosave_enabled: true,
            search: SearchState::default(),
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            toast: None,
            should_quit: false,
            quit_confirmed: false,
            terminal_width: 0,
            terminal_height: 0,
        }
    }
}

pub(super) fn refresh_search_matches(model: &mut Model, jump_to_first: bool) {
    let Some(query) = model.search.query.as_deref() else {
        model.search.matches.clear();
        model.search.current = None;
        return;
    };
    model.search.matches = crate::search::find_matches(&model.buffer.text(), query);
    if model.search.matches.is_empty() {
        model.search.current = None;
        return;
    }
    if jump_to_first || model.search.current.is_none() {
        let from = model.buffer.cursor_char_idx();
        let idx = crate::search::next_match(&model.search.matches, from).unwrap_or(0);
        go_to_search_match(model, idx);
    } else if let Some(idx) = model.search.current {
        model.search.current = Some(idx.min(model.search.matches.len() - 1));
    }
}

pub(super) fn go_to_search_match(model: &mut Model, idx: usize) {
    let Some(m) = model.search.matches.get(idx).copied() else {
        return;
    };
    model.search.current = Some(idx);
    model.buffer.set_cursor_char_idx(m.start);
    model.scroll_cursor_into_view();
}
