use std::time::Instant;

use crate::app::Model;
use crate::app::model::{ToastLevel, ViewMode, go_to_search_match, refresh_search_matches};
use crate::editor::format;

/// Cursor movement directions in the source pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    DocStart,
    DocEnd,
}

/// Formatting operations applied to the buffer as one undo step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOp {
    Bold,
    Italic,
    Strikethrough,
    InlineCode,
    /// Prefix the current line as a heading of this level
    Heading(u8),
    BlockQuote,
    BulletList,
    NumberedList,
    Link,
    Image,
    HorizontalRule,
    Table,
    DuplicateLine,
    DeleteLine,
}

/// All possible events and actions in the application.
///
/// Scroll and jump messages carry the `Instant` of the originating event so
/// throttling and suppression windows stay testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a character at the cursor
    InsertChar(char),
    /// Split the line at the cursor (Enter)
    InsertNewline,
    /// Delete before the cursor (Backspace)
    DeleteBackward,
    /// Delete at the cursor (Delete)
    DeleteForward,
    /// Move the cursor, collapsing any selection
    MoveCursor(CursorMove),
    /// Move the cursor while extending the selection (Shift+motion)
    ExtendSelection(CursorMove),
    /// Place the cursor at a source position (mouse click)
    ClickSource(usize, usize),

    // History
    /// Undo the last recorded edit
    Undo,
    /// Re-apply the last undone edit
    Redo,

    // Formatting
    Format(FormatOp),

    // Scrolling and sync
    /// Source pane scrolled by n lines (negative = up)
    ScrollSource(isize, Instant),
    /// Preview pane scrolled by n lines (negative = up)
    ScrollPreview(isize, Instant),
    /// Trailing throttled sync run for the source pane
    SyncFromSource(Instant),
    /// Trailing throttled sync run for the preview pane
    SyncFromPreview(Instant),

    // Outline
    /// Toggle outline sidebar visibility
    ToggleOutline,
    /// Switch focus between outline and editor
    SwitchFocus,
    /// Move outline selection up
    OutlineUp,
    /// Move outline selection down
    OutlineDown,
    /// Scroll the outline sidebar
    OutlineScrollUp,
    OutlineScrollDown,
    /// Jump to the selected outline entry
    OutlineSelect(Instant),
    /// Jump to an outline entry by index (mouse click)
    OutlineClick(usize, Instant),

    // View
    SetViewMode(ViewMode),
    CycleViewMode,
    /// Toggle the scroll-lock preference
    ToggleScrollLock,

    // Search
    StartSearch,
    SearchInput(String),
    /// Move focus to the replace field
    StartReplace,
    ReplaceInput(String),
    NextMatch,
    PrevMatch,
    /// Replace the current match and advance to the next
    ReplaceCurrent,
    ReplaceAll,
    CloseSearch,

    // Help
    ToggleHelp,
    HideHelp,

    // File
    /// Save the buffer to disk (side effect in the event loop)
    Save,
    /// Start a fresh empty document
    NewDocument,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    Quit,
}

impl Message {
    /// Whether this message mutates the buffer text, used by the event loop
    /// to queue a draft autosave.
    pub(super) const fn edits_buffer(&self) -> bool {
        matches!(
            self,
            Self::InsertChar(_)
                | Self::InsertNewline
                | Self::DeleteBackward
                | Self::DeleteForward
                | Self::Format(_)
                | Self::Undo
                | Self::Redo
                | Self::ReplaceCurrent
                | Self::ReplaceAll
        )
    }
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// No side effects should occur in this function.
pub fn update(mut model: Model, msg: Message) -> Model {
    // A pending quit confirmation survives only the messages that complete it.
    if !matches!(msg, Message::Quit | Message::Save) {
        model.quit_confirmed = false;
    }

    match msg {
        // Editing
        Message::InsertChar(ch) => {
            model.buffer.insert_char(ch);
            after_edit(&mut model);
        }
        Message::InsertNewline => {
            model.buffer.insert_newline();
            after_edit(&mut model);
        }
        Message::DeleteBackward => {
            model.buffer.delete_backward();
            after_edit(&mut model);
        }
        Message::DeleteForward => {
            model.buffer.delete_forward();
            after_edit(&mut model);
        }
        Message::MoveCursor(mv) => {
            apply_move(&mut model, mv);
            model.scroll_cursor_into_view();
        }
        Message::ExtendSelection(mv) => {
            let anchor = model
                .buffer
                .selection_anchor_idx()
                .unwrap_or_else(|| model.buffer.cursor_char_idx());
            apply_move(&mut model, mv);
            let cursor = model.buffer.cursor_char_idx();
            if anchor != cursor {
                model.buffer.select_range(anchor, cursor);
            }
            model.scroll_cursor_into_view();
        }
        Message::ClickSource(line, col) => {
            let line = line.min(model.buffer.line_count().saturating_sub(1));
            let col = col.min(model.buffer.line(line).chars().count());
            model.buffer.clear_selection();
            model.buffer.cursor = crate::editor::Cursor {
                line,
                col,
                col_memory: col,
            };
        }

        // History
        Message::Undo => {
            if let Some(text) = model.history.undo(&model.buffer.text()) {
                restore_snapshot(&mut model, &text);
            }
        }
        Message::Redo => {
            if let Some(text) = model.history.redo(&model.buffer.text()) {
                restore_snapshot(&mut model, &text);
            }
        }

        // Formatting
        Message::Format(op) => {
            let before = model.buffer.text();
            apply_format(&mut model.buffer, op);
            let after = model.buffer.text();
            // No history entry when the op was a no-op, e.g. DeleteLine on
            // an empty buffer.
            if after != before {
                model.history.record_before_programmatic_change(&before);
                model.history.commit(&after);
                model.dirty = true;
                model.refresh_preview();
            }
            model.scroll_cursor_into_view();
        }

        // Scrolling and sync
        Message::ScrollSource(lines, now) => {
            scroll_by(&mut model.source_viewport, lines);
            if model.sync.source_throttle.poke(now) {
                run_source_sync(&mut model, now);
            }
        }
        Message::ScrollPreview(lines, now) => {
            scroll_by(&mut model.preview_viewport, lines);
            if model.sync.preview_throttle.poke(now) {
                run_preview_sync(&mut model, now);
            }
        }
        Message::SyncFromSource(now) => run_source_sync(&mut model, now),
        Message::SyncFromPreview(now) => run_preview_sync(&mut model, now),

        // Outline
        Message::ToggleOutline => {
            model.outline_visible = !model.outline_visible;
            model.outline_focused = model.outline_visible && model.outline_focused;
            model.apply_layout();
            model.refresh_preview();
        }
        Message::SwitchFocus => {
            if model.outline_visible {
                model.outline_focused = !model.outline_focused;
            }
        }
        Message::OutlineUp => {
            if let Some(sel) = model.outline_selected {
                let next = sel.saturating_sub(1);
                model.outline_selected = Some(next);
                if next < model.outline_scroll_offset {
                    model.outline_scroll_offset = next;
                }
            } else if !model.outline.is_empty() {
                model.outline_selected = Some(0);
            }
        }
        Message::OutlineDown => {
            if model.outline.is_empty() {
            } else if let Some(sel) = model.outline_selected {
                let max = model.outline.len() - 1;
                let next = (sel + 1).min(max);
                model.outline_selected = Some(next);
                let visible = model.outline_visible_rows();
                if visible > 0 && next >= model.outline_scroll_offset + visible {
                    model.outline_scroll_offset = (next + 1)
                        .saturating_sub(visible)
                        .min(model.max_outline_scroll_offset());
                }
            } else {
                model.outline_selected = Some(0);
            }
        }
        Message::OutlineScrollUp => {
            model.outline_scroll_offset = model.outline_scroll_offset.saturating_sub(1);
        }
        Message::OutlineScrollDown => {
            model.outline_scroll_offset =
                (model.outline_scroll_offset + 1).min(model.max_outline_scroll_offset());
        }
        Message::OutlineSelect(now) => {
            if let Some(sel) = model.outline_selected {
                jump_to_outline_entry(&mut model, sel, now);
            }
        }
        Message::OutlineClick(idx, now) => {
            jump_to_outline_entry(&mut model, idx, now);
        }

        // View
        Message::SetViewMode(mode) => {
            model.view_mode = mode;
            model.apply_layout();
            model.refresh_preview();
        }
        Message::CycleViewMode => {
            model.view_mode = model.view_mode.next();
            model.apply_layout();
            model.refresh_preview();
        }
        Message::ToggleScrollLock => {
            model.scroll_lock = !model.scroll_lock;
            let state = if model.scroll_lock { "on" } else { "off" };
            model.show_toast(ToastLevel::Info, format!("Scroll sync {state}"));
        }

        // Search
        Message::StartSearch => {
            model.search.query = Some(String::new());
            model.search.replacement = None;
            model.search.matches.clear();
            model.search.current = None;
            model.apply_layout();
        }
        Message::SearchInput(query) => {
            model.search.query = Some(query);
            refresh_search_matches(&mut model, true);
        }
        Message::StartReplace => {
            if model.search.query.is_none() {
                model.search.query = Some(String::new());
                model.apply_layout();
            }
            if model.search.replacement.is_none() {
                model.search.replacement = Some(String::new());
            }
        }
        Message::ReplaceInput(replacement) => {
            if model.search.replacing() {
                model.search.replacement = Some(replacement);
            }
        }
        Message::NextMatch => {
            if model.search.matches.is_empty() {
                refresh_search_matches(&mut model, true);
            } else if let Some(current) = model.search.current {
                let next = (current + 1) % model.search.matches.len();
                go_to_search_match(&mut model, next);
            } else {
                go_to_search_match(&mut model, 0);
            }
        }
        Message::PrevMatch => {
            if !model.search.matches.is_empty() {
                let prev = match model.search.current {
                    Some(0) | None => model.search.matches.len() - 1,
                    Some(idx) => idx - 1,
                };
                go_to_search_match(&mut model, prev);
            }
        }
        Message::ReplaceCurrent => {
            replace_current(&mut model);
        }
        Message::ReplaceAll => {
            replace_all(&mut model);
        }
        Message::CloseSearch => {
            model.search.close();
            model.apply_layout();
        }

        // Help
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }

        // File
        // Save: side effect handled in the event loop.
        Message::Save | Message::Redraw => {}
        Message::NewDocument => {
            model.buffer.set_text("");
            model.history.reset("");
            model.dirty = false;
            model.refresh_preview();
            model.source_viewport.go_to_top();
            model.preview_viewport.go_to_top();
        }

        // Window
        Message::Resize(width, height) => {
            model.set_terminal_size(width, height);
            model.refresh_preview();
        }

        // Application
        Message::Quit => {
            if model.dirty && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press Ctrl+Q again to quit, or Ctrl+S to save",
                );
                model.quit_confirmed = true;
            } else {
                model.should_quit = true;
            }
        }
    }
    model
}

/// Record the edit, mark the document dirty, and re-render.
fn after_edit(model: &mut Model) {
    let text = model.buffer.text();
    model.history.record_if_changed(&text);
    model.dirty = true;
    model.refresh_preview();
    model.scroll_cursor_into_view();
}

/// Restore an undo/redo snapshot into the buffer. The history has already
/// re-anchored on the restored text, so no edit is recorded here.
fn restore_snapshot(model: &mut Model, text: &str) {
    model.buffer.set_text(text);
    model.dirty = true;
    model.refresh_preview();
    model.scroll_cursor_into_view();
}

fn apply_move(model: &mut Model, mv: CursorMove) {
    match mv {
        CursorMove::Left => model.buffer.move_left(),
        CursorMove::Right => model.buffer.move_right(),
        CursorMove::Up => model.buffer.move_up(),
        CursorMove::Down => model.buffer.move_down(),
        CursorMove::LineStart => model.buffer.move_line_start(),
        CursorMove::LineEnd => model.buffer.move_line_end(),
        CursorMove::DocStart => model.buffer.move_doc_start(),
        CursorMove::DocEnd => model.buffer.move_doc_end(),
    }
}

fn apply_format(buffer: &mut crate::editor::EditBuffer, op: FormatOp) {
    match op {
        FormatOp::Bold => format::wrap_selection(buffer, "**", "**"),
        FormatOp::Italic => format::wrap_selection(buffer, "*", "*"),
        FormatOp::Strikethrough => format::wrap_selection(buffer, "~~", "~~"),
        FormatOp::InlineCode => format::wrap_selection(buffer, "`", "`"),
        FormatOp::Heading(level) => {
            let level = usize::from(level.clamp(1, 6));
            let prefix = format!("{} ", "#".repeat(level));
            format::prefix_line(buffer, &prefix);
        }
        FormatOp::BlockQuote => format::prefix_line(buffer, "> "),
        FormatOp::BulletList => format::prefix_line(buffer, "- "),
        FormatOp::NumberedList => format::prefix_line(buffer, "1. "),
        FormatOp::Link => format::insert_link(buffer),
        FormatOp::Image => format::insert_image(buffer),
        FormatOp::HorizontalRule => format::insert_horizontal_rule(buffer),
        FormatOp::Table => format::insert_table(buffer),
        FormatOp::DuplicateLine => format::duplicate_line(buffer),
        FormatOp::DeleteLine => format::delete_line(buffer),
    }
}

fn scroll_by(viewport: &mut crate::ui::viewport::Viewport, lines: isize) {
    if lines < 0 {
        viewport.scroll_up(lines.unsigned_abs());
    } else {
        viewport.scroll_down(lines.unsigned_abs());
    }
}

/// Mirror the source pane's position onto the preview and recompute the
/// outline highlight.
fn run_source_sync(model: &mut Model, now: Instant) {
    let gate = model.sync_gate();
    let source = model.source_viewport.metrics();
    let preview = model.preview_viewport.metrics();
    if let Some(target) = model.sync.sync_preview_to_source(gate, &source, &preview) {
        model.preview_viewport.apply_sync_target(target);
    }
    model.highlight_outline_from_source(now);
}

fn run_preview_sync(model: &mut Model, now: Instant) {
    let gate = model.sync_gate();
    let source = model.source_viewport.metrics();
    let preview = model.preview_viewport.metrics();
    if let Some(target) = model.sync.sync_source_to_preview(gate, &preview, &source) {
        model.source_viewport.apply_sync_target(target);
    }
    model.highlight_outline_from_preview(now);
}

/// Scroll both panes to an outline entry. The jump holds the sync lock and
/// suppresses scroll-driven highlight updates for the grace window.
fn jump_to_outline_entry(model: &mut Model, idx: usize, now: Instant) {
    let Some(entry) = model.outline.get(idx) else {
        return;
    };
    let line = entry.line;
    model.outline_selected = Some(idx);
    model.sync.begin_jump(now);
    model.source_viewport.go_to_line(line);
    model.buffer.cursor = crate::editor::Cursor {
        line,
        col: 0,
        col_memory: 0,
    };
    if let Some(anchor) = model.document.heading_anchors().get(idx).copied() {
        model.preview_viewport.apply_sync_target(anchor);
    }
}

/// Replace the current match, then step to the next one.
fn replace_current(model: &mut Model) {
    let Some(idx) = model.search.current else {
        return;
    };
    let Some(m) = model.search.matches.get(idx).copied() else {
        return;
    };
    let replacement = model.search.replacement.clone().unwrap_or_default();
    let before = model.buffer.text();
    model.history.record_before_programmatic_change(&before);
    model.buffer.replace_range(m.start, m.end, &replacement);
    model.history.commit(&model.buffer.text());
    model.dirty = true;
    model.refresh_preview();
    // Advance to the match following the replaced span.
    if !model.search.matches.is_empty() {
        let from = m.start + replacement.chars().count();
        let next = crate::search::next_match(&model.search.matches, from).unwrap_or(0);
        go_to_search_match(model, next);
    }
}

/// Replace every match of the current query in one undo step.
fn replace_all(model: &mut Model) {
    let Some(query) = model.search.query.clone() else {
        return;
    };
    if query.is_empty() {
        return;
    }
    let replacement = model.search.replacement.clone().unwrap_or_default();
    let before = model.buffer.text();
    let (after, count) = crate::search::replace_all(&before, &query, &replacement);
    if count == 0 {
        model.show_toast(ToastLevel::Info, "No matches");
        return;
    }
    model.history.record_before_programmatic_change(&before);
    model.buffer.set_text(&after);
    model.history.commit(&after);
    model.dirty = true;
    model.refresh_preview();
    model.show_toast(
        ToastLevel::Info,
        format!("Replaced {count} occurrence{}", if count == 1 { "" } else { "s" }),
    );
}
