use std::time::Instant;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::model::ViewMode;
use crate::app::{App, Message, Model};
use crate::app::update::{CursorMove, FormatOp};

use super::event_loop::ResizeDebouncer;

/// Which pane a terminal cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Outline,
    Source,
    Preview,
    Footer,
}

impl App {
    pub(super) fn handle_event(
        event: Event,
        model: &Model,
        now: Instant,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => Self::handle_key(key, model, now),
            Event::Mouse(mouse) => Self::handle_mouse(mouse, model, now),
            Event::Resize(w, h) => {
                resize_debouncer.queue(w, h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model, now: Instant) -> Option<Message> {
        if model.help_visible {
            if matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left)) {
                return Some(Message::HideHelp);
            }
            return None;
        }

        let pane = pane_at(model, mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::ScrollDown => match pane {
                Pane::Outline => Some(Message::OutlineScrollDown),
                Pane::Source => Some(Message::ScrollSource(3, now)),
                Pane::Preview => Some(Message::ScrollPreview(3, now)),
                Pane::Footer => None,
            },
            MouseEventKind::ScrollUp => match pane {
                Pane::Outline => Some(Message::OutlineScrollUp),
                Pane::Source => Some(Message::ScrollSource(-3, now)),
                Pane::Preview => Some(Message::ScrollPreview(-3, now)),
                Pane::Footer => None,
            },
            MouseEventKind::Up(MouseButton::Left) => match pane {
                Pane::Outline => {
                    // Border row at the top of the sidebar.
                    let rel = usize::from(mouse.row.checked_sub(1)?);
                    let idx = model.outline_scroll_offset + rel;
                    if idx < model.outline.len() {
                        Some(Message::OutlineClick(idx, now))
                    } else {
                        None
                    }
                }
                Pane::Source => {
                    let (outline_w, _, _) = model.pane_widths();
                    // Skip the line-number gutter and its trailing space.
                    let gutter = crate::ui::line_number_width(model.buffer.line_count()) + 1;
                    let line = model.source_viewport.offset() + usize::from(mouse.row);
                    let col = usize::from(mouse.column.saturating_sub(outline_w + gutter));
                    Some(Message::ClickSource(line, col))
                }
                Pane::Preview | Pane::Footer => None,
            },
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model, now: Instant) -> Option<Message> {
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        if model.search.active() {
            return Self::handle_search_key(key, model);
        }

        if model.outline_focused && model.outline_visible {
            return match key.code {
                KeyCode::Down | KeyCode::Char('j') => Some(Message::OutlineDown),
                KeyCode::Up | KeyCode::Char('k') => Some(Message::OutlineUp),
                KeyCode::Enter => Some(Message::OutlineSelect(now)),
                KeyCode::Esc | KeyCode::BackTab => Some(Message::SwitchFocus),
                KeyCode::F(2) => Some(Message::ToggleOutline),
                KeyCode::F(1) => Some(Message::ToggleHelp),
                KeyCode::Char('q') => Some(Message::Quit),
                _ => None,
            };
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if ctrl {
            return match key.code {
                KeyCode::Char('q') => Some(Message::Quit),
                KeyCode::Char('s') => Some(Message::Save),
                KeyCode::Char('n') => Some(Message::NewDocument),
                KeyCode::Char('z') if shift => Some(Message::Redo),
                KeyCode::Char('z') => Some(Message::Undo),
                KeyCode::Char('y') => Some(Message::Redo),
                KeyCode::Char('f') => Some(Message::StartSearch),
                KeyCode::Char('h') => Some(Message::StartReplace),
                KeyCode::Char('b') => Some(Message::Format(FormatOp::Bold)),
                KeyCode::Char('d') => Some(Message::Format(FormatOp::DuplicateLine)),
                KeyCode::Char('k') => Some(Message::Format(FormatOp::DeleteLine)),
                KeyCode::Char('p') => Some(Message::CycleViewMode),
                KeyCode::Char('l') => Some(Message::ToggleScrollLock),
                KeyCode::Home => Some(Message::MoveCursor(CursorMove::DocStart)),
                KeyCode::End => Some(Message::MoveCursor(CursorMove::DocEnd)),
                _ => None,
            };
        }

        if alt {
            return match key.code {
                KeyCode::Char('i') => Some(Message::Format(FormatOp::Italic)),
                KeyCode::Char('s') => Some(Message::Format(FormatOp::Strikethrough)),
                KeyCode::Char('c') => Some(Message::Format(FormatOp::InlineCode)),
                KeyCode::Char(c @ '1'..='6') => {
                    Some(Message::Format(FormatOp::Heading(c as u8 - b'0')))
                }
                KeyCode::Char('q') => Some(Message::Format(FormatOp::BlockQuote)),
                KeyCode::Char('l') => Some(Message::Format(FormatOp::BulletList)),
                KeyCode::Char('n') => Some(Message::Format(FormatOp::NumberedList)),
                KeyCode::Char('k') => Some(Message::Format(FormatOp::Link)),
                KeyCode::Char('m') => Some(Message::Format(FormatOp::Image)),
                KeyCode::Char('r') => Some(Message::Format(FormatOp::HorizontalRule)),
                KeyCode::Char('t') => Some(Message::Format(FormatOp::Table)),
                KeyCode::PageDown => Some(Message::ScrollPreview(page_lines(model), now)),
                KeyCode::PageUp => Some(Message::ScrollPreview(-page_lines(model), now)),
                _ => None,
            };
        }

        // Preview-only mode is read-only: plain keys scroll the preview.
        if model.view_mode == ViewMode::Preview {
            return match key.code {
                KeyCode::Down | KeyCode::Char('j') => Some(Message::ScrollPreview(1, now)),
                KeyCode::Up | KeyCode::Char('k') => Some(Message::ScrollPreview(-1, now)),
                KeyCode::PageDown | KeyCode::Char(' ') => {
                    Some(Message::ScrollPreview(page_lines(model), now))
                }
                KeyCode::PageUp => Some(Message::ScrollPreview(-page_lines(model), now)),
                KeyCode::F(1) => Some(Message::ToggleHelp),
                KeyCode::F(2) => Some(Message::ToggleOutline),
                KeyCode::Char('q') | KeyCode::Esc => Some(Message::Quit),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Left if shift => Some(Message::ExtendSelection(CursorMove::Left)),
            KeyCode::Right if shift => Some(Message::ExtendSelection(CursorMove::Right)),
            KeyCode::Up if shift => Some(Message::ExtendSelection(CursorMove::Up)),
            KeyCode::Down if shift => Some(Message::ExtendSelection(CursorMove::Down)),
            KeyCode::Home if shift => Some(Message::ExtendSelection(CursorMove::LineStart)),
            KeyCode::End if shift => Some(Message::ExtendSelection(CursorMove::LineEnd)),
            KeyCode::Left => Some(Message::MoveCursor(CursorMove::Left)),
            KeyCode::Right => Some(Message::MoveCursor(CursorMove::Right)),
            KeyCode::Up => Some(Message::MoveCursor(CursorMove::Up)),
            KeyCode::Down => Some(Message::MoveCursor(CursorMove::Down)),
            KeyCode::Home => Some(Message::MoveCursor(CursorMove::LineStart)),
            KeyCode::End => Some(Message::MoveCursor(CursorMove::LineEnd)),
            KeyCode::PageDown => Some(Message::ScrollSource(page_lines(model), now)),
            KeyCode::PageUp => Some(Message::ScrollSource(-page_lines(model), now)),
            KeyCode::Enter => Some(Message::InsertNewline),
            KeyCode::Backspace => Some(Message::DeleteBackward),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Tab => Some(Message::InsertChar('\t')),
            KeyCode::BackTab => Some(Message::SwitchFocus),
            KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::F(2) => Some(Message::ToggleOutline),
            KeyCode::F(3) if shift => Some(Message::PrevMatch),
            KeyCode::F(3) => Some(Message::NextMatch),
            KeyCode::Char(c) => Some(Message::InsertChar(c)),
            _ => None,
        }
    }

    fn handle_search_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let replacing = model.search.replacing();
        match key.code {
            KeyCode::Esc => Some(Message::CloseSearch),
            KeyCode::Tab => Some(Message::StartReplace),
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) && replacing => {
                Some(Message::ReplaceCurrent)
            }
            KeyCode::Enter if replacing => Some(Message::ReplaceAll),
            KeyCode::Enter => Some(Message::NextMatch),
            KeyCode::Up => Some(Message::PrevMatch),
            KeyCode::Down => Some(Message::NextMatch),
            KeyCode::Backspace => {
                if replacing {
                    let mut next = model.search.replacement.clone().unwrap_or_default();
                    next.pop();
                    Some(Message::ReplaceInput(next))
                } else {
                    let mut next = model.search.query.clone().unwrap_or_default();
                    next.pop();
                    Some(Message::SearchInput(next))
                }
            }
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                if replacing {
                    let mut next = model.search.replacement.clone().unwrap_or_default();
                    next.push(c);
                    Some(Message::ReplaceInput(next))
                } else {
                    let mut next = model.search.query.clone().unwrap_or_default();
                    next.push(c);
                    Some(Message::SearchInput(next))
                }
            }
            _ => None,
        }
    }
}

#[allow(clippy::cast_possible_wrap)]
fn page_lines(model: &Model) -> isize {
    let (_, height) = model.terminal_size();
    height.saturating_sub(model.footer_rows()) as isize
}

fn pane_at(model: &Model, col: u16, row: u16) -> Pane {
    let (_, height) = model.terminal_size();
    if row >= height.saturating_sub(model.footer_rows()) {
        return Pane::Footer;
    }
    let (outline_w, source_w, _) = model.pane_widths();
    if col < outline_w {
        return Pane::Outline;
    }
    if col < outline_w + source_w {
        return Pane::Source;
    }
    Pane::Preview
}
