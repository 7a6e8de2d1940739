use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel, ViewMode};

use super::style::{STATUS_BG, STATUS_FG};

pub fn render_search_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let query = model.search.query.as_deref().unwrap_or_default();
    let match_info = if query.trim().is_empty() {
        String::new()
    } else if let Some((current, total)) = model.search.current_match() {
        format!("  [{current}/{total}]")
    } else {
        "  [no matches]".to_string()
    };
    let text = if let Some(replacement) = model.search.replacement.as_deref() {
        format!("/{query} -> {replacement}{match_info}  Enter: replace all  Ctrl+R: replace one  Esc: close")
    } else {
        format!("/{query}{match_info}  Enter: next  Tab: replace  Esc: close")
    };
    let bar = Paragraph::new(text).style(Style::default().bg(Color::Blue).fg(Color::White));
    frame.render_widget(bar, area);
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    // A toast borrows the status row until it expires.
    if let Some((message, level)) = model.active_toast() {
        let style = match level {
            ToastLevel::Info => Style::default().bg(STATUS_BG).fg(STATUS_FG),
            ToastLevel::Warning => Style::default().bg(Color::Yellow).fg(Color::Black),
            ToastLevel::Error => Style::default().bg(Color::Red).fg(Color::White),
        };
        frame.render_widget(Paragraph::new(format!(" {message}")).style(style), area);
        return;
    }

    let mode = match model.view_mode {
        ViewMode::Edit => "EDIT",
        ViewMode::Split => "SPLIT",
        ViewMode::Preview => "PREVIEW",
    };

    let filename = model
        .file_path
        .as_deref()
        .and_then(|p| p.file_name())
        .map_or_else(
            || "untitled".to_string(),
            |s| s.to_string_lossy().to_string(),
        );
    let modified = if model.dirty { " [modified]" } else { "" };

    let cursor = model.buffer.cursor;
    let position = format!("Ln {}, Col {}", cursor.line + 1, cursor.col + 1);

    let words = model.buffer.word_count();
    let word_info = match (model.word_goal, model.words_remaining()) {
        (Some(goal), Some(remaining)) => format!("{words}/{goal}w ({remaining} to go)"),
        (Some(goal), None) => format!("{words}/{goal}w (done)"),
        _ => format!("{words}w"),
    };
    let chars = model.buffer.char_count();

    let percent = model.source_viewport.scroll_percent();
    let sync = if model.scroll_lock { "sync" } else { "no-sync" };

    let status = format!(
        " {mode}  {filename}{modified}  {position}  {word_info} {chars}c  [{percent}%]  [{sync}]  F1:help"
    );

    let status_bar = Paragraph::new(status).style(Style::default().bg(STATUS_BG).fg(STATUS_FG));
    frame.render_widget(status_bar, area);
}
