use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::Model;
use crate::document::LineType;

use super::status;

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let footer_rows = model.footer_rows();
    let pane_area = Rect {
        height: area.height.saturating_sub(footer_rows),
        ..area
    };
    let search_area = Rect {
        y: area.y + area.height.saturating_sub(2),
        height: 1,
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };

    let (outline_w, source_w, preview_w) = model.pane_widths();
    let mut x = pane_area.x;
    if outline_w > 0 {
        let outline_area = Rect {
            x,
            width: outline_w,
            ..pane_area
        };
        render_outline(model, frame, outline_area);
        x += outline_w;
    }
    if source_w > 0 {
        let source_area = Rect {
            x,
            width: source_w,
            ..pane_area
        };
        render_source(model, frame, source_area);
        x += source_w;
    }
    if source_w > 0 && preview_w > 0 {
        let divider_area = Rect {
            x,
            width: 1,
            ..pane_area
        };
        render_divider(frame, divider_area);
        x += 1;
    }
    if preview_w > 0 {
        let preview_area = Rect {
            x,
            width: preview_w,
            ..pane_area
        };
        render_preview(model, frame, preview_area);
    }

    if model.search.active() {
        status::render_search_bar(model, frame, search_area);
    }
    status::render_status_bar(model, frame, status_area);

    if model.help_visible {
        render_help_overlay(frame, area);
    }
}

fn render_outline(model: &Model, frame: &mut Frame, area: Rect) {
    let visible_rows = area.height.saturating_sub(2) as usize;
    let max_start = model.outline.len().saturating_sub(visible_rows);
    let start = model.outline_scroll_offset.min(max_start);
    let end = (start + visible_rows).min(model.outline.len());

    let items: Vec<Line> = model
        .outline
        .iter()
        .enumerate()
        .skip(start)
        .take(end.saturating_sub(start))
        .map(|(i, entry)| {
            let indent = "  ".repeat(usize::from(entry.level).saturating_sub(1));
            let marker = if model.outline_selected == Some(i) {
                ">"
            } else {
                " "
            };
            let base_style = super::style::style_for_line_type(&LineType::Heading(entry.level));
            let style = if model.outline_selected == Some(i) {
                base_style.reversed()
            } else {
                base_style
            };
            Line::styled(format!("{}{} {}", marker, indent, entry.text), style)
        })
        .collect();

    let block = Block::default()
        .title("Outline")
        .borders(Borders::ALL)
        .border_style(if model.outline_focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });

    frame.render_widget(Paragraph::new(items).block(block), area);
}

fn render_source(model: &Model, frame: &mut Frame, area: Rect) {
    let buf = &model.buffer;
    let total_lines = buf.line_count();
    let gutter_width = line_number_width(total_lines);

    let start = model.source_viewport.offset();
    let end = (start + area.height as usize).min(total_lines);
    let cursor = buf.cursor;
    let selection = buf.selection_range();
    let query = model.search.query.as_deref().filter(|q| !q.is_empty());

    let mut content: Vec<Line> = Vec::new();
    let mut line_start_char = 0;
    // Char index of the first visible line, for selection mapping.
    for line_idx in 0..start {
        line_start_char += buf.line(line_idx).chars().count() + 1;
    }

    for line_idx in start..end {
        let line_text = buf.line(line_idx);
        let line_chars = line_text.chars().count();
        let line_num = format!("{:>width$} ", line_idx + 1, width = gutter_width as usize);

        let mut spans = vec![Span::styled(line_num, Style::default().fg(Color::DarkGray))];
        let body = if line_idx == cursor.line {
            line_with_cursor(&line_text, cursor.col)
        } else {
            vec![Span::raw(line_text.clone())]
        };
        let body = match selection {
            Some((sel_start, sel_end)) => apply_selection(
                body,
                line_start_char,
                sel_start,
                sel_end,
            ),
            None => body,
        };
        let body = match query {
            Some(q) => highlight_spans(&body, q),
            None => body,
        };
        spans.extend(body);
        content.push(Line::from(spans));
        line_start_char += line_chars + 1;
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);
}

fn render_divider(frame: &mut Frame, area: Rect) {
    let rows = vec![Line::raw("│"); area.height as usize];
    frame.render_widget(
        Paragraph::new(rows).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let visible_lines = model
        .document
        .visible_lines(model.preview_viewport.offset(), area.height as usize);

    let mut content: Vec<Line> = Vec::new();
    for line in visible_lines {
        let line_style = super::style::style_for_line_type(line.line_type());
        if let Some(spans) = line.spans() {
            let styled: Vec<Span> = spans
                .iter()
                .map(|span| {
                    Span::styled(
                        span.text().to_string(),
                        super::style::style_for_inline(line_style, span.style()),
                    )
                })
                .collect();
            content.push(Line::from(styled));
        } else {
            content.push(Line::styled(line.content().to_string(), line_style));
        }
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);
}

/// Split a line into spans with a block cursor at `col`.
fn line_with_cursor(text: &str, col: usize) -> Vec<Span<'static>> {
    let chars: Vec<char> = text.chars().collect();
    let col = col.min(chars.len());
    let before: String = chars[..col].iter().collect();
    let cursor_char = chars.get(col).map_or(" ".to_string(), ToString::to_string);
    let after: String = chars.get(col + 1..).unwrap_or(&[]).iter().collect();

    let mut spans = Vec::new();
    if !before.is_empty() {
        spans.push(Span::raw(before));
    }
    spans.push(Span::styled(
        cursor_char,
        Style::default().bg(Color::White).fg(Color::Black),
    ));
    if !after.is_empty() {
        spans.push(Span::raw(after));
    }
    spans
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}

/// Re-style span segments that fall inside the selection char range.
/// `line_start` is the char index of the first span's first character.
fn apply_selection(
    spans: Vec<Span<'static>>,
    line_start: usize,
    sel_start: usize,
    sel_end: usize,
) -> Vec<Span<'static>> {
    let mut out = Vec::new();
    let mut pos = line_start;
    for span in spans {
        let text = span.content.to_string();
        let len = text.chars().count();
        let span_end = pos + len;
        if span_end <= sel_start || pos >= sel_end || len == 0 {
            out.push(Span::styled(text, span.style));
        } else {
            let chars: Vec<char> = text.chars().collect();
            let cut_a = sel_start.saturating_sub(pos).min(len);
            let cut_b = sel_end.saturating_sub(pos).min(len);
            if cut_a > 0 {
                out.push(Span::styled(
                    chars[..cut_a].iter().collect::<String>(),
                    span.style,
                ));
            }
            out.push(Span::styled(
                chars[cut_a..cut_b].iter().collect::<String>(),
                span.style.bg(Color::DarkGray),
            ));
            if cut_b < len {
                out.push(Span::styled(
                    chars[cut_b..].iter().collect::<String>(),
                    span.style,
                ));
            }
        }
        pos = span_end;
    }
    out
}

fn highlight_spans(spans: &[Span<'_>], query: &str) -> Vec<Span<'static>> {
    let needle = query.trim();
    if needle.is_empty() {
        return spans
            .iter()
            .map(|s| Span::styled(s.content.to_string(), s.style))
            .collect();
    }
    let needle_lower = needle.to_ascii_lowercase();
    let mut out = Vec::new();

    for span in spans {
        let text = span.content.to_string();
        let text_lower = text.to_ascii_lowercase();
        let mut cursor = 0usize;

        while let Some(rel_idx) = text_lower[cursor..].find(&needle_lower) {
            let start = cursor + rel_idx;
            let end = start + needle_lower.len();

            if start > cursor {
                out.push(Span::styled(text[cursor..start].to_string(), span.style));
            }
            out.push(Span::styled(
                text[start..end].to_string(),
                span.style.bg(Color::Yellow).fg(Color::Black),
            ));
            cursor = end;
        }

        if cursor < text.len() {
            out.push(Span::styled(text[cursor..].to_string(), span.style));
        }
    }

    out
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::styled("tandem", Style::default().add_modifier(Modifier::BOLD)),
        Line::raw(""),
        Line::raw("Ctrl+S save          Ctrl+Q quit"),
        Line::raw("Ctrl+Z undo          Ctrl+Y redo"),
        Line::raw("Ctrl+F find          Ctrl+H replace"),
        Line::raw("Ctrl+B bold          Alt+I italic"),
        Line::raw("Alt+C inline code    Alt+S strikethrough"),
        Line::raw("Alt+1..6 heading     Alt+Q quote"),
        Line::raw("Alt+L bullet list    Alt+N numbered list"),
        Line::raw("Alt+K link           Alt+M image"),
        Line::raw("Alt+T table          Alt+R rule"),
        Line::raw("Ctrl+D duplicate     Ctrl+K delete line"),
        Line::raw("Ctrl+P view mode     Ctrl+L scroll sync"),
        Line::raw("F2 outline           Shift+Tab focus"),
        Line::raw(""),
        Line::raw("Press any key to close"),
    ];
    #[allow(clippy::cast_possible_truncation)]
    let height = (lines.len() as u16 + 2).min(area.height);
    let width = 46u16.min(area.width);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    let block = Block::default().title("Help").borders(Borders::ALL);
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
