//! Markdown preview rendering with comrak.

use anyhow::Result;
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{Arena, Options, parse_document};
use unicode_width::UnicodeWidthStr;

use super::types::{Document, HeadingRef, InlineSpan, InlineStyle, LineType, RenderedLine};

impl Document {
    /// Render markdown source into preview lines at the default width.
    ///
    /// # Example
    ///
    /// ```
    /// use tandem::document::Document;
    ///
    /// let doc = Document::render("# Hello\n\nWorld", 80).unwrap();
    /// assert_eq!(doc.headings().len(), 1);
    /// ```
    pub fn render(source: &str, width: u16) -> Result<Self> {
        let arena = Arena::new();
        let root = parse_document(&arena, source, &comrak_options());

        let mut renderer = Renderer::new(width.max(1) as usize);
        renderer.block(root, 0, None);
        Ok(Self::from_rendered(
            source.to_string(),
            renderer.lines,
            renderer.headings,
        ))
    }
}

fn comrak_options() -> Options {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options
}

/// Accumulates rendered lines while walking the comrak AST.
struct Renderer {
    lines: Vec<RenderedLine>,
    headings: Vec<HeadingRef>,
    wrap: usize,
}

impl Renderer {
    fn new(wrap: usize) -> Self {
        Self {
            lines: Vec::new(),
            headings: Vec::new(),
            wrap,
        }
    }

    fn block<'a>(&mut self, node: &'a AstNode<'a>, depth: usize, marker: Option<&str>) {
        match &node.data.borrow().value {
            NodeValue::Document => {
                for child in node.children() {
                    self.block(child, depth, marker);
                }
            }

            NodeValue::Heading(heading) => {
                let text = extract_text(node);
                self.headings.push(HeadingRef {
                    level: heading.level,
                    text: text.clone(),
                    line: self.lines.len(),
                });
                self.lines.push(RenderedLine::new(
                    format!("{} {text}", "#".repeat(heading.level as usize)),
                    LineType::Heading(heading.level),
                ));
                self.blank_line();
            }

            NodeValue::Paragraph => {
                let spans = collect_inline_spans(node);
                self.push_wrapped(&spans, LineType::Paragraph, "", "");
                self.blank_line();
            }

            NodeValue::CodeBlock(code) => {
                let language = code.info.split_whitespace().next().unwrap_or("code");
                self.lines.push(RenderedLine::new(
                    format!("┌ {language} ─"),
                    LineType::CodeBlock,
                ));
                for raw in code.literal.lines() {
                    let style = InlineStyle {
                        code: true,
                        ..InlineStyle::default()
                    };
                    let spans = vec![
                        InlineSpan::new("│ ".to_string(), InlineStyle::default()),
                        InlineSpan::new(raw.to_string(), style),
                    ];
                    let content = spans_to_string(&spans);
                    self.lines
                        .push(RenderedLine::with_spans(content, LineType::CodeBlock, spans));
                }
                self.lines
                    .push(RenderedLine::new("└─".to_string(), LineType::CodeBlock));
                self.blank_line();
            }

            NodeValue::List(list) => {
                for (index, child) in node.children().enumerate() {
                    let item_marker = match list.list_type {
                        ListType::Bullet => "• ".to_string(),
                        ListType::Ordered => format!("{}. ", list.start + index),
                    };
                    self.block(child, depth + 1, Some(&item_marker));
                }
                if depth == 0 {
                    self.blank_line();
                }
            }

            NodeValue::Item(_) | NodeValue::TaskItem(_) => {
                let marker = match &node.data.borrow().value {
                    NodeValue::TaskItem(symbol) => {
                        if symbol.is_some() { "✓ " } else { "□ " }
                    }
                    _ => marker.unwrap_or("• "),
                };
                let indent = "  ".repeat(depth.saturating_sub(1));
                let first = format!("{indent}{marker}");
                let rest = format!("{indent}{}", " ".repeat(marker.chars().count()));
                let mut rendered_text = false;
                for child in node.children() {
                    match &child.data.borrow().value {
                        NodeValue::Paragraph => {
                            let spans = collect_inline_spans(child);
                            let prefix = if rendered_text { &rest } else { &first };
                            self.push_wrapped(&spans, LineType::ListItem(depth), prefix, &rest);
                            rendered_text = true;
                        }
                        NodeValue::List(_) => self.block(child, depth, None),
                        _ => self.block(child, depth, None),
                    }
                }
                if !rendered_text {
                    let spans = collect_inline_spans(node);
                    self.push_wrapped(&spans, LineType::ListItem(depth), &first, &rest);
                }
            }

            NodeValue::BlockQuote => {
                for child in node.children() {
                    let spans = collect_inline_spans(child);
                    self.push_wrapped(&spans, LineType::BlockQuote, "│ ", "│ ");
                }
                self.blank_line();
            }

            NodeValue::ThematicBreak => {
                self.lines
                    .push(RenderedLine::new("───".to_string(), LineType::HorizontalRule));
                self.blank_line();
            }

            NodeValue::Table(_) => {
                for row in render_table(node, self.wrap) {
                    self.lines.push(RenderedLine::new(row, LineType::Table));
                }
                self.blank_line();
            }

            _ => {
                for child in node.children() {
                    self.block(child, depth, marker);
                }
            }
        }
    }

    fn blank_line(&mut self) {
        self.lines
            .push(RenderedLine::new(String::new(), LineType::Empty));
    }

    fn push_wrapped(
        &mut self,
        spans: &[InlineSpan],
        line_type: LineType,
        prefix_first: &str,
        prefix_rest: &str,
    ) {
        for line_spans in wrap_spans(spans, self.wrap, prefix_first, prefix_rest) {
            let content = spans_to_string(&line_spans);
            self.lines
                .push(RenderedLine::with_spans(content, line_type, line_spans));
        }
    }
}

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    extract_text_into(node, &mut text);
    text
}

fn extract_text_into<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => text.push_str(t),
        NodeValue::Code(c) => text.push_str(&c.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
        _ => {
            for child in node.children() {
                extract_text_into(child, text);
            }
        }
    }
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    collect_spans_into(node, InlineStyle::default(), &mut spans);
    spans
}

fn collect_spans_into<'a>(node: &'a AstNode<'a>, style: InlineStyle, spans: &mut Vec<InlineSpan>) {
    match &node.data.borrow().value {
        // Nested blocks are walked separately by the renderer.
        NodeValue::List(_) | NodeValue::Item(_) => {}
        NodeValue::Text(t) => spans.push(InlineSpan::new(t.clone(), style)),
        NodeValue::Code(code) => {
            let code_style = InlineStyle {
                code: true,
                link: style.link,
                ..InlineStyle::default()
            };
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
        }
        NodeValue::Emph => {
            let next = InlineStyle {
                emphasis: true,
                ..style
            };
            for child in node.children() {
                collect_spans_into(child, next, spans);
            }
        }
        NodeValue::Strong => {
            let next = InlineStyle {
                strong: true,
                ..style
            };
            for child in node.children() {
                collect_spans_into(child, next, spans);
            }
        }
        NodeValue::Strikethrough => {
            let next = InlineStyle {
                strikethrough: true,
                ..style
            };
            for child in node.children() {
                collect_spans_into(child, next, spans);
            }
        }
        NodeValue::Link(_) | NodeValue::Image(_) => {
            let next = InlineStyle { link: true, ..style };
            for child in node.children() {
                collect_spans_into(child, next, spans);
            }
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            spans.push(InlineSpan::new(" ".to_string(), style));
        }
        _ => {
            for child in node.children() {
                collect_spans_into(child, style, spans);
            }
        }
    }
}

/// Greedy word wrap over styled spans. The first line takes `prefix_first`,
/// continuation lines take `prefix_rest`.
fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_rest: &str,
) -> Vec<Vec<InlineSpan>> {
    let tokens: Vec<InlineSpan> = spans.iter().flat_map(split_words).collect();

    let new_line = |prefix: &str| -> (Vec<InlineSpan>, usize) {
        if prefix.is_empty() {
            (Vec::new(), 0)
        } else {
            (
                vec![InlineSpan::new(prefix.to_string(), InlineStyle::default())],
                prefix.chars().count(),
            )
        }
    };

    let mut lines = Vec::new();
    let (mut current, mut len) = new_line(prefix_first);
    let mut has_word = false;

    for token in tokens {
        let token_len = token.text().chars().count();
        let is_ws = token.text().chars().all(char::is_whitespace);

        if has_word && len + token_len > width {
            lines.push(std::mem::take(&mut current));
            (current, len) = new_line(prefix_rest);
            has_word = false;
        }
        if is_ws && !has_word {
            // Drop leading whitespace at wrapped line starts.
            continue;
        }
        len += token_len;
        has_word = has_word || !is_ws;
        current.push(token);
    }

    if current.is_empty() && !prefix_first.is_empty() {
        current.push(InlineSpan::new(
            prefix_first.to_string(),
            InlineStyle::default(),
        ));
    }
    lines.push(current);
    lines
}

/// Split a span into alternating word and whitespace tokens, each keeping
/// the span's style.
fn split_words(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut buf_is_ws: Option<bool> = None;
    for ch in span.text().chars() {
        let is_ws = ch.is_whitespace();
        if buf_is_ws.is_some_and(|b| b != is_ws) {
            out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
        }
        buf.push(ch);
        buf_is_ws = Some(is_ws);
    }
    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }
    out
}

fn spans_to_string(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}

fn render_table<'a>(table_node: &'a AstNode<'a>, width: usize) -> Vec<String> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut has_header = false;
    for row_node in table_node.children() {
        let NodeValue::TableRow(is_header) = row_node.data.borrow().value else {
            continue;
        };
        has_header |= is_header;
        rows.push(
            row_node
                .children()
                .map(|cell| {
                    extract_text(cell)
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect(),
        );
    }
    if rows.is_empty() {
        return Vec::new();
    }

    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(cols, String::new());
    }
    let mut widths = vec![1usize; cols];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(UnicodeWidthStr::width(cell.as_str()));
        }
    }
    // Shrink the widest column until the table fits.
    while 1 + widths.iter().sum::<usize>() + 3 * cols > width.max(4) {
        match widths.iter_mut().max() {
            Some(w) if *w > 1 => *w -= 1,
            _ => break,
        }
    }

    let border = |l: char, m: char, r: char| {
        let mut out = String::new();
        out.push(l);
        for (i, w) in widths.iter().enumerate() {
            out.push_str(&"─".repeat(w + 2));
            out.push(if i + 1 < widths.len() { m } else { r });
        }
        out
    };

    let mut out = vec![border('┌', '┬', '┐')];
    for (idx, row) in rows.iter().enumerate() {
        let mut line = String::from("│");
        for (i, cell) in row.iter().enumerate() {
            let cell: String = cell.chars().take(widths[i]).collect();
            let pad = widths[i].saturating_sub(UnicodeWidthStr::width(cell.as_str()));
            line.push(' ');
            line.push_str(&cell);
            line.push_str(&" ".repeat(pad + 1));
            line.push('│');
        }
        out.push(line);
        if has_header && idx == 0 {
            out.push(border('├', '┼', '┤'));
        }
    }
    out.push(border('└', '┴', '┘'));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(src: &str) -> Document {
        Document::render(src, 80).expect("render")
    }

    #[test]
    fn test_heading_records_anchor_line() {
        let doc = render("# Title\n\nbody\n\n## Second");
        assert_eq!(doc.headings().len(), 2);
        assert_eq!(doc.headings()[0].line, 0);
        assert_eq!(doc.headings()[0].level, 1);
        let second = &doc.headings()[1];
        assert_eq!(
            doc.line_at(second.line).map(RenderedLine::line_type),
            Some(&LineType::Heading(2))
        );
    }

    #[test]
    fn test_paragraph_inline_styles() {
        let doc = render("plain **bold** and *em* and `code`");
        let spans = doc.line_at(0).and_then(RenderedLine::spans).expect("spans");
        assert!(spans.iter().any(|s| s.style().strong && s.text() == "bold"));
        assert!(spans.iter().any(|s| s.style().emphasis && s.text() == "em"));
        assert!(spans.iter().any(|s| s.style().code && s.text() == "code"));
    }

    #[test]
    fn test_long_paragraph_wraps() {
        let src = "word ".repeat(40);
        let doc = Document::render(&src, 20).expect("render");
        assert!(doc.line_count() > 5);
        for line in doc.visible_lines(0, doc.line_count()) {
            assert!(line.content().chars().count() <= 20);
        }
    }

    #[test]
    fn test_code_block_framed() {
        let doc = render("```rust\nfn main() {}\n```");
        assert!(doc.line_at(0).is_some_and(|l| l.content().contains("rust")));
        assert!(doc.line_at(1).is_some_and(|l| l.content().contains("fn main() {}")));
        assert_eq!(doc.line_at(1).map(RenderedLine::line_type), Some(&LineType::CodeBlock));
    }

    #[test]
    fn test_bullet_and_ordered_lists() {
        let doc = render("- one\n- two\n\n1. first\n2. second\n");
        let text: Vec<&str> = doc
            .visible_lines(0, doc.line_count())
            .iter()
            .map(|l| l.content())
            .collect();
        assert!(text.iter().any(|l| l.starts_with("• one")));
        assert!(text.iter().any(|l| l.starts_with("1. first")));
        assert!(text.iter().any(|l| l.starts_with("2. second")));
    }

    #[test]
    fn test_task_list_markers() {
        let doc = render("- [x] done\n- [ ] open\n");
        let text: Vec<&str> = doc
            .visible_lines(0, doc.line_count())
            .iter()
            .map(|l| l.content())
            .collect();
        assert!(text.iter().any(|l| l.contains("✓ done")));
        assert!(text.iter().any(|l| l.contains("□ open")));
    }

    #[test]
    fn test_blockquote_prefixed() {
        let doc = render("> quoted text");
        assert!(doc.line_at(0).is_some_and(|l| l.content().starts_with("│ quoted")));
    }

    #[test]
    fn test_thematic_break() {
        let doc = render("above\n\n---\n\nbelow");
        let has_rule = doc
            .visible_lines(0, doc.line_count())
            .iter()
            .any(|l| l.line_type() == &LineType::HorizontalRule);
        assert!(has_rule);
    }

    #[test]
    fn test_table_with_header_separator() {
        let doc = render("| A | B |\n| --- | --- |\n| 1 | 2 |\n");
        let rows: Vec<&str> = doc
            .visible_lines(0, doc.line_count())
            .iter()
            .filter(|l| l.line_type() == &LineType::Table)
            .map(|l| l.content())
            .collect();
        assert_eq!(rows.len(), 5);
        assert!(rows[0].starts_with('┌'));
        assert!(rows[1].contains('A'));
        assert!(rows[2].starts_with('├'));
        assert!(rows[4].starts_with('└'));
    }

    #[test]
    fn test_wide_table_shrinks_to_width() {
        let doc = Document::render(
            "| very long header cell | another long one |\n| --- | --- |\n| a | b |\n",
            24,
        )
        .expect("render");
        for line in doc.visible_lines(0, doc.line_count()) {
            assert!(UnicodeWidthStr::width(line.content()) <= 26);
        }
    }

    #[test]
    fn test_empty_source_renders_empty() {
        let doc = render("");
        assert_eq!(doc.line_count(), 0);
    }
}
