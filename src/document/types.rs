//! Core preview document types.

/// A parsed markdown document rendered to styled preview lines.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Original source text
    source: String,
    /// Rendered lines for display
    lines: Vec<RenderedLine>,
    /// Heading references for the outline and scroll anchors
    headings: Vec<HeadingRef>,
}

impl Document {
    /// Create an empty document.
    pub const fn empty() -> Self {
        Self {
            source: String::new(),
            lines: Vec::new(),
            headings: Vec::new(),
        }
    }

    pub(crate) fn from_rendered(
        source: String,
        lines: Vec<RenderedLine>,
        headings: Vec<HeadingRef>,
    ) -> Self {
        Self {
            source,
            lines,
            headings,
        }
    }

    /// A single-line stand-in shown when rendering fails, so the preview
    /// pane never goes blank or propagates the error.
    pub fn parse_error_placeholder(source: &str) -> Self {
        Self {
            source: source.to_string(),
            lines: vec![RenderedLine::new(
                "[preview unavailable: parse error]".to_string(),
                LineType::Paragraph,
            )],
            headings: Vec::new(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn headings(&self) -> &[HeadingRef] {
        &self.headings
    }

    /// Rendered-line positions of the headings, used as preview-pane scroll
    /// anchors.
    pub fn heading_anchors(&self) -> Vec<f64> {
        self.headings.iter().map(|h| h.line as f64).collect()
    }

    /// Lines from `offset` to `offset + count` for rendering.
    pub fn visible_lines(&self, offset: usize, count: usize) -> Vec<&RenderedLine> {
        self.lines.iter().skip(offset).take(count).collect()
    }

    pub fn line_at(&self, index: usize) -> Option<&RenderedLine> {
        self.lines.get(index)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// A single rendered line with styling information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    content: String,
    line_type: LineType,
    spans: Vec<InlineSpan>,
}

impl RenderedLine {
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self {
            content,
            line_type,
            spans: Vec::new(),
        }
    }

    pub const fn with_spans(content: String, line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        Self {
            content,
            line_type,
            spans,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn line_type(&self) -> &LineType {
        &self.line_type
    }

    /// Inline spans, if this line carries styled segments.
    pub fn spans(&self) -> Option<&[InlineSpan]> {
        if self.spans.is_empty() {
            None
        } else {
            Some(&self.spans)
        }
    }
}

/// Inline style flags for a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
}

/// A styled inline span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// Type of a rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Normal paragraph text
    Paragraph,
    /// Heading with level (1-6)
    Heading(u8),
    /// Code block line
    CodeBlock,
    /// Block quote line
    BlockQuote,
    /// List item with nesting level
    ListItem(usize),
    /// Table row
    Table,
    /// Horizontal rule
    HorizontalRule,
    /// Empty line
    Empty,
}

/// Reference to a heading in the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRef {
    /// Heading level (1-6)
    pub level: u8,
    /// Heading text, plain
    pub text: String,
    /// Line number in the rendered document
    pub line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let doc = Document::empty();
        assert_eq!(doc.line_count(), 0);
        assert!(doc.headings().is_empty());
    }

    #[test]
    fn test_rendered_line_accessors() {
        let line = RenderedLine::new("# Heading".to_string(), LineType::Heading(1));
        assert_eq!(line.content(), "# Heading");
        assert_eq!(line.line_type(), &LineType::Heading(1));
        assert_eq!(line.spans(), None);
    }

    #[test]
    fn test_visible_lines_window() {
        let lines = (1..=5)
            .map(|i| RenderedLine::new(format!("Line {i}"), LineType::Paragraph))
            .collect();
        let doc = Document::from_rendered("source".to_string(), lines, Vec::new());

        let visible = doc.visible_lines(1, 2);
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].content(), "Line 2");
        assert_eq!(visible[1].content(), "Line 3");

        assert_eq!(doc.visible_lines(0, 10).len(), 5);
    }

    #[test]
    fn test_heading_anchors_follow_rendered_lines() {
        let doc = Document::from_rendered(
            String::new(),
            Vec::new(),
            vec![
                HeadingRef { level: 1, text: "a".into(), line: 0 },
                HeadingRef { level: 2, text: "b".into(), line: 7 },
            ],
        );
        assert_eq!(doc.heading_anchors(), vec![0.0, 7.0]);
    }

    #[test]
    fn test_parse_error_placeholder_keeps_source() {
        let doc = Document::parse_error_placeholder("# broken");
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.source(), "# broken");
        assert!(doc.line_at(0).is_some_and(|l| l.content().contains("parse error")));
    }
}
