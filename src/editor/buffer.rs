//! Rope-backed text buffer for the source pane.

use ropey::Rope;

/// Cursor position within the buffer.
///
/// `col_memory` remembers the column the user last moved to horizontally so
/// vertical movement through short lines snaps back out on longer ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
    pub col_memory: usize,
}

/// The editable document text plus cursor and selection state.
#[derive(Debug, Clone)]
pub struct EditBuffer {
    rope: Rope,
    pub cursor: Cursor,
    /// Char index of the selection anchor; the selection runs from the
    /// anchor to the cursor in either direction.
    selection_anchor: Option<usize>,
}

impl Default for EditBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::from_text("")
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::default(),
            selection_anchor: None,
        }
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// One line's text without its trailing newline.
    pub fn line(&self, line: usize) -> String {
        if line >= self.rope.len_lines() {
            return String::new();
        }
        let mut s = self.rope.line(line).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        s
    }

    fn line_len(&self, line: usize) -> usize {
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
        }
        len
    }

    /// The cursor as an absolute char index.
    pub fn cursor_char_idx(&self) -> usize {
        let line = self.cursor.line.min(self.rope.len_lines() - 1);
        let line_start = self.rope.line_to_char(line);
        (line_start + self.cursor.col).min(self.rope.len_chars())
    }

    /// Move the cursor to an absolute char index, clamped to the buffer.
    pub fn set_cursor_char_idx(&mut self, idx: usize) {
        let idx = idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        let col = idx - self.rope.line_to_char(line);
        self.cursor = Cursor {
            line,
            col,
            col_memory: col,
        };
    }

    /// Replace the whole buffer, placing the cursor at the start. Used by
    /// file load and undo/redo restoration.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.cursor = Cursor::default();
        self.selection_anchor = None;
    }

    // --- selection ---

    pub fn begin_selection(&mut self) {
        if self.selection_anchor.is_none() {
            self.selection_anchor = Some(self.cursor_char_idx());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection_anchor = None;
    }

    pub fn has_selection(&self) -> bool {
        self.selection_range().is_some()
    }

    /// The raw selection anchor, before any ordering against the cursor.
    pub const fn selection_anchor_idx(&self) -> Option<usize> {
        self.selection_anchor
    }

    /// The selected char range as `(start, end)`, or `None` when the
    /// selection is empty or absent.
    pub fn selection_range(&self) -> Option<(usize, usize)> {
        let anchor = self.selection_anchor?;
        let cursor = self.cursor_char_idx();
        if anchor == cursor {
            return None;
        }
        Some((anchor.min(cursor), anchor.max(cursor)))
    }

    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection_range()?;
        Some(self.rope.slice(start..end).to_string())
    }

    /// Select the given char range, leaving the cursor at its end.
    pub fn select_range(&mut self, start: usize, end: usize) {
        let len = self.rope.len_chars();
        self.set_cursor_char_idx(end.min(len));
        self.selection_anchor = Some(start.min(len));
    }

    // --- editing ---

    /// Replace a char range with new text and put the cursor after it.
    pub fn replace_range(&mut self, start: usize, end: usize, text: &str) {
        let len = self.rope.len_chars();
        let start = start.min(len);
        let end = end.clamp(start, len);
        self.rope.remove(start..end);
        self.rope.insert(start, text);
        self.selection_anchor = None;
        self.set_cursor_char_idx(start + text.chars().count());
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut tmp = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut tmp));
    }

    pub fn insert_str(&mut self, text: &str) {
        if let Some((start, end)) = self.selection_range() {
            self.replace_range(start, end, text);
            return;
        }
        let idx = self.cursor_char_idx();
        self.rope.insert(idx, text);
        self.set_cursor_char_idx(idx + text.chars().count());
    }

    pub fn insert_newline(&mut self) {
        self.insert_str("\n");
    }

    pub fn delete_backward(&mut self) {
        if let Some((start, end)) = self.selection_range() {
            self.replace_range(start, end, "");
            return;
        }
        let idx = self.cursor_char_idx();
        if idx == 0 {
            return;
        }
        self.rope.remove(idx - 1..idx);
        self.set_cursor_char_idx(idx - 1);
    }

    pub fn delete_forward(&mut self) {
        if let Some((start, end)) = self.selection_range() {
            self.replace_range(start, end, "");
            return;
        }
        let idx = self.cursor_char_idx();
        if idx >= self.rope.len_chars() {
            return;
        }
        self.rope.remove(idx..=idx);
    }

    /// Char range of the line under the cursor, excluding the trailing
    /// newline, plus the line's text.
    pub fn current_line_span(&self) -> (usize, usize, String) {
        let line = self.cursor.line.min(self.rope.len_lines() - 1);
        let start = self.rope.line_to_char(line);
        let end = start + self.line_len(line);
        (start, end, self.line(line))
    }

    // --- movement ---

    pub fn move_left(&mut self) {
        self.clear_selection();
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.col = self.line_len(self.cursor.line);
        }
        self.cursor.col_memory = self.cursor.col;
    }

    pub fn move_right(&mut self) {
        self.clear_selection();
        if self.cursor.col < self.line_len(self.cursor.line) {
            self.cursor.col += 1;
        } else if self.cursor.line + 1 < self.rope.len_lines() {
            self.cursor.line += 1;
            self.cursor.col = 0;
        }
        self.cursor.col_memory = self.cursor.col;
    }

    pub fn move_up(&mut self) {
        self.clear_selection();
        if self.cursor.line == 0 {
            return;
        }
        self.cursor.line -= 1;
        self.cursor.col = self.cursor.col_memory.min(self.line_len(self.cursor.line));
    }

    pub fn move_down(&mut self) {
        self.clear_selection();
        if self.cursor.line + 1 >= self.rope.len_lines() {
            return;
        }
        self.cursor.line += 1;
        self.cursor.col = self.cursor.col_memory.min(self.line_len(self.cursor.line));
    }

    pub fn move_line_start(&mut self) {
        self.clear_selection();
        self.cursor.col = 0;
        self.cursor.col_memory = 0;
    }

    pub fn move_line_end(&mut self) {
        self.clear_selection();
        self.cursor.col = self.line_len(self.cursor.line);
        self.cursor.col_memory = self.cursor.col;
    }

    pub fn move_doc_start(&mut self) {
        self.clear_selection();
        self.cursor = Cursor::default();
    }

    pub fn move_doc_end(&mut self) {
        self.clear_selection();
        self.set_cursor_char_idx(self.rope.len_chars());
    }

    // --- counts ---

    pub fn word_count(&self) -> usize {
        self.rope
            .chunks()
            .collect::<String>()
            .split_whitespace()
            .count()
    }

    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- construction and access ---

    #[test]
    fn test_from_text_round_trips() {
        let buffer = EditBuffer::from_text("hello\nworld");
        assert_eq!(buffer.text(), "hello\nworld");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line(0), "hello");
        assert_eq!(buffer.line(1), "world");
    }

    #[test]
    fn test_line_out_of_range_is_empty() {
        let buffer = EditBuffer::from_text("one");
        assert_eq!(buffer.line(5), "");
    }

    // --- editing ---

    #[test]
    fn test_insert_char_advances_cursor() {
        let mut buffer = EditBuffer::new();
        buffer.insert_char('h');
        buffer.insert_char('i');
        assert_eq!(buffer.text(), "hi");
        assert_eq!(buffer.cursor.col, 2);
    }

    #[test]
    fn test_insert_str_mid_line() {
        let mut buffer = EditBuffer::from_text("ac");
        buffer.set_cursor_char_idx(1);
        buffer.insert_str("b");
        assert_eq!(buffer.text(), "abc");
        assert_eq!(buffer.cursor_char_idx(), 2);
    }

    #[test]
    fn test_insert_newline_splits_line() {
        let mut buffer = EditBuffer::from_text("hello");
        buffer.set_cursor_char_idx(2);
        buffer.insert_newline();
        assert_eq!(buffer.text(), "he\nllo");
        assert_eq!(buffer.cursor.line, 1);
        assert_eq!(buffer.cursor.col, 0);
    }

    #[test]
    fn test_delete_backward_joins_lines() {
        let mut buffer = EditBuffer::from_text("ab\ncd");
        buffer.set_cursor_char_idx(3);
        buffer.delete_backward();
        assert_eq!(buffer.text(), "abcd");
    }

    #[test]
    fn test_delete_backward_at_start_is_noop() {
        let mut buffer = EditBuffer::from_text("ab");
        buffer.delete_backward();
        assert_eq!(buffer.text(), "ab");
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut buffer = EditBuffer::from_text("ab");
        buffer.set_cursor_char_idx(2);
        buffer.delete_forward();
        assert_eq!(buffer.text(), "ab");
    }

    #[test]
    fn test_replace_range_moves_cursor_past_insert() {
        let mut buffer = EditBuffer::from_text("one two three");
        buffer.replace_range(4, 7, "2");
        assert_eq!(buffer.text(), "one 2 three");
        assert_eq!(buffer.cursor_char_idx(), 5);
    }

    // --- selection ---

    #[test]
    fn test_selection_range_orders_endpoints() {
        let mut buffer = EditBuffer::from_text("hello");
        buffer.set_cursor_char_idx(4);
        buffer.begin_selection();
        buffer.set_cursor_char_idx(1);
        assert_eq!(buffer.selection_range(), Some((1, 4)));
        assert_eq!(buffer.selected_text().as_deref(), Some("ell"));
    }

    #[test]
    fn test_empty_selection_is_none() {
        let mut buffer = EditBuffer::from_text("hello");
        buffer.begin_selection();
        assert_eq!(buffer.selection_range(), None);
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut buffer = EditBuffer::from_text("hello world");
        buffer.select_range(0, 5);
        buffer.insert_str("goodbye");
        assert_eq!(buffer.text(), "goodbye world");
        assert!(!buffer.has_selection());
    }

    #[test]
    fn test_delete_removes_selection() {
        let mut buffer = EditBuffer::from_text("hello world");
        buffer.select_range(5, 11);
        buffer.delete_backward();
        assert_eq!(buffer.text(), "hello");
    }

    // --- movement ---

    #[test]
    fn test_move_left_wraps_to_previous_line_end() {
        let mut buffer = EditBuffer::from_text("ab\ncd");
        buffer.set_cursor_char_idx(3);
        buffer.move_left();
        assert_eq!(buffer.cursor.line, 0);
        assert_eq!(buffer.cursor.col, 2);
    }

    #[test]
    fn test_move_right_wraps_to_next_line_start() {
        let mut buffer = EditBuffer::from_text("ab\ncd");
        buffer.set_cursor_char_idx(2);
        buffer.move_right();
        assert_eq!(buffer.cursor.line, 1);
        assert_eq!(buffer.cursor.col, 0);
    }

    #[test]
    fn test_col_memory_restores_column_through_short_line() {
        let mut buffer = EditBuffer::from_text("long line\nab\nlonger line");
        buffer.set_cursor_char_idx(7);
        assert_eq!(buffer.cursor.col, 7);
        buffer.move_down();
        assert_eq!(buffer.cursor.col, 2);
        buffer.move_down();
        assert_eq!(buffer.cursor.col, 7);
    }

    #[test]
    fn test_current_line_span_excludes_newline() {
        let mut buffer = EditBuffer::from_text("one\ntwo\nthree");
        buffer.set_cursor_char_idx(5);
        let (start, end, line) = buffer.current_line_span();
        assert_eq!((start, end), (4, 7));
        assert_eq!(line, "two");
    }

    // --- counts ---

    #[test]
    fn test_word_count_splits_on_whitespace() {
        let buffer = EditBuffer::from_text("# Title\n\nsome  body text\n");
        assert_eq!(buffer.word_count(), 5);
        assert_eq!(buffer.char_count(), 25);
    }

    #[test]
    fn test_word_count_empty_buffer() {
        assert_eq!(EditBuffer::new().word_count(), 0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn cursor_char_idx_stays_in_bounds(
                text in "[a-z\\n]{0,40}",
                idx in 0usize..100,
            ) {
                let mut buffer = EditBuffer::from_text(&text);
                buffer.set_cursor_char_idx(idx);
                prop_assert!(buffer.cursor_char_idx() <= buffer.len_chars());
            }

            #[test]
            fn insert_then_delete_backward_round_trips(
                text in "[a-z ]{0,20}",
                idx in 0usize..30,
                ch in proptest::char::range('a', 'z'),
            ) {
                let mut buffer = EditBuffer::from_text(&text);
                buffer.set_cursor_char_idx(idx);
                buffer.insert_char(ch);
                buffer.delete_backward();
                prop_assert_eq!(buffer.text(), text);
            }
        }
    }
}
