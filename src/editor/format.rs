//! Programmatic formatting operations over the edit buffer.
//!
//! Callers record a history snapshot before invoking any of these and commit
//! the result afterwards; the operations themselves only mutate the buffer.

use super::buffer::EditBuffer;

pub const HORIZONTAL_RULE: &str = "\n\n---\n\n";

/// Blank line before the table so the GFM table starts a new block.
pub const TABLE_TEMPLATE: &str =
    "\n\n| Column 1 | Column 2 | Column 3 |\n| --- | --- | --- |\n|  |  |  |\n|  |  |  |\n";

/// Wrap the selection in marker pairs, e.g. `**` for bold or `` ` `` for
/// inline code. Without a selection the markers are inserted empty with the
/// cursor between them. The wrapped text stays selected.
pub fn wrap_selection(buffer: &mut EditBuffer, left: &str, right: &str) {
    let (start, end, selected) = match buffer.selection_range() {
        Some((start, end)) => {
            let text = buffer.selected_text().unwrap_or_default();
            (start, end, text)
        }
        None => {
            let idx = buffer.cursor_char_idx();
            (idx, idx, String::new())
        }
    };
    let replacement = format!("{left}{selected}{right}");
    buffer.replace_range(start, end, &replacement);
    let inner_start = start + left.chars().count();
    let inner_end = inner_start + selected.chars().count();
    if selected.is_empty() {
        buffer.set_cursor_char_idx(inner_start);
    } else {
        buffer.select_range(inner_start, inner_end);
    }
}

/// Insert a link template, selecting the placeholder text so the user can
/// type over it.
pub fn insert_link(buffer: &mut EditBuffer) {
    insert_template(buffer, "[selected text](url)", 1, 14);
}

/// Insert an image template with the alt placeholder selected.
pub fn insert_image(buffer: &mut EditBuffer) {
    insert_template(buffer, "![alt](url)", 2, 5);
}

fn insert_template(buffer: &mut EditBuffer, template: &str, select_from: usize, select_to: usize) {
    let (start, end) = buffer
        .selection_range()
        .unwrap_or_else(|| {
            let idx = buffer.cursor_char_idx();
            (idx, idx)
        });
    buffer.replace_range(start, end, template);
    buffer.select_range(start + select_from, start + select_to);
}

/// Prepend a block prefix (`# `, `> `, `- `, `1. `) to the current line.
pub fn prefix_line(buffer: &mut EditBuffer, prefix: &str) {
    let original = buffer.cursor_char_idx();
    let (line_start, _, _) = buffer.current_line_span();
    buffer.replace_range(line_start, line_start, prefix);
    buffer.set_cursor_char_idx(original + prefix.chars().count());
}

/// Insert a horizontal rule at the cursor, replacing any selection.
pub fn insert_horizontal_rule(buffer: &mut EditBuffer) {
    buffer.insert_str(HORIZONTAL_RULE);
}

/// Insert an empty 3x3 table at the cursor, replacing any selection.
pub fn insert_table(buffer: &mut EditBuffer) {
    buffer.insert_str(TABLE_TEMPLATE);
}

/// Duplicate the line under the cursor, placing the cursor at the start of
/// the copy.
pub fn duplicate_line(buffer: &mut EditBuffer) {
    let (line_start, line_end, line) = buffer.current_line_span();
    if line.is_empty() && line_start == line_end && buffer.len_chars() == 0 {
        return;
    }
    let insert = format!("\n{line}");
    buffer.replace_range(line_end, line_end, &insert);
    buffer.set_cursor_char_idx(line_end + 1);
}

/// Delete the line under the cursor including its trailing newline.
pub fn delete_line(buffer: &mut EditBuffer) {
    let (line_start, line_end, _) = buffer.current_line_span();
    let after = if line_end < buffer.len_chars() {
        line_end + 1
    } else {
        line_end
    };
    buffer.replace_range(line_start, after, "");
    buffer.set_cursor_char_idx(line_start);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_selection_bold() {
        let mut buffer = EditBuffer::from_text("make this bold");
        buffer.select_range(5, 9);
        wrap_selection(&mut buffer, "**", "**");
        assert_eq!(buffer.text(), "make **this** bold");
        assert_eq!(buffer.selected_text().as_deref(), Some("this"));
    }

    #[test]
    fn test_wrap_without_selection_places_cursor_inside() {
        let mut buffer = EditBuffer::from_text("ab");
        buffer.set_cursor_char_idx(1);
        wrap_selection(&mut buffer, "*", "*");
        assert_eq!(buffer.text(), "a**b");
        assert_eq!(buffer.cursor_char_idx(), 2);
    }

    #[test]
    fn test_wrap_selection_inline_code() {
        let mut buffer = EditBuffer::from_text("run cargo now");
        buffer.select_range(4, 9);
        wrap_selection(&mut buffer, "`", "`");
        assert_eq!(buffer.text(), "run `cargo` now");
    }

    #[test]
    fn test_insert_link_selects_placeholder() {
        let mut buffer = EditBuffer::from_text("see ");
        buffer.set_cursor_char_idx(4);
        insert_link(&mut buffer);
        assert_eq!(buffer.text(), "see [selected text](url)");
        assert_eq!(buffer.selected_text().as_deref(), Some("selected text"));
    }

    #[test]
    fn test_insert_image_selects_alt() {
        let mut buffer = EditBuffer::new();
        insert_image(&mut buffer);
        assert_eq!(buffer.text(), "![alt](url)");
        assert_eq!(buffer.selected_text().as_deref(), Some("alt"));
    }

    #[test]
    fn test_prefix_line_heading() {
        let mut buffer = EditBuffer::from_text("first\ntitle line\nlast");
        buffer.set_cursor_char_idx(9);
        prefix_line(&mut buffer, "## ");
        assert_eq!(buffer.text(), "first\n## title line\nlast");
        // Cursor keeps its position relative to the line content.
        assert_eq!(buffer.cursor_char_idx(), 12);
    }

    #[test]
    fn test_prefix_line_quote_on_first_line() {
        let mut buffer = EditBuffer::from_text("quoted");
        prefix_line(&mut buffer, "> ");
        assert_eq!(buffer.text(), "> quoted");
    }

    #[test]
    fn test_insert_horizontal_rule_replaces_selection() {
        let mut buffer = EditBuffer::from_text("before junk after");
        buffer.select_range(7, 11);
        insert_horizontal_rule(&mut buffer);
        assert_eq!(buffer.text(), "before \n\n---\n\n after");
    }

    #[test]
    fn test_insert_table_template() {
        let mut buffer = EditBuffer::from_text("data:");
        buffer.set_cursor_char_idx(5);
        insert_table(&mut buffer);
        assert!(buffer.text().starts_with("data:\n\n| Column 1 |"));
        assert!(buffer.text().contains("| --- | --- | --- |"));
    }

    #[test]
    fn test_duplicate_line_copies_below() {
        let mut buffer = EditBuffer::from_text("one\ntwo\nthree");
        buffer.set_cursor_char_idx(5);
        duplicate_line(&mut buffer);
        assert_eq!(buffer.text(), "one\ntwo\ntwo\nthree");
        assert_eq!(buffer.cursor.line, 2);
        assert_eq!(buffer.cursor.col, 0);
    }

    #[test]
    fn test_duplicate_last_line_without_newline() {
        let mut buffer = EditBuffer::from_text("only");
        duplicate_line(&mut buffer);
        assert_eq!(buffer.text(), "only\nonly");
    }

    #[test]
    fn test_delete_line_removes_trailing_newline() {
        let mut buffer = EditBuffer::from_text("one\ntwo\nthree");
        buffer.set_cursor_char_idx(5);
        delete_line(&mut buffer);
        assert_eq!(buffer.text(), "one\nthree");
        assert_eq!(buffer.cursor.line, 1);
    }

    #[test]
    fn test_delete_last_line() {
        let mut buffer = EditBuffer::from_text("one\ntwo");
        buffer.set_cursor_char_idx(6);
        delete_line(&mut buffer);
        assert_eq!(buffer.text(), "one\n");
    }

    #[test]
    fn test_delete_only_line_leaves_empty_buffer() {
        let mut buffer = EditBuffer::from_text("solo");
        delete_line(&mut buffer);
        assert_eq!(buffer.text(), "");
    }
}
