//! Heading extraction for the outline sidebar.
//!
//! Entries are derived from the buffer on every change, never stored with
//! the document. Their order matches document position; the index into the
//! list is the outline index used by jump navigation and highlighting.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("valid heading pattern"));

/// One ATX heading found in the source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Heading depth, 1 through 6.
    pub level: u8,
    pub text: String,
    /// Zero-based source line of the heading.
    pub line: usize,
}

/// Scan the buffer for ATX headings. Headings inside fenced code blocks are
/// ignored.
pub fn extract(source: &str) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    let mut in_fence = false;
    for (line_idx, line) in source.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(caps) = HEADING_RE.captures(line) {
            entries.push(OutlineEntry {
                level: caps[1].len() as u8,
                text: caps[2].trim_end().to_string(),
                line: line_idx,
            });
        }
    }
    entries
}

/// Source-line anchors for [`crate::sync::current_outline_index`].
pub fn line_anchors(entries: &[OutlineEntry]) -> Vec<f64> {
    entries.iter().map(|e| e.line as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_levels_and_lines() {
        let src = "# Top\n\nbody\n\n## Section\n\n### Sub\n";
        let entries = extract(src);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], OutlineEntry { level: 1, text: "Top".into(), line: 0 });
        assert_eq!(entries[1], OutlineEntry { level: 2, text: "Section".into(), line: 4 });
        assert_eq!(entries[2], OutlineEntry { level: 3, text: "Sub".into(), line: 6 });
    }

    #[test]
    fn test_seven_hashes_is_not_a_heading() {
        assert!(extract("####### too deep").is_empty());
    }

    #[test]
    fn test_hash_without_space_is_not_a_heading() {
        assert!(extract("#hashtag").is_empty());
    }

    #[test]
    fn test_headings_inside_code_fence_ignored() {
        let src = "# Real\n```\n# comment in code\n```\n## Also real\n";
        let entries = extract(src);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].text, "Also real");
    }

    #[test]
    fn test_empty_source() {
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_line_anchors_match_entry_lines() {
        let entries = extract("# A\n# B\nx\n# C\n");
        assert_eq!(line_anchors(&entries), vec![0.0, 1.0, 3.0]);
    }

    #[test]
    fn test_anchor_lookup_matches_scroll_position() {
        let entries = vec![
            OutlineEntry { level: 1, text: "a".into(), line: 0 },
            OutlineEntry { level: 2, text: "b".into(), line: 10 },
            OutlineEntry { level: 2, text: "c".into(), line: 25 },
        ];
        let idx = crate::sync::current_outline_index(&line_anchors(&entries), 12.0);
        assert_eq!(idx, Some(1));
    }
}
