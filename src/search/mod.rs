//! Find and replace over the source buffer.
//!
//! Matching is case-insensitive substring search, recomputed from the buffer
//! whenever the query or the text changes. Navigation wraps around the end
//! of the document.

/// One match as a half-open char range into the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub start: usize,
    pub end: usize,
}

fn fold(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

/// All non-overlapping case-insensitive matches, in document order.
pub fn find_matches(text: &str, query: &str) -> Vec<SearchMatch> {
    if query.is_empty() {
        return Vec::new();
    }
    let haystack: Vec<char> = text.chars().map(fold).collect();
    let needle: Vec<char> = query.chars().map(fold).collect();
    let mut matches = Vec::new();
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        if haystack[i..i + needle.len()] == needle[..] {
            matches.push(SearchMatch {
                start: i,
                end: i + needle.len(),
            });
            i += needle.len();
        } else {
            i += 1;
        }
    }
    matches
}

/// Index of the first match starting at or after `from`, wrapping to the
/// first match when none remain below.
pub fn next_match(matches: &[SearchMatch], from: usize) -> Option<usize> {
    if matches.is_empty() {
        return None;
    }
    let idx = matches.partition_point(|m| m.start < from);
    Some(if idx == matches.len() { 0 } else { idx })
}

/// The match preceding `from`, wrapping to the last match.
pub fn prev_match(matches: &[SearchMatch], from: usize) -> Option<usize> {
    if matches.is_empty() {
        return None;
    }
    let idx = matches.partition_point(|m| m.start < from);
    Some(if idx == 0 { matches.len() - 1 } else { idx - 1 })
}

/// Replace every match of `query`, returning the new text and the number of
/// replacements.
pub fn replace_all(text: &str, query: &str, replacement: &str) -> (String, usize) {
    let matches = find_matches(text, query);
    if matches.is_empty() {
        return (text.to_string(), 0);
    }
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for m in &matches {
        out.extend(&chars[pos..m.start]);
        out.push_str(replacement);
        pos = m.end;
    }
    out.extend(&chars[pos..]);
    (out, matches.len())
}
