//! Character-safe text helpers shared by the pipeline stages.
//!
//! Offsets are byte offsets into UTF-8 strings; windows are measured in chars
//! and always land on char boundaries.

/// Keep at most `max` chars of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Move `idx` back `count` chars, stopping at 0.
pub fn back_chars(s: &str, idx: usize, count: usize) -> usize {
    let mut idx = floor_boundary(s, idx);
    for _ in 0..count {
        match s[..idx].chars().next_back() {
            Some(c) => idx -= c.len_utf8(),
            None => break,
        }
    }
    idx
}

/// Move `idx` forward `count` chars, stopping at the end.
pub fn forward_chars(s: &str, idx: usize, count: usize) -> usize {
    let mut idx = floor_boundary(s, idx);
    for _ in 0..count {
        match s[idx..].chars().next() {
            Some(c) => idx += c.len_utf8(),
            None => break,
        }
    }
    idx
}

fn floor_boundary(s: &str, idx: usize) -> usize {
    let mut idx = idx.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// The match `start..end` widened by `before` chars on the left and `after`
/// chars on the right, trimmed.
pub fn context_window(s: &str, start: usize, end: usize, before: usize, after: usize) -> &str {
    let from = back_chars(s, start, before);
    let to = forward_chars(s, end, after);
    s[from..to].trim()
}

/// Byte range of the sentence containing `pos`.
///
/// Sentences end at `.`, `!` or `?` followed by whitespace (or end of text),
/// and at line breaks.
pub fn sentence_bounds(s: &str, pos: usize) -> (usize, usize) {
    let pos = floor_boundary(s, pos);
    let bytes = s.as_bytes();

    let mut start = 0;
    for (i, c) in s[..pos].char_indices().rev() {
        if c == '\n' {
            start = i + 1;
            break;
        }
        if matches!(c, '.' | '!' | '?') && bytes.get(i + 1).map_or(true, |b| b.is_ascii_whitespace()) {
            start = i + 1;
            break;
        }
    }

    let mut end = s.len();
    for (i, c) in s[pos..].char_indices() {
        let abs = pos + i;
        if c == '\n' {
            end = abs;
            break;
        }
        if matches!(c, '.' | '!' | '?') && bytes.get(abs + 1).map_or(true, |b| b.is_ascii_whitespace()) {
            end = abs + 1;
            break;
        }
    }

    // Trim surrounding whitespace
    while start < end && bytes[start].is_ascii_whitespace() {
        start += 1;
    }
    while end > start && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence_at(s: &str, pos: usize) -> &str {
        let (start, end) = sentence_bounds(s, pos);
        &s[start..end]
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_context_window_clamps() {
        let text = "The literature review will take 6 months.";
        let start = text.find("6 months").unwrap();
        let window = context_window(text, start, start + 8, 5, 100);
        assert_eq!(window, "take 6 months.");
    }

    #[test]
    fn test_context_window_char_boundaries() {
        let text = "ééé data ééé";
        let start = text.find("data").unwrap();
        let window = context_window(text, start, start + 4, 2, 2);
        assert_eq!(window, "é data é");
    }

    #[test]
    fn test_sentence_at() {
        let text = "First sentence. Ethics approval must be obtained before any data collection. Last one";
        let pos = text.find("approval").unwrap();
        assert_eq!(
            sentence_at(text, pos),
            "Ethics approval must be obtained before any data collection."
        );
        let pos = text.find("Last").unwrap();
        assert_eq!(sentence_at(text, pos), "Last one");
    }

    #[test]
    fn test_sentence_stops_at_newline() {
        let text = "Heading\nBody text here";
        let pos = text.find("Body").unwrap();
        assert_eq!(sentence_at(text, pos), "Body text here");
        assert_eq!(sentence_at(text, 0), "Heading");
    }

    #[test]
    fn test_decimal_point_is_not_a_boundary() {
        let text = "Budget 2.5 years for writing.";
        let pos = text.find("years").unwrap();
        assert_eq!(sentence_at(text, pos), text);
    }
}
