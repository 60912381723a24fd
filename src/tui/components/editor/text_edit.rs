//! Pure text navigation helpers for the Editor.
//!
//! Positions are byte offsets into the surface text; columns are display
//! columns (unicode width, tabs expanded to four cells to match rendering).

use unicode_width::UnicodeWidthChar;

/// Display width of a tab once expanded.
pub(super) const TAB_WIDTH: usize = 4;
/// Inserted by the Indent key.
pub(super) const INDENT: &str = "    ";

/// Find the byte offset of the previous character boundary before `pos` in `text`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Skip back over non-word characters, then over one word.
pub(super) fn prev_word_boundary(text: &str, pos: usize) -> usize {
    let mut chars = text[..pos].char_indices().rev().peekable();

    while chars.peek().is_some_and(|&(_, c)| !is_word_char(c)) {
        chars.next();
    }

    let mut boundary = 0;
    while let Some(&(i, c)) = chars.peek() {
        if !is_word_char(c) {
            boundary = i + c.len_utf8();
            break;
        }
        boundary = i;
        chars.next();
    }
    boundary
}

/// Skip forward over non-word characters, then over one word.
pub(super) fn next_word_boundary(text: &str, pos: usize) -> usize {
    let mut chars = text[pos..].char_indices().peekable();

    while chars.peek().is_some_and(|&(_, c)| !is_word_char(c)) {
        chars.next();
    }
    while chars.peek().is_some_and(|&(_, c)| is_word_char(c)) {
        chars.next();
    }

    match chars.peek() {
        Some(&(i, _)) => pos + i,
        None => text.len(),
    }
}

/// Byte offset where the line containing `pos` starts.
pub(super) fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Byte offset of the `\n` ending the line containing `pos` (or the end of text).
pub(super) fn line_end(text: &str, pos: usize) -> usize {
    text[pos..].find('\n').map(|i| pos + i).unwrap_or(text.len())
}

fn char_width(c: char) -> usize {
    if c == '\t' {
        TAB_WIDTH
    } else {
        c.width().unwrap_or(0)
    }
}

/// Display width of `s` as the editor renders it.
pub(super) fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// (row, display column) of `pos`.
pub(super) fn row_col(text: &str, pos: usize) -> (usize, usize) {
    let start = line_start(text, pos);
    let row = text[..start].matches('\n').count();
    (row, display_width(&text[start..pos]))
}

/// Byte offset where `row` starts, or `None` past the last line.
pub(super) fn row_start(text: &str, row: usize) -> Option<usize> {
    if row == 0 {
        return Some(0);
    }
    text.match_indices('\n').nth(row - 1).map(|(i, _)| i + 1)
}

/// Byte offset within `line` of the last character starting at or before `col`.
pub(super) fn byte_at_col(line: &str, col: usize) -> usize {
    let mut width = 0;
    for (i, c) in line.char_indices() {
        let w = char_width(c);
        if width + w > col {
            return i;
        }
        width += w;
    }
    line.len()
}

/// Leading spaces and tabs of the line containing `pos`.
pub(super) fn leading_indent(text: &str, pos: usize) -> &str {
    let start = line_start(text, pos);
    let line = &text[start..line_end(text, start)];
    let indent_len = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..indent_len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prev_char_boundary_multibyte() {
        // "café": 'é' starts at byte 3, len 2
        let s = "café";
        assert_eq!(prev_char_boundary(s, 5), 3);
        assert_eq!(prev_char_boundary(s, 3), 2);
    }

    #[test]
    fn next_char_boundary_emoji() {
        let s = "a🔥b";
        assert_eq!(next_char_boundary(s, 0), 1);
        assert_eq!(next_char_boundary(s, 1), 5);
        assert_eq!(next_char_boundary(s, 5), 6);
    }

    #[test]
    fn word_boundaries() {
        assert_eq!(prev_word_boundary("let foo_bar = 1", 11), 4);
        assert_eq!(prev_word_boundary("foo.bar", 7), 4);
        assert_eq!(next_word_boundary("let foo_bar = 1", 3), 11);
        assert_eq!(next_word_boundary("hello", 5), 5);
    }

    #[test]
    fn line_bounds() {
        let text = "ab\ncd\n";
        assert_eq!(line_start(text, 4), 3);
        assert_eq!(line_end(text, 4), 5);
        assert_eq!(line_start(text, 6), 6);
        assert_eq!(line_end(text, 6), 6);
    }

    #[test]
    fn row_col_counts_display_width() {
        let text = "x\n\tcafé";
        assert_eq!(row_col(text, text.len()), (1, TAB_WIDTH + 4));
        assert_eq!(row_col(text, 0), (0, 0));
    }

    #[test]
    fn row_col_wide_chars() {
        let text = "日本";
        assert_eq!(row_col(text, text.len()), (0, 4));
    }

    #[test]
    fn row_start_finds_lines() {
        let text = "a\nbb\nccc";
        assert_eq!(row_start(text, 0), Some(0));
        assert_eq!(row_start(text, 1), Some(2));
        assert_eq!(row_start(text, 2), Some(5));
        assert_eq!(row_start(text, 3), None);
    }

    #[test]
    fn byte_at_col_clamps_to_line() {
        assert_eq!(byte_at_col("abc", 1), 1);
        assert_eq!(byte_at_col("abc", 10), 3);
        // Column 1 falls inside the first wide char
        assert_eq!(byte_at_col("日本", 1), 0);
        assert_eq!(byte_at_col("日本", 2), 3);
    }

    #[test]
    fn leading_indent_of_current_line() {
        let text = "def f():\n    return 1";
        assert_eq!(leading_indent(text, text.len()), "    ");
        assert_eq!(leading_indent(text, 3), "");
    }
}
