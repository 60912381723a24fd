//! Cursor position tracking and viewport scrolling for the Editor.
//!
//! `CursorState` owns the cursor byte offset and the viewport origin. All
//! methods accept `text: &str` explicitly: the text is owned by the core
//! `Surface`, and may be replaced behind the cursor's back by an open.

use super::text_edit::{byte_at_col, line_end, row_col, row_start};
use ratatui::layout::Rect;

/// Cursor and viewport state, separated from the text.
#[derive(Debug, Default)]
pub(super) struct CursorState {
    /// Cursor position as byte offset in text (0..=text.len())
    pub pos: usize,
    /// Display column to aim for when moving vertically through short lines
    pub preferred_col: Option<usize>,
    /// First visible row
    pub top: usize,
    /// First visible display column
    pub left: usize,
}

impl CursorState {
    /// Forget the viewport origin so the next render scrolls it from
    /// scratch. The cursor offset is kept.
    pub fn reset_viewport(&mut self) {
        self.top = 0;
        self.left = 0;
    }

    /// Keep `pos` inside `text` and on a char boundary.
    pub fn clamp(&mut self, text: &str) {
        self.pos = self.pos.min(text.len());
        while !text.is_char_boundary(self.pos) {
            self.pos -= 1;
        }
    }

    /// Horizontal moves forget the column remembered for vertical ones.
    pub fn set(&mut self, pos: usize) {
        self.pos = pos;
        self.preferred_col = None;
    }

    /// Move up (`-1`) or down (`1`) one line, keeping the display column.
    ///
    /// Returns `true` if the cursor moved, `false` if already at the boundary.
    pub fn move_vertically(&mut self, text: &str, direction: i16) -> bool {
        let (row, col) = row_col(text, self.pos);
        let target_row = if direction < 0 {
            match row.checked_sub(1) {
                Some(r) => r,
                None => return false,
            }
        } else {
            row + 1
        };
        let Some(start) = row_start(text, target_row) else {
            return false;
        };

        let goal = *self.preferred_col.get_or_insert(col);
        let line = &text[start..line_end(text, start)];
        self.pos = start + byte_at_col(line, goal);
        true
    }

    /// Adjust the viewport so the cursor is visible in a `width` x `height` area.
    pub fn scroll_into_view(&mut self, text: &str, width: u16, height: u16) {
        let (row, col) = row_col(text, self.pos);
        let (width, height) = (usize::from(width), usize::from(height));

        if height > 0 {
            if row < self.top {
                self.top = row;
            } else if row >= self.top + height {
                self.top = row + 1 - height;
            }
        }

        if width > 0 {
            if col < self.left {
                self.left = col;
            } else if col >= self.left + width {
                self.left = col + 1 - width;
            }
        }
    }

    /// Screen position of the cursor inside `inner` (the area within borders).
    pub fn screen_pos(&self, text: &str, inner: Rect) -> (u16, u16) {
        let (row, col) = row_col(text, self.pos);
        let x = col.saturating_sub(self.left);
        let y = row.saturating_sub(self.top);
        (
            inner.x + clamp_u16(x, inner.width.saturating_sub(1)),
            inner.y + clamp_u16(y, inner.height.saturating_sub(1)),
        )
    }

    /// Number of rows in `text` (a trailing newline starts a new, empty row).
    pub fn row_count(text: &str) -> usize {
        text.matches('\n').count() + 1
    }
}

fn clamp_u16(value: usize, max: u16) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_after_text_shrinks() {
        let mut cursor = CursorState::default();
        cursor.pos = 10;
        cursor.clamp("abc");
        assert_eq!(cursor.pos, 3);

        // Inside a multibyte char
        cursor.pos = 4;
        cursor.clamp("café");
        assert_eq!(cursor.pos, 3);
    }

    #[test]
    fn vertical_move_keeps_preferred_column() {
        let text = "abcdef\nab\nabcdef";
        let mut cursor = CursorState::default();
        cursor.set(5);

        assert!(cursor.move_vertically(text, 1));
        assert_eq!(cursor.pos, 9); // end of "ab"
        assert!(cursor.move_vertically(text, 1));
        assert_eq!(cursor.pos, 10 + 5); // column 5 restored
        assert!(!cursor.move_vertically(text, 1));
    }

    #[test]
    fn vertical_move_up_at_top_is_noop() {
        let mut cursor = CursorState::default();
        assert!(!cursor.move_vertically("abc\ndef", -1));
        assert_eq!(cursor.pos, 0);
    }

    #[test]
    fn scroll_follows_cursor() {
        let text = "0\n1\n2\n3\n4\n5\n6\n7\n8\n9";
        let mut cursor = CursorState::default();
        cursor.set(text.len());
        cursor.scroll_into_view(text, 10, 3);
        assert_eq!(cursor.top, 7);

        cursor.set(0);
        cursor.scroll_into_view(text, 10, 3);
        assert_eq!(cursor.top, 0);
    }

    #[test]
    fn horizontal_scroll_for_long_lines() {
        let text = "x".repeat(30);
        let mut cursor = CursorState::default();
        cursor.set(25);
        cursor.scroll_into_view(&text, 10, 1);
        assert_eq!(cursor.left, 16);
        let (x, _) = cursor.screen_pos(&text, Rect::new(1, 1, 10, 1));
        assert_eq!(x, 1 + 9);
    }

    #[test]
    fn row_metrics() {
        assert_eq!(CursorState::row_count(""), 1);
        assert_eq!(CursorState::row_count("a\n"), 2);
    }
}
