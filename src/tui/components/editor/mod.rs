//! # Editor Component
//!
//! Code editing pane over one core `Surface`.
//!
//! ## Responsibilities
//!
//! - Render the surface text with syntax highlighting and a line-number gutter
//! - Handle editing (typing, paste, backspace, delete, indent, newline)
//! - Handle cursor movement and keep the cursor in view
//! - Consume the surface's relayout request on draw
//!
//! ## State Management
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `EditorState` (cursor, viewport, highlight cache) lives in `TuiState`
//! - `Editor` is created each frame with the borrowed surface and state
//!
//! The text itself is owned by the core `Surface`. The controller can replace
//! it at any time (an open), so the cursor is clamped before every use.

mod cursor;
mod text_edit;

use log::debug;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::core::surface::Surface;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::highlight::highlight;

use cursor::CursorState;
use text_edit::{
    INDENT, leading_indent, line_end, line_start, next_char_boundary, next_word_boundary,
    prev_char_boundary, prev_word_boundary,
};

/// High-level events emitted by the Editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// Surface text changed
    Edited,
    /// Only the cursor moved
    CursorMoved,
}

struct HighlightCache {
    text: String,
    language: Option<&'static str>,
    lines: Vec<Line<'static>>,
}

/// Persistent per-surface presentation state.
#[derive(Default)]
pub struct EditorState {
    cursor: CursorState,
    highlight: Option<HighlightCache>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlighted lines for `text`, recomputed only when text or language changed.
    fn highlighted(&mut self, text: &str, language: Option<&'static str>) -> &[Line<'static>] {
        let stale = self
            .highlight
            .as_ref()
            .is_none_or(|c| c.language != language || c.text != text);
        if stale {
            self.highlight = Some(HighlightCache {
                text: text.to_string(),
                language,
                lines: highlight(text, language, Color::White),
            });
        }
        self.highlight.as_ref().map(|c| c.lines.as_slice()).unwrap_or_default()
    }
}

/// Transient editor wrapper, created each frame.
pub struct Editor<'a> {
    surface: &'a mut Surface,
    state: &'a mut EditorState,
    title: &'a str,
    focused: bool,
}

impl<'a> Editor<'a> {
    pub fn new(
        surface: &'a mut Surface,
        state: &'a mut EditorState,
        title: &'a str,
        focused: bool,
    ) -> Self {
        Self {
            surface,
            state,
            title,
            focused,
        }
    }

    fn insert(&mut self, s: &str) -> Option<EditorEvent> {
        let cursor = &mut self.state.cursor;
        cursor.clamp(self.surface.text());
        self.surface.text_mut().insert_str(cursor.pos, s);
        cursor.set(cursor.pos + s.len());
        Some(EditorEvent::Edited)
    }

    fn move_to(&mut self, pos: usize) -> Option<EditorEvent> {
        let cursor = &mut self.state.cursor;
        if cursor.pos == pos {
            return None;
        }
        cursor.set(pos);
        Some(EditorEvent::CursorMoved)
    }
}

impl Component for Editor<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.surface.take_layout_request() {
            debug!("Editor '{}' relayout", self.title);
            self.state.cursor.reset_viewport();
        }

        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(format!(" {} ", self.title));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text = self.surface.text();
        let row_count = CursorState::row_count(text);
        let gutter_width = row_count.to_string().len() as u16 + 1;
        let [gutter_area, text_area] =
            Layout::horizontal([Constraint::Length(gutter_width), Constraint::Min(0)]).areas(inner);

        let cursor = &mut self.state.cursor;
        cursor.clamp(text);
        cursor.scroll_into_view(text, text_area.width, text_area.height);
        let (top, left) = (cursor.top, cursor.left);
        let cursor_pos = cursor.screen_pos(text, text_area);

        let height = usize::from(text_area.height);
        let gutter: Vec<Line> = (top..row_count.min(top + height))
            .map(|row| Line::from(format!("{:>w$} ", row + 1, w = usize::from(gutter_width) - 1)))
            .collect();
        frame.render_widget(
            Paragraph::new(gutter).style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)),
            gutter_area,
        );

        let language = self.surface.language();
        let lines = self.state.highlighted(text, language);
        let visible: Vec<Line> = lines.iter().skip(top).take(height).cloned().collect();
        let scroll_x = u16::try_from(left).unwrap_or(u16::MAX);
        frame.render_widget(Paragraph::new(visible).scroll((0, scroll_x)), text_area);

        if self.focused {
            frame.set_cursor_position(cursor_pos);
        }
    }
}

impl EventHandler for Editor<'_> {
    type Event = EditorEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        self.state.cursor.clamp(self.surface.text());
        let text = self.surface.text();
        let pos = self.state.cursor.pos;

        match event {
            TuiEvent::InputChar(c) => {
                let mut buf = [0u8; 4];
                self.insert(c.encode_utf8(&mut buf))
            }
            TuiEvent::Paste(pasted) => {
                let normalized = pasted.replace("\r\n", "\n").replace('\r', "\n");
                self.insert(&normalized)
            }
            TuiEvent::Indent => self.insert(INDENT),
            TuiEvent::Submit => {
                // Newline keeps the current line's indentation
                let newline = format!("\n{}", leading_indent(text, pos));
                self.insert(&newline)
            }
            TuiEvent::Backspace => {
                if pos == 0 {
                    return None;
                }
                let prev = prev_char_boundary(text, pos);
                self.surface.text_mut().drain(prev..pos);
                self.state.cursor.set(prev);
                Some(EditorEvent::Edited)
            }
            TuiEvent::Delete => {
                if pos >= text.len() {
                    return None;
                }
                let next = next_char_boundary(text, pos);
                self.surface.text_mut().drain(pos..next);
                Some(EditorEvent::Edited)
            }
            TuiEvent::CursorLeft if pos > 0 => self.move_to(prev_char_boundary(text, pos)),
            TuiEvent::CursorRight if pos < text.len() => {
                self.move_to(next_char_boundary(text, pos))
            }
            TuiEvent::WordLeft => self.move_to(prev_word_boundary(text, pos)),
            TuiEvent::WordRight => self.move_to(next_word_boundary(text, pos)),
            TuiEvent::CursorHome => self.move_to(line_start(text, pos)),
            TuiEvent::CursorEnd => self.move_to(line_end(text, pos)),
            TuiEvent::CursorUp => self
                .state
                .cursor
                .move_vertically(text, -1)
                .then_some(EditorEvent::CursorMoved),
            TuiEvent::CursorDown => self
                .state
                .cursor
                .move_vertically(text, 1)
                .then_some(EditorEvent::CursorMoved),
            _ => None,
        }
    }
}
