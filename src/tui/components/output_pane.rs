//! # OutputPane Component
//!
//! Scrollable view of the console output buffer.
//!
//! `OutputPane` is a transient component (created each frame) that wraps
//! `&'a mut OutputPaneState` (persistent state) and the output text (props).
//! Lines are wrapped with `textwrap` so the canvas height handed to the
//! `ScrollView` matches what is drawn. Everything from the first `❌` marker
//! on is an error report and is drawn in red.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::highlight::expand_tabs;

const ERROR_PREFIX: &str = "❌";

/// Scroll state for the output pane. Must be persisted in the parent TuiState.
pub struct OutputPaneState {
    pub scroll_state: ScrollViewState,
    /// When true, follow new output to the bottom
    pub stick_to_bottom: bool,
    content_height: u16,
    viewport_height: u16,
}

impl Default for OutputPaneState {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPaneState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            content_height: 0,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Re-engage auto-scroll once the user scrolls back to the end.
    fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        if self.scroll_state.offset().y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position { x: 0, y: max_y });
        }
    }
}

impl EventHandler for OutputPaneState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Wrap `text` to `width` columns, styling error reports.
fn wrap_output(text: &str, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut in_error = false;
    let mut lines = Vec::new();

    for raw in text.trim_end_matches('\n').split('\n') {
        in_error |= raw.starts_with(ERROR_PREFIX);
        let style = if in_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        let style = if raw.starts_with(ERROR_PREFIX) {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        };

        let expanded = expand_tabs(raw);
        if expanded.is_empty() {
            lines.push(Line::default());
            continue;
        }
        for piece in textwrap::wrap(&expanded, width) {
            lines.push(Line::styled(piece.into_owned(), style));
        }
    }
    lines
}

pub struct OutputPane<'a> {
    state: &'a mut OutputPaneState,
    text: &'a str,
    focused: bool,
}

impl<'a> OutputPane<'a> {
    pub fn new(state: &'a mut OutputPaneState, text: &'a str, focused: bool) -> Self {
        Self {
            state,
            text,
            focused,
        }
    }
}

impl Component for OutputPane<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(" Output ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.text.is_empty() {
            let hint = Paragraph::new("Run (Ctrl+R) to see output here.")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(hint, inner);
            self.state.content_height = 0;
            self.state.scroll_state = ScrollViewState::default();
            self.state.stick_to_bottom = true;
            return;
        }

        // One column for the scrollbar
        let content_width = inner.width.saturating_sub(1);
        let lines = wrap_output(self.text, content_width);
        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        self.state.content_height = height;
        self.state.viewport_height = inner.height;

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        } else if self.state.scroll_state.offset().y > self.state.max_offset() {
            let max_y = self.state.max_offset();
            self.state.scroll_state.set_offset(Position { x: 0, y: max_y });
        }

        let mut scroll_view = ScrollView::new(Size::new(content_width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(
            Paragraph::new(lines),
            Rect::new(0, 0, content_width, height),
        );
        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}
