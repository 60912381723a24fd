//! # TitleBar Component
//!
//! Top status bar: active mode, base name, runtime readiness and the latest
//! toast.
//!
//! Purely presentational. All props come from core `App` state and are
//! copied in each frame:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(
//!     app.session.active_mode,
//!     app.session.base_name.clone(),
//!     app.session.runtime_ready,
//!     app.output.toast().cloned(),
//! );
//! title_bar.render(frame, area);
//! ```
//!
//! ## Conditional Formatting
//!
//! 1. **Starting**: `"Polyglot · JavaScript · untitled | Starting runtimes..."`
//! 2. **Toast**: `"Polyglot · Python · script | ✔ Python ran successfully"`
//! 3. **Default**: `"Polyglot · HTML + CSS · page"`

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::mode::Mode;
use crate::core::output::{Level, Notification};
use crate::tui::component::Component;

pub struct TitleBar {
    pub mode: Mode,
    pub base_name: String,
    pub runtime_ready: bool,
    pub toast: Option<Notification>,
}

impl TitleBar {
    pub fn new(
        mode: Mode,
        base_name: String,
        runtime_ready: bool,
        toast: Option<Notification>,
    ) -> Self {
        Self {
            mode,
            base_name,
            runtime_ready,
            toast,
        }
    }
}

fn toast_style(level: Level) -> (&'static str, Style) {
    match level {
        Level::Success => ("✔", Style::default().fg(Color::Green)),
        Level::Info => ("•", Style::default().fg(Color::Cyan)),
        Level::Warning => ("!", Style::default().fg(Color::Yellow)),
        Level::Error => ("✘", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("Polyglot", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" · "),
            Span::styled(self.mode.label(), Style::default().fg(Color::Cyan)),
            Span::raw(" · "),
            Span::raw(self.base_name.clone()),
        ];

        if !self.runtime_ready {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                "Starting runtimes...",
                Style::default().fg(Color::DarkGray),
            ));
        } else if let Some(toast) = &self.toast {
            let (icon, style) = toast_style(toast.level);
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(format!("{icon} {}", toast.text), style));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
