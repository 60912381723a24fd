//! # PreviewPane Component
//!
//! Read-only view of the synthesized preview document. A terminal cannot
//! render a page, so the document is shown as highlighted HTML; when an
//! export path is configured the title points at the file to open in a
//! browser.

use std::path::Path;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::Component;
use crate::tui::highlight::highlight;

pub struct PreviewPane<'a> {
    pub document: &'a str,
    pub exported_to: Option<&'a Path>,
}

impl Component for PreviewPane<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = match self.exported_to {
            Some(path) => format!(" Preview → {} ", path.display()),
            None => " Preview ".to_string(),
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title);

        let paragraph = if self.document.is_empty() {
            Paragraph::new("Run (Ctrl+R) to build the page.")
                .style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(highlight(self.document, Some("html"), Color::White))
        };
        frame.render_widget(paragraph.block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(pane: &mut PreviewPane) -> String {
        let backend = TestBackend::new(60, 14);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| pane.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_empty_preview_shows_hint() {
        let text = draw(&mut PreviewPane {
            document: "",
            exported_to: None,
        });
        assert!(text.contains("Preview"));
        assert!(text.contains("build the page"));
    }

    #[test]
    fn test_document_is_shown() {
        let text = draw(&mut PreviewPane {
            document: "<!DOCTYPE html>\n<body>\n<h1>Hi</h1>\n</body>",
            exported_to: Some(Path::new("/tmp/p.html")),
        });
        assert!(text.contains("<h1>Hi</h1>"));
        assert!(text.contains("/tmp/p.html"));
    }
}
