use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;

use crate::core::state::App;
use crate::core::surface::Layout as SurfaceLayout;
use crate::tui::component::Component;
use crate::tui::components::{Editor, OpenPrompt, OutputPane, PreviewPane, TitleBar};
use crate::tui::{Focus, TuiState};

const HELP: &str = " ^R Run  ^T Mode  F1-F4 Pick  ^O Open  ^S Save  ^K Clear  ⇧Tab Focus  ^Q Quit";

pub fn draw_ui(frame: &mut Frame, app: &mut App, tui: &mut TuiState) {
    use Constraint::{Length, Min, Percentage};
    let layout = Layout::vertical([Length(1), Min(5), Percentage(30), Length(1)]);
    let [title_area, main_area, output_area, help_area] = layout.areas(frame.area());

    let mut title_bar = TitleBar::new(
        app.session.active_mode,
        app.session.base_name.clone(),
        app.session.runtime_ready,
        app.output.toast().cloned(),
    );
    title_bar.render(frame, title_area);

    draw_editors(frame, main_area, app, tui);

    OutputPane::new(&mut tui.output, app.output.text(), false).render(frame, output_area);

    frame.render_widget(
        Line::styled(HELP, Style::default().fg(Color::DarkGray)),
        help_area,
    );

    // Overlay last so it sits on top
    if let Some(prompt) = tui.open_prompt.as_mut() {
        OpenPrompt::new(prompt).render(frame, frame.area());
    }
}

fn draw_editors(frame: &mut Frame, area: Rect, app: &mut App, tui: &mut TuiState) {
    // The overlay owns the cursor while it is up
    let editing = tui.open_prompt.is_none();

    match app.surfaces.layout() {
        SurfaceLayout::Single => {
            let title = app.session.active_mode.label();
            Editor::new(
                &mut app.surfaces.primary,
                &mut tui.primary,
                title,
                editing && tui.focus == Focus::Primary,
            )
            .render(frame, area);
        }
        SurfaceLayout::Split { editor_percent } => {
            let [editor_area, preview_area] = Layout::horizontal([
                Constraint::Percentage(editor_percent),
                Constraint::Percentage(100 - editor_percent.min(100)),
            ])
            .areas(area);
            let [content_area, style_area] =
                Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .areas(editor_area);

            Editor::new(
                &mut app.surfaces.content,
                &mut tui.content,
                "HTML",
                editing && tui.focus == Focus::Content,
            )
            .render(frame, content_area);
            Editor::new(
                &mut app.surfaces.style,
                &mut tui.style,
                "CSS",
                editing && tui.focus == Focus::Style,
            )
            .render(frame, style_area);

            PreviewPane {
                document: &app.surfaces.preview.document,
                exported_to: app.preview_file.as_deref(),
            }
            .render(frame, preview_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::core::mode::Mode;
    use crate::test_support::ready_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;

    fn draw(app: &mut App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_single_layout_shows_primary_editor() {
        let (mut app, _rt) = ready_app();
        app.surfaces.primary.set_text("console.log('hi')");
        let mut tui = TuiState::new();

        let text = draw(&mut app, &mut tui);
        assert!(text.contains("Polyglot"));
        assert!(text.contains("console.log('hi')"));
        assert!(text.contains("Output"));
        assert!(!text.contains("Preview"));
    }

    #[test]
    fn test_split_layout_shows_both_editors_and_preview() {
        let (mut app, _rt) = ready_app();
        update(&mut app, Action::ChangeMode(Mode::HtmlCss));
        app.surfaces.content.set_text("<h1>Hi</h1>");
        app.surfaces.style.set_text("h1 { color: red; }");
        update(&mut app, Action::Run);
        let mut tui = TuiState::new();
        tui.sync_focus(&app);

        let text = draw(&mut app, &mut tui);
        assert!(text.contains("HTML"));
        assert!(text.contains("CSS"));
        assert!(text.contains("Preview"));
        assert!(text.contains("color: red"));
    }

    #[test]
    fn test_output_is_drawn() {
        let (mut app, _rt) = ready_app();
        app.surfaces.primary.set_text("print hello from js");
        update(&mut app, Action::Run);
        let mut tui = TuiState::new();

        let text = draw(&mut app, &mut tui);
        assert!(text.contains("hello from js"));
    }

    #[test]
    fn test_open_prompt_overlay_is_drawn() {
        let (mut app, _rt) = ready_app();
        let mut tui = TuiState::new();
        tui.open_prompt = Some(crate::tui::components::OpenPromptState::new(
            PathBuf::from("/work"),
            vec![PathBuf::from("/work/main.py")],
        ));

        let text = draw(&mut app, &mut tui);
        assert!(text.contains("main.py"));
    }
}
