//! # Open Prompt Component
//!
//! Overlay for choosing one or more files to open. Opened with Ctrl+O,
//! dismissed with Esc.
//!
//! Lists the files of the working directory that the console can load.
//! Tab marks entries for a multi-file open (e.g. a page and its stylesheet);
//! typing switches to a path field for files outside the listing.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `OpenPromptState` lives in `TuiState`
//! - `OpenPrompt` is created each frame with borrowed state

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};

use crate::core::files::resolve_extension;
use crate::tui::event::TuiEvent;

/// Persistent state for the open overlay.
pub struct OpenPromptState {
    pub dir: PathBuf,
    pub entries: Vec<PathBuf>,
    pub selected: usize,
    pub marked: BTreeSet<usize>,
    pub input: String,
    pub list_state: ListState,
}

/// Events emitted by the open prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum OpenEvent {
    Open(Vec<PathBuf>),
    Dismiss,
}

impl OpenPromptState {
    pub fn new(dir: PathBuf, entries: Vec<PathBuf>) -> Self {
        let mut list_state = ListState::default();
        if !entries.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            dir,
            entries,
            selected: 0,
            marked: BTreeSet::new(),
            input: String::new(),
            list_state,
        }
    }

    /// List the loadable files in `dir`, sorted by name.
    pub fn scan(dir: &Path) -> Self {
        let mut entries: Vec<PathBuf> = match fs::read_dir(dir) {
            Ok(read_dir) => read_dir
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_file())
                .filter(|path| {
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .and_then(resolve_extension)
                        .is_some()
                })
                .collect(),
            Err(e) => {
                warn!("Failed to list {}: {}", dir.display(), e);
                Vec::new()
            }
        };
        entries.sort();
        Self::new(dir.to_path_buf(), entries)
    }

    /// Handle a key event, returning an OpenEvent if the overlay should act.
    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<OpenEvent> {
        match event {
            TuiEvent::Escape => Some(OpenEvent::Dismiss),
            TuiEvent::InputChar(c) => {
                self.input.push(*c);
                None
            }
            TuiEvent::Paste(text) => {
                self.input.push_str(text.trim());
                None
            }
            TuiEvent::Backspace => {
                self.input.pop();
                None
            }
            TuiEvent::CursorUp => {
                if !self.entries.is_empty() {
                    self.selected = self.selected.saturating_sub(1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::CursorDown => {
                if !self.entries.is_empty() {
                    self.selected = (self.selected + 1).min(self.entries.len() - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Indent => {
                if !self.entries.is_empty() && !self.marked.remove(&self.selected) {
                    self.marked.insert(self.selected);
                }
                None
            }
            TuiEvent::Submit => {
                let paths = self.chosen();
                (!paths.is_empty()).then_some(OpenEvent::Open(paths))
            }
            _ => None,
        }
    }

    /// Typed paths win, then marked entries, then the highlighted one.
    fn chosen(&self) -> Vec<PathBuf> {
        if !self.input.trim().is_empty() {
            return self
                .input
                .split_whitespace()
                .map(|p| self.dir.join(p))
                .collect();
        }
        if !self.marked.is_empty() {
            return self
                .marked
                .iter()
                .filter_map(|&i| self.entries.get(i).cloned())
                .collect();
        }
        self.entries.get(self.selected).cloned().into_iter().collect()
    }
}

/// Transient render wrapper for the open overlay.
pub struct OpenPrompt<'a> {
    state: &'a mut OpenPromptState,
}

impl<'a> OpenPrompt<'a> {
    pub fn new(state: &'a mut OpenPromptState) -> Self {
        Self { state }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 60, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" Open from {} ", self.state.dir.display()))
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" Tab Mark  Enter Open  Esc Back ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let [input_area, list_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);

        let input_line = if self.state.input.is_empty() {
            Line::from(Span::styled(
                "Type a path, or pick below",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(vec![
                Span::styled("Path: ", Style::default().fg(Color::Cyan)),
                Span::raw(self.state.input.as_str()),
            ])
        };
        frame.render_widget(Paragraph::new(input_line), input_area);

        if self.state.entries.is_empty() {
            let empty = Paragraph::new("No loadable files here.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(empty, list_area);
            return;
        }

        let items: Vec<ListItem> = self
            .state
            .entries
            .iter()
            .enumerate()
            .map(|(i, path)| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let mark = if self.state.marked.contains(&i) {
                    "[x] "
                } else {
                    "[ ] "
                };
                let style = if i == self.state.selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(mark, style),
                    Span::styled(name, style),
                ]))
            })
            .collect();

        frame.render_stateful_widget(List::new(items), list_area, &mut self.state.list_state);
    }
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn prompt() -> OpenPromptState {
        OpenPromptState::new(
            PathBuf::from("/work"),
            vec![
                PathBuf::from("/work/index.html"),
                PathBuf::from("/work/main.py"),
                PathBuf::from("/work/style.css"),
            ],
        )
    }

    #[test]
    fn test_enter_opens_selected_entry() {
        let mut state = prompt();
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(OpenEvent::Open(vec![PathBuf::from("/work/main.py")]))
        );
    }

    #[test]
    fn test_marked_entries_open_together() {
        let mut state = prompt();
        state.handle_event(&TuiEvent::Indent);
        state.handle_event(&TuiEvent::CursorDown);
        state.handle_event(&TuiEvent::CursorDown);
        state.handle_event(&TuiEvent::Indent);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(OpenEvent::Open(vec![
                PathBuf::from("/work/index.html"),
                PathBuf::from("/work/style.css"),
            ]))
        );
    }

    #[test]
    fn test_second_tab_unmarks() {
        let mut state = prompt();
        state.handle_event(&TuiEvent::Indent);
        state.handle_event(&TuiEvent::Indent);
        assert!(state.marked.is_empty());
    }

    #[test]
    fn test_typed_paths_take_precedence() {
        let mut state = prompt();
        state.handle_event(&TuiEvent::Indent);
        for c in "a.ts b.js".chars() {
            state.handle_event(&TuiEvent::InputChar(c));
        }
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(OpenEvent::Open(vec![
                PathBuf::from("/work/a.ts"),
                PathBuf::from("/work/b.js"),
            ]))
        );
    }

    #[test]
    fn test_empty_listing_submits_nothing() {
        let mut state = OpenPromptState::new(PathBuf::from("/work"), Vec::new());
        assert_eq!(state.handle_event(&TuiEvent::Submit), None);
        assert_eq!(state.handle_event(&TuiEvent::Escape), Some(OpenEvent::Dismiss));
    }

    #[test]
    fn test_scan_keeps_loadable_files() {
        let dir = std::env::temp_dir().join(format!("polyglot-open-scan-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("b.py"), "").unwrap();
        fs::write(dir.join("a.css"), "").unwrap();
        fs::write(dir.join("notes.txt"), "").unwrap();

        let state = OpenPromptState::scan(&dir);
        let names: Vec<_> = state
            .entries
            .iter()
            .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
            .collect();
        assert_eq!(names, vec!["a.css", "b.py"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_render_lists_entries() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = prompt();
        state.marked.insert(2);
        terminal
            .draw(|f| OpenPrompt::new(&mut state).render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("index.html"));
        assert!(text.contains("[x] style.css"));
    }
}
