//! # Actions
//!
//! Everything that can happen in the console becomes an `Action`.
//! User presses Ctrl+R? That's `Action::Run`.
//! Files finished loading? That's `Action::FilesRead(result)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing any I/O the front end should
//! perform. File reads and writes happen elsewhere; their results come back
//! in as new actions.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use std::path::PathBuf;

use log::debug;

use crate::core::controller::{ConsoleError, OpenedFile, SaveFile, capitalize};
use crate::core::files::files_to_read;
use crate::core::mode::Mode;
use crate::core::output::Level;
use crate::core::state::App;
use crate::runtime::Readiness;

#[derive(Debug)]
pub enum Action {
    ChangeMode(Mode),
    /// Step to the next mode in selector order.
    CycleMode,
    Run,
    Open(Vec<PathBuf>),
    FilesRead(Result<Vec<OpenedFile>, ConsoleError>),
    Save,
    SaveFinished(Result<Vec<PathBuf>, ConsoleError>),
    PreviewWritten(Result<PathBuf, ConsoleError>),
    ClearOutput,
    RuntimesReady(Readiness),
    Quit,
}

/// I/O requested by `update()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    ReadFiles(Vec<PathBuf>),
    WriteFiles(Vec<SaveFile>),
    /// Export the synthesized preview document to the configured file.
    WritePreview { path: PathBuf, document: String },
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::ChangeMode(mode) => change_mode(app, mode),
        Action::CycleMode => {
            let next = app.session.active_mode.next();
            change_mode(app, next)
        }
        Action::Run => {
            let Some(outcome) = app.run() else {
                return Effect::None;
            };
            match (&app.preview_file, outcome.mode) {
                (Some(path), Mode::HtmlCss) if outcome.succeeded => Effect::WritePreview {
                    path: path.clone(),
                    document: app.surfaces.preview.document.clone(),
                },
                _ => Effect::None,
            }
        }
        Action::Open(paths) => {
            if app.begin_open(&paths) {
                Effect::ReadFiles(files_to_read(&paths))
            } else {
                Effect::None
            }
        }
        Action::FilesRead(result) => {
            app.finish_open(result);
            Effect::None
        }
        Action::Save => match app.save() {
            Ok(files) => Effect::WriteFiles(files),
            Err(e) => {
                app.output.notify(Level::Warning, capitalize(&e.to_string()));
                Effect::None
            }
        },
        Action::SaveFinished(result) => {
            app.finish_save(result);
            Effect::None
        }
        Action::PreviewWritten(Ok(path)) => {
            debug!("Preview exported to {}", path.display());
            Effect::None
        }
        Action::PreviewWritten(Err(e)) => {
            app.output.notify(Level::Warning, capitalize(&e.to_string()));
            Effect::None
        }
        Action::ClearOutput => {
            app.clear_output();
            Effect::None
        }
        Action::RuntimesReady(readiness) => {
            app.mark_runtimes_ready(readiness);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn change_mode(app: &mut App, mode: Mode) -> Effect {
    if app.pending_open {
        app.output
            .notify(Level::Warning, capitalize(&ConsoleError::Busy.to_string()));
        return Effect::None;
    }
    app.set_mode(mode);
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::files::PLACEHOLDER_BASE_NAME;
    use crate::test_support::ready_app;

    #[test]
    fn test_quit_returns_quit_effect() {
        let (mut app, _rt) = ready_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }

    #[test]
    fn test_cycle_mode_walks_every_mode() {
        let (mut app, _rt) = ready_app();
        let mut seen = vec![app.session.active_mode];
        for _ in 0..Mode::ALL.len() {
            update(&mut app, Action::CycleMode);
            seen.push(app.session.active_mode);
        }
        assert_eq!(seen.first(), seen.last());
        for mode in Mode::ALL {
            assert!(seen.contains(&mode));
        }
    }

    #[test]
    fn test_open_requests_read_then_applies_result() {
        let (mut app, _rt) = ready_app();
        let paths = vec![PathBuf::from("demo/app.ts")];
        let effect = update(&mut app, Action::Open(paths.clone()));
        assert_eq!(effect, Effect::ReadFiles(paths));
        assert!(app.pending_open);

        let effect = update(
            &mut app,
            Action::FilesRead(Ok(vec![OpenedFile {
                name: "demo/app.ts".into(),
                text: "let n: number = 1".into(),
            }])),
        );
        assert_eq!(effect, Effect::None);
        assert!(!app.pending_open);
        assert_eq!(app.session.active_mode, Mode::TypeScript);
        assert_eq!(app.session.base_name, "app");
    }

    #[test]
    fn test_open_reads_only_files_it_will_load() {
        let (mut app, _rt) = ready_app();
        let paths = vec![PathBuf::from("page.html"), PathBuf::from("logo.png")];
        let effect = update(&mut app, Action::Open(paths));
        assert_eq!(effect, Effect::ReadFiles(vec![PathBuf::from("page.html")]));
    }

    #[test]
    fn test_open_with_no_paths_is_refused() {
        let (mut app, _rt) = ready_app();
        assert_eq!(update(&mut app, Action::Open(Vec::new())), Effect::None);
        assert!(!app.pending_open);
    }

    #[test]
    fn test_change_mode_blocked_while_opening() {
        let (mut app, _rt) = ready_app();
        update(&mut app, Action::Open(vec![PathBuf::from("a.js")]));
        update(&mut app, Action::ChangeMode(Mode::Python));
        assert_eq!(app.session.active_mode, Mode::JavaScript);
        assert_eq!(app.output.toast().unwrap().level, Level::Warning);
    }

    #[test]
    fn test_clear_allowed_while_opening() {
        let (mut app, _rt) = ready_app();
        update(&mut app, Action::Open(vec![PathBuf::from("a.js")]));
        app.output.append("leftover");
        update(&mut app, Action::ClearOutput);
        assert!(app.output.is_empty());
    }

    #[test]
    fn test_save_emits_write_effect() {
        let (mut app, _rt) = ready_app();
        app.surfaces.primary.set_text("console.log(1)");
        let effect = update(&mut app, Action::Save);
        assert_eq!(
            effect,
            Effect::WriteFiles(vec![SaveFile {
                name: format!("{PLACEHOLDER_BASE_NAME}.js"),
                text: "console.log(1)".into(),
            }])
        );
    }

    #[test]
    fn test_empty_markup_save_warns_without_effect() {
        let (mut app, _rt) = ready_app();
        update(&mut app, Action::ChangeMode(Mode::HtmlCss));
        assert_eq!(update(&mut app, Action::Save), Effect::None);
        let toast = app.output.toast().unwrap();
        assert_eq!(toast.level, Level::Warning);
    }

    #[test]
    fn test_html_run_exports_preview_when_configured() {
        let (mut app, _rt) = ready_app();
        app.preview_file = Some(PathBuf::from("preview.html"));
        update(&mut app, Action::ChangeMode(Mode::HtmlCss));
        app.surfaces.content.set_text("<p>x</p>");
        let effect = update(&mut app, Action::Run);
        match effect {
            Effect::WritePreview { path, document } => {
                assert_eq!(path, PathBuf::from("preview.html"));
                assert!(document.contains("<p>x</p>"));
            }
            other => panic!("expected WritePreview, got {other:?}"),
        }
    }

    #[test]
    fn test_html_run_without_export_has_no_effect() {
        let (mut app, _rt) = ready_app();
        update(&mut app, Action::ChangeMode(Mode::HtmlCss));
        assert_eq!(update(&mut app, Action::Run), Effect::None);
    }

    #[test]
    fn test_script_run_never_exports_preview() {
        let (mut app, _rt) = ready_app();
        app.preview_file = Some(PathBuf::from("preview.html"));
        app.surfaces.primary.set_text("print x");
        assert_eq!(update(&mut app, Action::Run), Effect::None);
    }

    #[test]
    fn test_preview_export_failure_is_only_a_warning() {
        let (mut app, _rt) = ready_app();
        update(&mut app, Action::ChangeMode(Mode::HtmlCss));
        app.surfaces.content.set_text("<p>x</p>");
        update(&mut app, Action::Run);
        let effect = update(
            &mut app,
            Action::PreviewWritten(Err(ConsoleError::WriteFailure {
                path: "/ro/preview.html".into(),
                reason: "Read-only file system".into(),
            })),
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(app.output.toast().unwrap().level, Level::Warning);
        assert!(!app.surfaces.preview.document.is_empty());
    }

    #[test]
    fn test_runtimes_ready_enables_run() {
        let runtimes = crate::test_support::TestRuntimes::new();
        let mut app = crate::test_support::test_app_with(&runtimes);
        app.surfaces.primary.set_text("print x");
        update(&mut app, Action::Run);
        assert_eq!(runtimes.javascript.call_count(), 0);
        update(&mut app, Action::RuntimesReady(Vec::new()));
        update(&mut app, Action::Run);
        assert_eq!(runtimes.javascript.call_count(), 1);
    }
}
