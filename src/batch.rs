//! # Batch Runner
//!
//! `polyglot --run <files>` without a terminal UI: wait for the runtimes,
//! open the files, run once, print the result. Drives the same
//! `update()`/`Effect` cycle as the TUI, awaiting each effect inline.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::mode::Mode;
use crate::core::output::Level;
use crate::core::state::App;
use crate::core::storage;
use crate::runtime::Runtimes;

/// Run `files` once with the configured runtimes. Returns whether the run
/// succeeded.
pub async fn run(config: &ResolvedConfig, files: Vec<PathBuf>) -> std::io::Result<bool> {
    let runtimes = Runtimes::from_config(config);
    let mut app = App::new(runtimes, config);
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    run_app(&mut app, files, &config.save_dir, &mut stdout, &mut stderr).await
}

/// Batch flow over an existing app. Program output goes to `out`, open
/// failures to `err`.
pub async fn run_app(
    app: &mut App,
    files: Vec<PathBuf>,
    save_dir: &Path,
    out: &mut impl Write,
    err: &mut impl Write,
) -> std::io::Result<bool> {
    let readiness = app.runtimes.ready_all().await;
    dispatch(app, Action::RuntimesReady(readiness), save_dir).await;

    dispatch(app, Action::Open(files), save_dir).await;
    if app.output.toast().map(|t| t.level) == Some(Level::Error) {
        err.write_all(app.output.text().as_bytes())?;
        return Ok(false);
    }

    info!("Batch run: {}", app.session.active_mode);
    dispatch(app, Action::Run, save_dir).await;
    let succeeded = app.output.toast().map(|t| t.level) == Some(Level::Success);

    match app.session.active_mode {
        Mode::HtmlCss => writeln!(out, "{}", app.surfaces.preview.document)?,
        _ => out.write_all(app.output.text().as_bytes())?,
    }
    out.flush()?;
    Ok(succeeded)
}

/// Apply an action, then keep performing effects until none are left.
async fn dispatch(app: &mut App, action: Action, save_dir: &Path) {
    let mut effect = update(app, action);
    while effect != Effect::None && effect != Effect::Quit {
        match storage::perform(effect, save_dir).await {
            Some(next) => effect = update(app, next),
            None => break,
        }
    }
}
