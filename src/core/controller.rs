//! # Mode & Execution Controller
//!
//! Command handlers behind `update()`. Each handler takes the `App` by
//! exclusive reference, so there is exactly one owner of the session, the
//! surfaces and the output sink at any time.
//!
//! ```text
//! set_mode ─► layout + language tag + relayout request
//! run      ─► SourceBundle ─► adapter / transpiler / preview synthesis ─► toast
//! open     ─► files read by the front end ─► surfaces + base name
//! save     ─► SaveFile list ─► written by the front end ─► toast
//! ```

use std::fmt;
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::core::files::{
    MarkupRole, derive_base_name, file_name, is_dual_selection, markup_extension, markup_role,
    resolve_extension, save_extension,
};
use crate::core::mode::Mode;
use crate::core::output::Level;
use crate::core::preview::synthesize_document;
use crate::core::state::App;
use crate::core::surface::{Layout, SPLIT_EDITOR_PERCENT};
use crate::runtime::RuntimeError;

// ============================================================================
// Types
// ============================================================================

/// Everything that can go wrong in a console command. None of these are
/// fatal: each one is turned into output text and/or a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// Opened file's extension is not in the table. Falls back to JavaScript.
    UnresolvedExtension(String),
    /// Dual-surface open with neither a markup nor a style file.
    NoMatchingFile,
    ReadFailure { path: String, reason: String },
    TranspileFailure(String),
    ExecutionFailure(String),
    /// Dual-surface save with both surfaces blank.
    EmptySave,
    /// A file read is still in flight.
    Busy,
    /// Run pressed before the runtime bootstrap finished.
    RuntimesStarting,
    WriteFailure { path: String, reason: String },
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::UnresolvedExtension(name) => {
                write!(f, "unknown file type for {name}, opened as JavaScript")
            }
            ConsoleError::NoMatchingFile => write!(f, "no matching .html or .css file selected"),
            ConsoleError::ReadFailure { path, reason } => {
                write!(f, "could not read {path}: {reason}")
            }
            ConsoleError::TranspileFailure(msg) => f.write_str(msg),
            ConsoleError::ExecutionFailure(msg) => f.write_str(msg),
            ConsoleError::EmptySave => write!(f, "nothing to save, both editors are empty"),
            ConsoleError::Busy => write!(f, "still opening files, try again in a moment"),
            ConsoleError::RuntimesStarting => write!(f, "runtimes are still starting"),
            ConsoleError::WriteFailure { path, reason } => {
                write!(f, "could not write {path}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConsoleError {}

impl From<RuntimeError> for ConsoleError {
    fn from(e: RuntimeError) -> Self {
        match e {
            RuntimeError::Transpile(msg) => ConsoleError::TranspileFailure(msg),
            other => ConsoleError::ExecutionFailure(other.to_string()),
        }
    }
}

/// Source text read from the surfaces at dispatch time, tagged by mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceBundle {
    JavaScript(String),
    TypeScript(String),
    Python(String),
    HtmlCss { content: String, style: String },
}

/// A file the front end has read for an open command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedFile {
    pub name: String,
    pub text: String,
}

/// A file the front end should write for a save command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFile {
    pub name: String,
    pub text: String,
}

/// What a completed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub mode: Mode,
    pub succeeded: bool,
}

// ============================================================================
// Mode transition
// ============================================================================

impl App {
    /// Switch the active mode and reconfigure the surfaces for it.
    ///
    /// Always clears the output and requests a relayout, even when `target`
    /// is already active.
    pub fn set_mode(&mut self, target: Mode) {
        self.output.clear();
        self.surfaces.preview.clear();

        if target.is_dual_surface() {
            self.surfaces.set_layout(Layout::Split {
                editor_percent: SPLIT_EDITOR_PERCENT,
            });
            self.surfaces.content.request_layout();
            self.surfaces.style.request_layout();
        } else {
            self.surfaces.set_layout(Layout::Single);
            if let Some(tag) = target.language_tag() {
                self.surfaces.primary.set_language_tag(tag);
            }
            self.surfaces.primary.request_layout();
        }

        if self.session.active_mode != target {
            info!("Mode: {} -> {}", self.session.active_mode, target);
        }
        self.session.active_mode = target;
    }

    // ========================================================================
    // Run
    // ========================================================================

    /// Read the source for the active mode fresh from the surfaces.
    pub fn source_bundle(&self) -> SourceBundle {
        let primary = || self.surfaces.primary.text().to_string();
        match self.session.active_mode {
            Mode::JavaScript => SourceBundle::JavaScript(primary()),
            Mode::TypeScript => SourceBundle::TypeScript(primary()),
            Mode::Python => SourceBundle::Python(primary()),
            Mode::HtmlCss => SourceBundle::HtmlCss {
                content: self.surfaces.content.text().to_string(),
                style: self.surfaces.style.text().to_string(),
            },
        }
    }

    /// Run the active mode's source. Returns `None` when the run was refused
    /// (runtimes still starting, or an open in flight).
    pub fn run(&mut self) -> Option<RunOutcome> {
        if let Err(e) = self.check_run_enabled() {
            self.output.notify(Level::Warning, capitalize(&e.to_string()));
            return None;
        }

        self.output.clear();
        let mode = self.session.active_mode;
        let bundle = self.source_bundle();
        debug!("Dispatching {} run", mode);

        let result = self.dispatch(bundle);

        let succeeded = match result {
            Ok(()) => {
                let text = match mode {
                    Mode::HtmlCss => format!("{mode} preview updated"),
                    _ => format!("{mode} ran successfully"),
                };
                self.output.notify(Level::Success, text);
                true
            }
            Err(e) => {
                self.output.append_error(mode.error_marker(), &e.to_string());
                let text = match e {
                    ConsoleError::TranspileFailure(_) => format!("{mode} failed to compile"),
                    _ => format!("{mode} failed"),
                };
                self.output.notify(Level::Error, text);
                false
            }
        };

        Some(RunOutcome { mode, succeeded })
    }

    fn check_run_enabled(&self) -> Result<(), ConsoleError> {
        if !self.session.runtime_ready {
            return Err(ConsoleError::RuntimesStarting);
        }
        if self.pending_open {
            return Err(ConsoleError::Busy);
        }
        Ok(())
    }

    fn dispatch(&mut self, bundle: SourceBundle) -> Result<(), ConsoleError> {
        match bundle {
            SourceBundle::JavaScript(source) => {
                self.ensure_available(Mode::JavaScript)?;
                let runtime = self.runtimes.javascript.clone();
                runtime.execute(&source, &mut self.output)?;
            }
            SourceBundle::TypeScript(source) => {
                self.ensure_available(Mode::TypeScript)?;
                let js = self.runtimes.typescript.transpile(&source)?;
                let runtime = self.runtimes.javascript.clone();
                runtime.execute(&js, &mut self.output)?;
            }
            SourceBundle::Python(source) => {
                self.ensure_available(Mode::Python)?;
                let runtime = self.runtimes.python.clone();
                runtime.execute(&source, &mut self.output)?;
            }
            SourceBundle::HtmlCss { content, style } => {
                self.surfaces.preview.document = synthesize_document(&content, &style);
            }
        }
        Ok(())
    }

    fn ensure_available(&self, mode: Mode) -> Result<(), ConsoleError> {
        match self.unavailable.get(&mode) {
            Some(reason) => Err(ConsoleError::ExecutionFailure(reason.clone())),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Open
    // ========================================================================

    /// Start an open. Returns false (and toasts why) when it can't start.
    pub fn begin_open(&mut self, paths: &[PathBuf]) -> bool {
        if self.pending_open {
            self.output
                .notify(Level::Warning, capitalize(&ConsoleError::Busy.to_string()));
            return false;
        }
        if paths.is_empty() {
            self.output.notify(Level::Warning, "No files selected");
            return false;
        }
        self.output.clear();
        self.pending_open = true;
        info!("Opening {} file(s)", paths.len());
        true
    }

    /// Complete an open once the front end has read the files.
    pub fn finish_open(&mut self, read: Result<Vec<OpenedFile>, ConsoleError>) {
        self.pending_open = false;
        let result = read.and_then(|files| self.open(files));
        if let Err(e) = result {
            warn!("Open failed: {}", e);
            self.output.append_line(&format!("❌ {}", capitalize(&e.to_string())));
            self.output.notify(Level::Error, "Open failed");
        }
    }

    /// Load already-read files into the surfaces.
    ///
    /// Several files, or any markup/style file, force the dual-surface mode.
    /// Nothing is mutated when an error is returned.
    pub fn open(&mut self, files: Vec<OpenedFile>) -> Result<(), ConsoleError> {
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        if is_dual_selection(&names) {
            self.open_markup(files)
        } else {
            let file = files.into_iter().next().ok_or(ConsoleError::NoMatchingFile)?;
            self.open_single(file);
            Ok(())
        }
    }

    fn open_markup(&mut self, files: Vec<OpenedFile>) -> Result<(), ConsoleError> {
        let content = files
            .iter()
            .position(|f| markup_role(&f.name) == Some(MarkupRole::Content));
        let style = files
            .iter()
            .position(|f| markup_role(&f.name) == Some(MarkupRole::Style));

        // Base name comes from whichever loaded file was selected first
        let trigger = match (content, style) {
            (None, None) => return Err(ConsoleError::NoMatchingFile),
            (Some(c), Some(s)) => c.min(s),
            (Some(i), None) | (None, Some(i)) => i,
        };

        self.set_mode(Mode::HtmlCss);

        let mut loaded = Vec::new();
        if let Some(i) = content {
            self.surfaces.content.set_text(files[i].text.as_str());
            loaded.push(files[i].name.as_str());
        }
        if let Some(i) = style {
            self.surfaces.style.set_text(files[i].text.as_str());
            loaded.push(files[i].name.as_str());
        }

        for (_, skipped) in files
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != content && Some(*i) != style)
        {
            debug!("Open: ignoring {}", skipped.name);
        }

        self.session.base_name = derive_base_name(&files[trigger].name);
        let names: Vec<&str> = loaded.iter().map(|n| display_name(n)).collect();
        self.output
            .notify(Level::Success, format!("Opened {}", names.join(", ")));
        Ok(())
    }

    fn open_single(&mut self, file: OpenedFile) {
        let resolved = resolve_extension(&file.name);
        let mode = resolved.unwrap_or(Mode::JavaScript);

        self.set_mode(mode);
        self.surfaces.primary.set_text(file.text);
        self.session.base_name = derive_base_name(&file.name);

        match resolved {
            Some(_) => self.output.notify(
                Level::Success,
                format!("Opened {}", display_name(&file.name)),
            ),
            None => {
                let e = ConsoleError::UnresolvedExtension(display_name(&file.name).to_string());
                self.output.notify(Level::Warning, capitalize(&e.to_string()));
            }
        }
    }

    // ========================================================================
    // Save
    // ========================================================================

    /// Build the files a save should emit, named from the session base name.
    pub fn save(&mut self) -> Result<Vec<SaveFile>, ConsoleError> {
        if self.pending_open {
            return Err(ConsoleError::Busy);
        }
        self.output.clear();

        let base = self.session.base_name.as_str();
        let files = match self.session.active_mode {
            Mode::HtmlCss => {
                let mut files = Vec::new();
                for (role, surface) in [
                    (MarkupRole::Content, &self.surfaces.content),
                    (MarkupRole::Style, &self.surfaces.style),
                ] {
                    if surface.has_content() {
                        files.push(SaveFile {
                            name: file_name(base, markup_extension(role)),
                            text: surface.text().to_string(),
                        });
                    }
                }
                if files.is_empty() {
                    return Err(ConsoleError::EmptySave);
                }
                files
            }
            mode @ (Mode::JavaScript | Mode::TypeScript | Mode::Python) => {
                let ext = save_extension(mode).unwrap_or("txt");
                vec![SaveFile {
                    name: file_name(base, ext),
                    text: self.surfaces.primary.text().to_string(),
                }]
            }
        };

        debug!(
            "Save: {:?}",
            files.iter().map(|f| f.name.as_str()).collect::<Vec<_>>()
        );
        Ok(files)
    }

    /// Report the outcome of writing the files a save produced.
    pub fn finish_save(&mut self, written: Result<Vec<PathBuf>, ConsoleError>) {
        match written {
            Ok(paths) => {
                for path in &paths {
                    self.output.append_line(&format!("Saved {}", path.display()));
                }
                let names: Vec<String> = paths
                    .iter()
                    .map(|p| {
                        p.file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_else(|| p.display().to_string())
                    })
                    .collect();
                self.output
                    .notify(Level::Success, format!("Saved {}", names.join(", ")));
            }
            Err(e) => {
                self.output.append_line(&format!("❌ {}", capitalize(&e.to_string())));
                self.output.notify(Level::Error, "Save failed");
            }
        }
    }

    // ========================================================================
    // Clear
    // ========================================================================

    pub fn clear_output(&mut self) {
        self.output.clear();
    }
}

/// File name without any directory prefix, for notifications.
fn display_name(name: &str) -> &str {
    match name.rfind(['/', '\\']) {
        Some(i) => &name[i + 1..],
        None => name,
    }
}

pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
