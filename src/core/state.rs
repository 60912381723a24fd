//! # Application State
//!
//! Core state for the console. This module contains domain state only,
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session: SessionState          // active mode, base name, readiness
//! ├── surfaces: SurfaceSet           // editor surfaces + preview
//! ├── output: OutputSink             // output text + toast
//! ├── runtimes: Runtimes             // one adapter per executable mode
//! ├── unavailable: HashMap           // modes whose runtime failed to start
//! ├── pending_open: bool             // a file read is in flight
//! └── preview_file: Option<PathBuf>  // where HTML previews are exported
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs,
//! which delegates to the command handlers in controller.rs.

use std::collections::HashMap;
use std::path::PathBuf;

use log::info;

use crate::core::config::ResolvedConfig;
use crate::core::files::PLACEHOLDER_BASE_NAME;
use crate::core::mode::Mode;
use crate::core::output::{Level, OutputSink};
use crate::core::surface::SurfaceSet;
use crate::runtime::{Readiness, Runtimes};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub active_mode: Mode,
    /// Name saved files are built from. Only a successful open changes it.
    pub base_name: String,
    /// False until every runtime has finished its start-up bootstrap.
    pub runtime_ready: bool,
}

impl SessionState {
    pub fn new(active_mode: Mode) -> Self {
        Self {
            active_mode,
            base_name: PLACEHOLDER_BASE_NAME.to_string(),
            runtime_ready: false,
        }
    }
}

pub struct App {
    pub session: SessionState,
    pub surfaces: SurfaceSet,
    pub output: OutputSink,
    pub runtimes: Runtimes,
    pub unavailable: HashMap<Mode, String>,
    pub pending_open: bool,
    pub preview_file: Option<PathBuf>,
}

impl App {
    pub fn new(runtimes: Runtimes, config: &ResolvedConfig) -> Self {
        let mut app = Self {
            session: SessionState::new(config.default_mode),
            surfaces: SurfaceSet::new(),
            output: OutputSink::new(),
            runtimes,
            unavailable: HashMap::new(),
            pending_open: false,
            preview_file: config.preview_file.clone(),
        };
        // Initial layout for the starting mode
        app.set_mode(config.default_mode);
        app
    }

    /// Record the outcome of the start-up bootstrap and enable Run.
    pub fn mark_runtimes_ready(&mut self, readiness: Readiness) {
        self.session.runtime_ready = true;
        self.unavailable.clear();
        for (mode, result) in readiness {
            if let Err(e) = result {
                self.unavailable.insert(mode, e.to_string());
            }
        }

        if self.unavailable.is_empty() {
            info!("All runtimes ready");
            self.output.notify(Level::Info, "Runtimes ready");
        } else {
            let mut modes: Vec<&str> = self.unavailable.keys().map(|m| m.label()).collect();
            modes.sort_unstable();
            self.output.notify(
                Level::Warning,
                format!("Unavailable: {}", modes.join(", ")),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RuntimeError;
    use crate::test_support::{TestRuntimes, test_app_with};

    #[test]
    fn test_app_new_defaults() {
        let runtimes = TestRuntimes::new();
        let app = test_app_with(&runtimes);
        assert_eq!(app.session.active_mode, Mode::JavaScript);
        assert_eq!(app.session.base_name, PLACEHOLDER_BASE_NAME);
        assert!(!app.session.runtime_ready);
        assert!(app.surfaces.primary_visible());
        assert_eq!(app.surfaces.primary.language(), Some("javascript"));
    }

    #[test]
    fn test_mark_runtimes_ready_records_failures() {
        let runtimes = TestRuntimes::new();
        let mut app = test_app_with(&runtimes);
        app.mark_runtimes_ready(vec![
            (Mode::JavaScript, Ok(())),
            (Mode::Python, Err(RuntimeError::Unavailable("python3: not found".into()))),
        ]);
        assert!(app.session.runtime_ready);
        assert!(app.unavailable.contains_key(&Mode::Python));
        assert!(!app.unavailable.contains_key(&Mode::JavaScript));
        let toast = app.output.toast().unwrap();
        assert_eq!(toast.level, Level::Warning);
        assert!(toast.text.contains("Python"));
    }
}
