//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Busy** (runtimes starting, file read in flight, toast on screen):
//!   polls every ~100ms so background results and toast expiry show promptly.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod highlight;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::core::storage;
use crate::core::surface::Layout;
use crate::runtime::Runtimes;
use crate::tui::component::EventHandler;
use crate::tui::components::{Editor, EditorState, OpenEvent, OpenPromptState, OutputPaneState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which editor receives typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Primary,
    Content,
    Style,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states, one per surface
    pub primary: EditorState,
    pub content: EditorState,
    pub style: EditorState,
    pub output: OutputPaneState,
    pub focus: Focus,
    // Open overlay (None = hidden)
    pub open_prompt: Option<OpenPromptState>,
    /// Directory the open overlay lists
    pub working_dir: PathBuf,
    // Toast display timer
    toast_serial: u64,
    toast_shown_at: Option<Instant>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            primary: EditorState::new(),
            content: EditorState::new(),
            style: EditorState::new(),
            output: OutputPaneState::new(),
            focus: Focus::Primary,
            open_prompt: None,
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            toast_serial: 0,
            toast_shown_at: None,
        }
    }

    /// Keep focus on an editor that is actually visible.
    pub fn sync_focus(&mut self, app: &App) {
        self.focus = match (app.surfaces.layout(), self.focus) {
            (Layout::Single, _) => Focus::Primary,
            (Layout::Split { .. }, Focus::Primary) => Focus::Content,
            (Layout::Split { .. }, focus) => focus,
        };
    }

    /// Toggle between the two split editors.
    pub fn switch_focus(&mut self, app: &App) {
        self.focus = match (app.surfaces.layout(), self.focus) {
            (Layout::Single, _) => Focus::Primary,
            (Layout::Split { .. }, Focus::Content) => Focus::Style,
            (Layout::Split { .. }, _) => Focus::Content,
        };
    }

    /// Start the timer for a new toast, or dismiss the current one once it
    /// has been up for `ttl`. Returns `true` when the toast was dismissed.
    pub fn expire_toast(&mut self, app: &mut App, ttl: Duration, now: Instant) -> bool {
        let serial = app.output.toast_serial();
        if serial != self.toast_serial {
            self.toast_serial = serial;
            self.toast_shown_at = Some(now);
            return false;
        }
        match self.toast_shown_at {
            Some(shown) if app.output.toast().is_some() && now.duration_since(shown) >= ttl => {
                app.output.dismiss_toast();
                self.toast_shown_at = None;
                true
            }
            _ => false,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Enable Kitty keyboard protocol unconditionally (lets Ctrl+Left and
        // friends arrive unambiguously); terminals without it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!(
            "Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)"
        );
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

pub fn run(config: ResolvedConfig, files: Vec<PathBuf>) -> std::io::Result<()> {
    let runtimes = Runtimes::from_config(&config);
    let mut app = App::new(runtimes, &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    spawn_readiness(app.runtimes.clone(), tx.clone());
    if !files.is_empty() {
        let effect = update(&mut app, Action::Open(files));
        spawn_effect(effect, &config.save_dir, &tx);
    }

    let toast_ttl = Duration::from_secs(config.toast_seconds);
    let mut needs_redraw = true; // Force first frame

    let result = loop {
        if tui.expire_toast(&mut app, toast_ttl, Instant::now()) {
            needs_redraw = true;
        }

        if needs_redraw {
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &mut app, &mut tui)) {
                break Err(e);
            }
            needs_redraw = false;
        }

        let busy = !app.session.runtime_ready || app.pending_open || app.output.toast().is_some();
        let timeout = if busy {
            Duration::from_millis(100)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match handle_event(&mut app, &mut tui, event) {
                Effect::Quit => should_quit = true,
                effect => spawn_effect(effect, &config.save_dir, &tx),
            }
        }

        if should_quit {
            break Ok(());
        }

        // Handle background task actions (runtime readiness, file I/O results)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            tui.sync_focus(&app);
            spawn_effect(effect, &config.save_dir, &tx);
        }
    };

    ratatui::restore();
    result
}

/// Route one input event: overlay first, then console commands, then the
/// focused editor.
fn handle_event(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
    if matches!(event, TuiEvent::Resize) {
        return Effect::None;
    }

    // Quit always works, even with the overlay up
    if matches!(event, TuiEvent::Quit) {
        return update(app, Action::Quit);
    }

    if let Some(prompt) = tui.open_prompt.as_mut() {
        return match prompt.handle_event(&event) {
            Some(OpenEvent::Open(paths)) => {
                tui.open_prompt = None;
                update(app, Action::Open(paths))
            }
            Some(OpenEvent::Dismiss) => {
                tui.open_prompt = None;
                Effect::None
            }
            None => Effect::None,
        };
    }

    let action = match event {
        TuiEvent::Run => Action::Run,
        TuiEvent::CycleMode => Action::CycleMode,
        TuiEvent::ChangeMode(mode) => Action::ChangeMode(mode),
        TuiEvent::Save => Action::Save,
        TuiEvent::ClearOutput => Action::ClearOutput,
        TuiEvent::Open => {
            tui.open_prompt = Some(OpenPromptState::scan(&tui.working_dir));
            return Effect::None;
        }
        TuiEvent::SwitchFocus => {
            tui.switch_focus(app);
            return Effect::None;
        }
        TuiEvent::ScrollUp | TuiEvent::ScrollDown => {
            tui.output.handle_event(&event);
            return Effect::None;
        }
        other => {
            let (surface, state) = match tui.focus {
                Focus::Primary => (&mut app.surfaces.primary, &mut tui.primary),
                Focus::Content => (&mut app.surfaces.content, &mut tui.content),
                Focus::Style => (&mut app.surfaces.style, &mut tui.style),
            };
            Editor::new(surface, state, "", true).handle_event(&other);
            return Effect::None;
        }
    };

    let effect = update(app, action);
    tui.sync_focus(app);
    effect
}

/// Bootstrap every runtime in the background and report back once.
fn spawn_readiness(runtimes: Runtimes, tx: mpsc::Sender<Action>) {
    info!("Spawning runtime bootstrap");
    tokio::spawn(async move {
        let readiness = runtimes.ready_all().await;
        if tx.send(Action::RuntimesReady(readiness)).is_err() {
            warn!("Failed to send runtime readiness: receiver dropped");
        }
    });
}

/// Perform file I/O off the UI thread; the result comes back as an action.
fn spawn_effect(effect: Effect, save_dir: &Path, tx: &mpsc::Sender<Action>) {
    if matches!(effect, Effect::None | Effect::Quit) {
        return;
    }
    debug!("Spawning effect: {:?}", effect);
    let save_dir = save_dir.to_path_buf();
    let tx = tx.clone();
    tokio::spawn(async move {
        if let Some(action) = storage::perform(effect, &save_dir).await
            && tx.send(action).is_err()
        {
            warn!("Failed to send effect result: receiver dropped");
        }
    });
}
