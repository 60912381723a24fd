use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::core::mode::Mode;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    // Console commands (passed to core::update)
    Quit,
    Run,
    CycleMode,
    ChangeMode(Mode),
    Open,
    Save,
    ClearOutput,

    // TUI-local events (handled directly in TUI)
    SwitchFocus,
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Indent,
    Backspace,
    Delete,
    Submit,
    Escape,
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    WordLeft,
    WordRight,
    CursorHome,
    CursorEnd,
    ScrollUp,
    ScrollDown,
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    if !event::poll(timeout).ok()? {
        return None;
    }
    match event::read().ok()? {
        Event::Key(key_event) => map_key(key_event),
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

/// Translate one key press into a TUI event.
pub fn map_key(key_event: KeyEvent) -> Option<TuiEvent> {
    // Keyboard enhancement can report releases too
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    log::debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code,
        key_event.modifiers
    );

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    match key_event.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => Some(TuiEvent::Quit),
        KeyCode::Char('r') if ctrl => Some(TuiEvent::Run),
        KeyCode::Char('t') if ctrl => Some(TuiEvent::CycleMode),
        KeyCode::Char('o') if ctrl => Some(TuiEvent::Open),
        KeyCode::Char('s') if ctrl => Some(TuiEvent::Save),
        KeyCode::Char('k') if ctrl => Some(TuiEvent::ClearOutput),
        // Ctrl+J inserts newline (ASCII LF; Ctrl+Enter sends this in most terminals)
        KeyCode::Char('j') if ctrl => Some(TuiEvent::Submit),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),
        KeyCode::F(5) => Some(TuiEvent::Run),
        KeyCode::F(n @ 1..=4) => Mode::ALL.get(usize::from(n) - 1).copied().map(TuiEvent::ChangeMode),
        KeyCode::Tab => Some(TuiEvent::Indent),
        KeyCode::BackTab => Some(TuiEvent::SwitchFocus),
        KeyCode::Backspace => Some(TuiEvent::Backspace),
        KeyCode::Delete => Some(TuiEvent::Delete),
        KeyCode::Enter => Some(TuiEvent::Submit),
        KeyCode::Esc => Some(TuiEvent::Escape),
        KeyCode::Left if ctrl => Some(TuiEvent::WordLeft),
        KeyCode::Right if ctrl => Some(TuiEvent::WordRight),
        KeyCode::Up => Some(TuiEvent::CursorUp),
        KeyCode::Down => Some(TuiEvent::CursorDown),
        KeyCode::Left => Some(TuiEvent::CursorLeft),
        KeyCode::Right => Some(TuiEvent::CursorRight),
        KeyCode::Home => Some(TuiEvent::CursorHome),
        KeyCode::End => Some(TuiEvent::CursorEnd),
        KeyCode::PageUp => Some(TuiEvent::ScrollUp),
        KeyCode::PageDown => Some(TuiEvent::ScrollDown),
        _ => None,
    }
}
