//! # Output Sink
//!
//! The single text buffer that run/open/save results land in, plus a
//! transient toast channel for one-line notifications.
//!
//! Runtime adapters receive `&mut OutputSink` explicitly for the duration of
//! one `execute` call. Nothing swaps a global print hook.

use log::{info, warn};

/// Severity of a toast notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct OutputSink {
    text: String,
    toast: Option<Notification>,
    /// Bumped on every toast so the front end can restart its display timer.
    toast_serial: u64,
}

impl OutputSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Reset the buffer to empty. The toast is left alone.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append one line followed by `\n`.
    pub fn append_line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    /// Append an error message behind a mode-specific marker.
    pub fn append_error(&mut self, marker: &str, message: &str) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        self.text.push_str(marker);
        self.text.push_str(message);
    }

    pub fn notify(&mut self, level: Level, text: impl Into<String>) {
        let text = text.into();
        match level {
            Level::Warning | Level::Error => warn!("Notification ({:?}): {}", level, text),
            Level::Success | Level::Info => info!("Notification ({:?}): {}", level, text),
        }
        self.toast = Some(Notification { level, text });
        self.toast_serial += 1;
    }

    pub fn toast(&self) -> Option<&Notification> {
        self.toast.as_ref()
    }

    pub fn toast_serial(&self) -> u64 {
        self.toast_serial
    }

    /// Drop the toast once the front end has shown it long enough.
    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }
}
