//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::config::ResolvedConfig;
use crate::core::mode::Mode;
use crate::core::output::OutputSink;
use crate::core::state::App;
use crate::runtime::{RuntimeAdapter, RuntimeError, Runtimes, Transpiler};

/// A runtime that interprets a tiny line-based script instead of a real language:
///
/// - `print <text>` appends `<text>\n`
/// - `fail <message>` stops with `RuntimeError::Failed(message)`
///
/// Every executed source is recorded so tests can assert on dispatch.
#[derive(Default)]
pub struct ScriptedRuntime {
    unavailable: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `ready()` fail with the given reason.
    pub fn unavailable(mut self, reason: &str) -> Self {
        self.unavailable = Some(reason.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn last_call(&self) -> Option<String> {
        self.calls.lock().ok().and_then(|c| c.last().cloned())
    }
}

#[async_trait]
impl RuntimeAdapter for ScriptedRuntime {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn ready(&self) -> Result<(), RuntimeError> {
        match &self.unavailable {
            Some(reason) => Err(RuntimeError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn execute(&self, source: &str, sink: &mut OutputSink) -> Result<(), RuntimeError> {
        self.calls.lock().unwrap().push(source.to_string());
        for line in source.lines() {
            if let Some(text) = line.strip_prefix("print ") {
                sink.append_line(text);
            } else if let Some(message) = line.strip_prefix("fail ") {
                return Err(RuntimeError::Failed(message.to_string()));
            }
        }
        Ok(())
    }
}

/// Strips `: number` annotations; any source containing `syntax error` fails.
#[derive(Default)]
pub struct ScriptedTranspiler {
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedTranspiler {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transpiler for ScriptedTranspiler {
    fn name(&self) -> &str {
        "scripted-tsc"
    }

    async fn ready(&self) -> Result<(), RuntimeError> {
        Ok(())
    }

    fn transpile(&self, source: &str) -> Result<String, RuntimeError> {
        self.calls.lock().unwrap().push(source.to_string());
        if source.contains("syntax error") {
            return Err(RuntimeError::Transpile("Unexpected token".to_string()));
        }
        Ok(source.replace(": number", ""))
    }
}

/// Handles to the doubles wired into a test app, for assertions.
pub struct TestRuntimes {
    pub javascript: Arc<ScriptedRuntime>,
    pub typescript: Arc<ScriptedTranspiler>,
    pub python: Arc<ScriptedRuntime>,
}

impl TestRuntimes {
    pub fn new() -> Self {
        Self {
            javascript: Arc::new(ScriptedRuntime::new()),
            typescript: Arc::new(ScriptedTranspiler::new()),
            python: Arc::new(ScriptedRuntime::new()),
        }
    }

    pub fn runtimes(&self) -> Runtimes {
        Runtimes::new(
            self.javascript.clone(),
            self.typescript.clone(),
            self.python.clone(),
        )
    }
}

/// Creates a test App with scripted runtimes. Runtimes are still starting.
pub fn test_app_with(runtimes: &TestRuntimes) -> App {
    let config = ResolvedConfig {
        default_mode: Mode::JavaScript,
        ..ResolvedConfig::default()
    };
    App::new(runtimes.runtimes(), &config)
}

/// Creates a test App with scripted runtimes that have already reported ready.
pub fn ready_app() -> (App, TestRuntimes) {
    let runtimes = TestRuntimes::new();
    let mut app = test_app_with(&runtimes);
    app.mark_runtimes_ready(Vec::new());
    (app, runtimes)
}
