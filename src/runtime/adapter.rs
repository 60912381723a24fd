use std::fmt;

use async_trait::async_trait;

use crate::core::output::OutputSink;

/// Errors raised by runtime adapters and transpilers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Start-up probe failed. The adapter stays unusable for this session.
    Unavailable(String),
    /// The runtime process could not be started or talked to.
    Spawn(String),
    /// User code ran and raised; carries the runtime's own error text.
    Failed(String),
    /// Source was rejected by the transpiler. Nothing was executed.
    Transpile(String),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::Unavailable(msg) => write!(f, "runtime unavailable: {msg}"),
            RuntimeError::Spawn(msg) => write!(f, "could not start runtime: {msg}"),
            RuntimeError::Failed(msg) => f.write_str(msg),
            RuntimeError::Transpile(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for RuntimeError {}

/// A language runtime the controller can hand source text to.
///
/// `ready` is awaited once at start-up; `execute` is synchronous and blocks
/// the caller for as long as the user's program runs.
#[async_trait]
pub trait RuntimeAdapter: Send + Sync {
    /// Returns the name of the runtime (for logs).
    fn name(&self) -> &str;

    /// Resolves once the runtime can accept work. Repeated calls return the
    /// cached result of the first bootstrap.
    async fn ready(&self) -> Result<(), RuntimeError>;

    /// Execute `source`, writing everything it prints into `sink`.
    ///
    /// Output printed before a failure stays in the sink.
    fn execute(&self, source: &str, sink: &mut OutputSink) -> Result<(), RuntimeError>;
}

/// Source-to-source translation into something a [`RuntimeAdapter`] runs.
#[async_trait]
pub trait Transpiler: Send + Sync {
    fn name(&self) -> &str;

    async fn ready(&self) -> Result<(), RuntimeError>;

    /// Translate `source`. Pure: no output, no side effects on failure.
    fn transpile(&self, source: &str) -> Result<String, RuntimeError>;
}
