//! # Process Runtime
//!
//! Runs user code through an interpreter executable. The source goes in on
//! stdin, stdout/stderr are captured for that one call and copied into the
//! output sink.
//!
//! Readiness is a `--version` style probe, run once and cached for the rest
//! of the session.

use std::fmt;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::OnceCell;

use super::adapter::{RuntimeAdapter, RuntimeError};
use crate::core::output::OutputSink;

/// Program plus arguments, as resolved from config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Spawn `spec`, pipe `source` into it and wait for it to exit.
pub(crate) fn run_piped(spec: &CommandSpec, source: &str) -> Result<Output, RuntimeError> {
    debug!("Spawning `{}` ({} bytes of source)", spec, source.len());
    let mut child = Command::new(&spec.program)
        .args(&spec.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| RuntimeError::Spawn(format!("{}: {e}", spec.program)))?;

    // Feed stdin from a separate thread so a chatty child can't fill its
    // stdout pipe while we are still writing.
    let writer = child.stdin.take().map(|mut stdin| {
        let source = source.to_owned();
        std::thread::spawn(move || stdin.write_all(source.as_bytes()))
    });

    let output = child
        .wait_with_output()
        .map_err(|e| RuntimeError::Spawn(format!("{}: {e}", spec.program)))?;

    if let Some(handle) = writer {
        match handle.join() {
            Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                warn!("Failed writing source to `{}`: {}", spec.program, e);
            }
            Err(_) => warn!("stdin writer for `{}` panicked", spec.program),
            _ => {}
        }
    }

    Ok(output)
}

/// Error text for a failed child: its stderr, or the exit status when silent.
pub(crate) fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim_end();
    if trimmed.is_empty() {
        format!("process exited with {}", output.status)
    } else {
        trimmed.to_string()
    }
}

/// How a failed interpreter's stderr becomes the error text shown after the
/// mode's marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorFormat {
    /// The whole of stderr. Python tracebacks read fine as they are.
    #[default]
    Stderr,
    /// Node's uncaught-exception report cut down to the thrown error's
    /// `Name: message`, without the source excerpt, stack or version banner.
    NodeException,
}

impl ErrorFormat {
    fn message(self, output: &Output) -> String {
        let full = failure_message(output);
        match self {
            ErrorFormat::Stderr => full,
            ErrorFormat::NodeException => node_exception_message(&full),
        }
    }
}

fn node_exception_message(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().collect();
    let Some(start) = lines.iter().position(|l| is_error_header(l)) else {
        // Thrown non-Error values have no header; drop the banner at least
        let kept: Vec<&str> = lines
            .into_iter()
            .filter(|l| !l.starts_with("Node.js v"))
            .collect();
        return kept.join("\n").trim().to_string();
    };

    let message: Vec<&str> = lines[start..]
        .iter()
        .take_while(|l| !l.trim_start().starts_with("at ") && !l.starts_with("Node.js v"))
        .copied()
        .collect();
    message.join("\n").trim_end().to_string()
}

/// `TypeError: ...`, `Error: ...`, `Error [ERR_X]: ...`
fn is_error_header(line: &str) -> bool {
    let Some(colon) = line.find(": ") else {
        return false;
    };
    let name = line[..colon].split(" [").next().unwrap_or_default();
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && (name.ends_with("Error") || name.ends_with("Exception"))
}

/// Run `program probe_args...` and report whether it exited cleanly.
pub(crate) async fn probe(program: &str, probe_args: &[String]) -> Result<(), String> {
    let output = tokio::process::Command::new(program)
        .args(probe_args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| format!("{program}: {e}"))?;

    if output.status.success() {
        let version = String::from_utf8_lossy(&output.stdout);
        info!("Runtime `{}` ready ({})", program, version.trim());
        Ok(())
    } else {
        Err(format!("{program} probe exited with {}", output.status))
    }
}

pub struct ProcessRuntime {
    name: String,
    command: CommandSpec,
    probe_args: Vec<String>,
    errors: ErrorFormat,
    readiness: OnceCell<Result<(), String>>,
}

impl ProcessRuntime {
    pub fn new(name: impl Into<String>, command: CommandSpec) -> Self {
        Self {
            name: name.into(),
            command,
            probe_args: vec!["--version".to_string()],
            errors: ErrorFormat::default(),
            readiness: OnceCell::new(),
        }
    }

    /// Replace the readiness probe arguments (default `--version`).
    pub fn with_probe_args(mut self, args: &[&str]) -> Self {
        self.probe_args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_error_format(mut self, errors: ErrorFormat) -> Self {
        self.errors = errors;
        self
    }
}

#[async_trait]
impl RuntimeAdapter for ProcessRuntime {
    fn name(&self) -> &str {
        &self.name
    }

    async fn ready(&self) -> Result<(), RuntimeError> {
        self.readiness
            .get_or_init(|| probe(&self.command.program, &self.probe_args))
            .await
            .clone()
            .map_err(RuntimeError::Unavailable)
    }

    fn execute(&self, source: &str, sink: &mut OutputSink) -> Result<(), RuntimeError> {
        let output = run_piped(&self.command, source)?;

        sink.append(&String::from_utf8_lossy(&output.stdout));

        if output.status.success() {
            // Diagnostics printed to stderr by a successful program are output too.
            sink.append(&String::from_utf8_lossy(&output.stderr));
            debug!("`{}` exited cleanly", self.name);
            Ok(())
        } else {
            debug!("`{}` stderr: {}", self.name, String::from_utf8_lossy(&output.stderr));
            let message = self.errors.message(&output);
            Err(RuntimeError::Failed(message))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell() -> ProcessRuntime {
        ProcessRuntime::new("sh", CommandSpec::new("sh", &["-s"])).with_probe_args(&["-c", "true"])
    }

    #[test]
    fn test_execute_captures_stdout() {
        let runtime = ProcessRuntime::new("cat", CommandSpec::new("cat", &[]));
        let mut sink = OutputSink::new();
        runtime.execute("x\n", &mut sink).unwrap();
        assert_eq!(sink.text(), "x\n");
    }

    #[test]
    fn test_failure_keeps_partial_output() {
        let runtime = shell();
        let mut sink = OutputSink::new();
        let err = runtime
            .execute("echo partial\necho boom >&2\nexit 3\n", &mut sink)
            .unwrap_err();
        assert_eq!(sink.text(), "partial\n");
        assert_eq!(err, RuntimeError::Failed("boom".to_string()));
    }

    #[test]
    fn test_silent_failure_reports_status() {
        let runtime = shell();
        let mut sink = OutputSink::new();
        let err = runtime.execute("exit 2\n", &mut sink).unwrap_err();
        match err {
            RuntimeError::Failed(msg) => assert!(msg.contains("exit"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let runtime = ProcessRuntime::new(
            "nope",
            CommandSpec::new("definitely-not-a-real-interpreter-xyz", &[]),
        );
        let mut sink = OutputSink::new();
        let err = runtime.execute("", &mut sink).unwrap_err();
        assert!(matches!(err, RuntimeError::Spawn(_)));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_ready_probe_succeeds_and_is_cached() {
        let runtime = shell();
        assert!(runtime.ready().await.is_ok());
        assert!(runtime.ready().await.is_ok());
    }

    #[tokio::test]
    async fn test_ready_probe_reports_missing_program() {
        let runtime = ProcessRuntime::new(
            "nope",
            CommandSpec::new("definitely-not-a-real-interpreter-xyz", &[]),
        );
        assert!(matches!(runtime.ready().await, Err(RuntimeError::Unavailable(_))));
    }

    const NODE_REFERENCE_ERROR: &str = "[stdin]:2
undefinedVar;
^

ReferenceError: undefinedVar is not defined
    at [stdin]:2:1
    at runScriptInThisContext (node:internal/vm:209:10)
    at node:internal/process/execution:118:14

Node.js v20.20.2";

    #[test]
    fn test_node_report_reduced_to_error_message() {
        assert_eq!(
            node_exception_message(NODE_REFERENCE_ERROR),
            "ReferenceError: undefinedVar is not defined"
        );
    }

    #[test]
    fn test_node_report_keeps_multiline_message_and_error_code() {
        let stderr = "node:internal/modules/cjs/loader:1228
  throw err;
  ^

Error [ERR_MODULE_NOT_FOUND]: Cannot find module 'left-pad'
Require stack:
- [stdin]
    at Module._resolveFilename (node:internal/modules/cjs/loader:1225:15)

Node.js v20.20.2";
        assert_eq!(
            node_exception_message(stderr),
            "Error [ERR_MODULE_NOT_FOUND]: Cannot find module 'left-pad'\nRequire stack:\n- [stdin]"
        );
    }

    #[test]
    fn test_node_report_without_error_header_drops_banner() {
        let stderr = "[stdin]:1\nthrow 'boom'\n^\nboom\n\nNode.js v20.20.2";
        assert_eq!(
            node_exception_message(stderr),
            "[stdin]:1\nthrow 'boom'\n^\nboom"
        );
    }

    #[test]
    fn test_node_format_applied_to_failed_run() {
        let runtime = shell().with_error_format(ErrorFormat::NodeException);
        let mut sink = OutputSink::new();
        let script = format!("echo a\ncat >&2 <<'EOF'\n{NODE_REFERENCE_ERROR}\nEOF\nexit 1\n");
        let err = runtime.execute(&script, &mut sink).unwrap_err();
        assert_eq!(sink.text(), "a\n");
        assert_eq!(
            err,
            RuntimeError::Failed("ReferenceError: undefinedVar is not defined".to_string())
        );
    }

    #[test]
    fn test_command_spec_display() {
        assert_eq!(CommandSpec::new("node", &["-"]).to_string(), "node -");
    }
}
