//! TypeScript → JavaScript through an external transpiler command.
//!
//! The transpiler reads TypeScript on stdin and writes JavaScript on stdout.
//! A non-zero exit is a transpile failure; its stderr is the message.

use async_trait::async_trait;
use log::debug;
use tokio::sync::OnceCell;

use super::adapter::{RuntimeError, Transpiler};
use super::process::{CommandSpec, failure_message, probe, run_piped};

pub struct CommandTranspiler {
    command: CommandSpec,
    probe_args: Vec<String>,
    readiness: OnceCell<Result<(), String>>,
}

impl CommandTranspiler {
    pub fn new(command: CommandSpec) -> Self {
        Self {
            command,
            probe_args: vec!["--version".to_string()],
            readiness: OnceCell::new(),
        }
    }

    pub fn with_probe_args(mut self, args: &[&str]) -> Self {
        self.probe_args = args.iter().map(|a| a.to_string()).collect();
        self
    }
}

#[async_trait]
impl Transpiler for CommandTranspiler {
    fn name(&self) -> &str {
        &self.command.program
    }

    async fn ready(&self) -> Result<(), RuntimeError> {
        self.readiness
            .get_or_init(|| probe(&self.command.program, &self.probe_args))
            .await
            .clone()
            .map_err(RuntimeError::Unavailable)
    }

    fn transpile(&self, source: &str) -> Result<String, RuntimeError> {
        let output = run_piped(&self.command, source).map_err(|e| match e {
            RuntimeError::Spawn(msg) => RuntimeError::Transpile(msg),
            other => other,
        })?;

        if output.status.success() {
            let js = String::from_utf8_lossy(&output.stdout).into_owned();
            debug!("Transpiled {} bytes into {} bytes", source.len(), js.len());
            Ok(js)
        } else {
            Err(RuntimeError::Transpile(failure_message(&output)))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_transpile_returns_stdout() {
        let transpiler = CommandTranspiler::new(CommandSpec::new("cat", &[]));
        assert_eq!(transpiler.transpile("let x = 1;").unwrap(), "let x = 1;");
    }

    #[test]
    fn test_transpile_failure_carries_stderr() {
        let transpiler =
            CommandTranspiler::new(CommandSpec::new("sh", &["-c", "echo 'Expected \";\"' >&2; exit 1"]));
        let err = transpiler.transpile("let x: = ;").unwrap_err();
        assert_eq!(err, RuntimeError::Transpile("Expected \";\"".to_string()));
    }

    #[test]
    fn test_missing_transpiler_is_transpile_error() {
        let transpiler =
            CommandTranspiler::new(CommandSpec::new("definitely-not-a-real-transpiler-xyz", &[]));
        assert!(matches!(
            transpiler.transpile("let x = 1;"),
            Err(RuntimeError::Transpile(_))
        ));
    }
}
