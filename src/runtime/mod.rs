//! # Runtime Adapters
//!
//! One adapter per executable mode, behind a uniform contract:
//!
//! ```text
//! JavaScript ── RuntimeAdapter (node)
//! TypeScript ── Transpiler (esbuild) ──► JavaScript adapter
//! Python     ── RuntimeAdapter (python3)
//! HtmlCss    ── (no runtime; rendered by the controller)
//! ```
//!
//! Adapters are built once at start-up, readied once, and shared for the
//! whole session.

pub mod adapter;
pub mod process;
pub mod transpile;

use std::sync::Arc;

use log::{info, warn};

use crate::core::config::ResolvedConfig;
use crate::core::mode::Mode;

pub use adapter::{RuntimeAdapter, RuntimeError, Transpiler};
pub use process::{CommandSpec, ErrorFormat, ProcessRuntime};
pub use transpile::CommandTranspiler;

/// Readiness outcome for one mode.
pub type Readiness = Vec<(Mode, Result<(), RuntimeError>)>;

#[derive(Clone)]
pub struct Runtimes {
    pub javascript: Arc<dyn RuntimeAdapter>,
    pub typescript: Arc<dyn Transpiler>,
    pub python: Arc<dyn RuntimeAdapter>,
}

impl Runtimes {
    pub fn new(
        javascript: Arc<dyn RuntimeAdapter>,
        typescript: Arc<dyn Transpiler>,
        python: Arc<dyn RuntimeAdapter>,
    ) -> Self {
        Self {
            javascript,
            typescript,
            python,
        }
    }

    /// Build the process-backed adapters named in the resolved config.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        info!(
            "Runtimes: javascript=`{}` typescript=`{}` python=`{}`",
            config.javascript, config.transpiler, config.python
        );
        Self::new(
            Arc::new(
                ProcessRuntime::new("javascript", config.javascript.clone())
                    .with_error_format(ErrorFormat::NodeException),
            ),
            Arc::new(CommandTranspiler::new(config.transpiler.clone())),
            Arc::new(ProcessRuntime::new("python", config.python.clone())),
        )
    }

    /// Await every adapter's bootstrap and report readiness per executable mode.
    ///
    /// TypeScript needs both its transpiler and the JavaScript runtime.
    pub async fn ready_all(&self) -> Readiness {
        let (js, ts, py) = futures::join!(
            self.javascript.ready(),
            self.typescript.ready(),
            self.python.ready()
        );

        let ts = match (ts, &js) {
            (Err(e), _) => Err(e),
            (Ok(()), Err(e)) => Err(e.clone()),
            (Ok(()), Ok(())) => Ok(()),
        };

        let readiness = vec![(Mode::JavaScript, js), (Mode::TypeScript, ts), (Mode::Python, py)];
        for (mode, result) in &readiness {
            if let Err(e) = result {
                warn!("{} runtime not available: {}", mode, e);
            }
        }
        readiness
    }
}
