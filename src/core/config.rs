//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.polyglot/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::mode::Mode;
use crate::runtime::CommandSpec;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PolyglotConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub javascript: RuntimeConfig,
    #[serde(default)]
    pub typescript: RuntimeConfig,
    #[serde(default)]
    pub python: RuntimeConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_mode: Option<Mode>,
    pub save_dir: Option<String>,
    pub toast_seconds: Option<u64>,
}

/// How to launch one runtime (or, for TypeScript, the transpiler).
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RuntimeConfig {
    pub command: Option<String>,
    pub args: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PreviewConfig {
    /// Where to export the synthesized preview document after each HTML run.
    pub file: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TOAST_SECONDS: u64 = 3;
pub const DEFAULT_JAVASCRIPT_COMMAND: &str = "node";
pub const DEFAULT_JAVASCRIPT_ARGS: &[&str] = &["-"];
pub const DEFAULT_TRANSPILER_COMMAND: &str = "esbuild";
pub const DEFAULT_TRANSPILER_ARGS: &[&str] = &["--loader=ts", "--log-level=error"];
pub const DEFAULT_PYTHON_COMMAND: &str = "python3";
pub const DEFAULT_PYTHON_ARGS: &[&str] = &["-"];

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub default_mode: Mode,
    pub save_dir: PathBuf,
    pub toast_seconds: u64,
    pub javascript: CommandSpec,
    pub transpiler: CommandSpec,
    pub python: CommandSpec,
    pub preview_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve(&PolyglotConfig::default(), None, None)
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.polyglot/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".polyglot").join("config.toml"))
}

/// Load config from `~/.polyglot/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `PolyglotConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<PolyglotConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(PolyglotConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(PolyglotConfig::default());
    }

    load_config_from(&path)
}

/// Parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<PolyglotConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: PolyglotConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Polyglot Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_mode = "javascript"        # "javascript", "typescript", "python", "htmlcss"
# save_dir = "."                     # Or set POLYGLOT_SAVE_DIR
# toast_seconds = 3

# [javascript]
# command = "node"                   # Or set POLYGLOT_NODE
# args = ["-"]

# [typescript]                       # Transpiler: TypeScript on stdin, JavaScript on stdout
# command = "esbuild"                # Or set POLYGLOT_TRANSPILER
# args = ["--loader=ts", "--log-level=error"]

# [python]
# command = "python3"                # Or set POLYGLOT_PYTHON
# args = ["-"]

# [preview]
# file = "preview.html"              # Export the HTML preview after every run
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_mode` and `cli_save_dir` are from CLI flags (None = not specified).
pub fn resolve(
    config: &PolyglotConfig,
    cli_mode: Option<Mode>,
    cli_save_dir: Option<&Path>,
) -> ResolvedConfig {
    // Mode: CLI → env → config → default
    let default_mode = cli_mode
        .or_else(|| {
            std::env::var("POLYGLOT_MODE").ok().and_then(|key| {
                let mode = Mode::from_key(&key);
                if mode.is_none() {
                    warn!("Ignoring unknown POLYGLOT_MODE value: {}", key);
                }
                mode
            })
        })
        .or(config.general.default_mode)
        .unwrap_or_default();

    // Save directory: CLI → env → config → current directory
    let save_dir = cli_save_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::var("POLYGLOT_SAVE_DIR").ok().map(PathBuf::from))
        .or_else(|| config.general.save_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    ResolvedConfig {
        default_mode,
        save_dir,
        toast_seconds: config
            .general
            .toast_seconds
            .unwrap_or(DEFAULT_TOAST_SECONDS),
        javascript: resolve_command(
            &config.javascript,
            "POLYGLOT_NODE",
            DEFAULT_JAVASCRIPT_COMMAND,
            DEFAULT_JAVASCRIPT_ARGS,
        ),
        transpiler: resolve_command(
            &config.typescript,
            "POLYGLOT_TRANSPILER",
            DEFAULT_TRANSPILER_COMMAND,
            DEFAULT_TRANSPILER_ARGS,
        ),
        python: resolve_command(
            &config.python,
            "POLYGLOT_PYTHON",
            DEFAULT_PYTHON_COMMAND,
            DEFAULT_PYTHON_ARGS,
        ),
        preview_file: config.preview.file.as_ref().map(PathBuf::from),
    }
}

/// Program: env → config → default. Arguments: config → default.
fn resolve_command(
    runtime: &RuntimeConfig,
    env_var: &str,
    default_program: &str,
    default_args: &[&str],
) -> CommandSpec {
    let program = std::env::var(env_var)
        .ok()
        .or_else(|| runtime.command.clone())
        .unwrap_or_else(|| default_program.to_string());

    let args = runtime
        .args
        .clone()
        .unwrap_or_else(|| default_args.iter().map(|a| a.to_string()).collect());

    CommandSpec { program, args }
}
