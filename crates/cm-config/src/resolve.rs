//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variable → XDG path → defaults.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::config::ClientConfig;
use crate::validate::{validate_config, ValidationError, ValidationResult};

/// Where the configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable holding an explicit config file path.
pub const ENV_CONFIG_PATH: &str = "CONTACTS_CONFIG";

/// Standard config file name.
const CONFIG_FILENAME: &str = "config.json";

/// Application name for XDG directories.
const APP_NAME: &str = "contact-manager";

/// A validated configuration plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ClientConfig,
    pub source: ConfigSource,
    /// Path to the config file, or None if using defaults.
    pub path: Option<PathBuf>,
    /// SHA-256 of the file contents, or None if using defaults.
    pub hash: Option<String>,
}

/// Resolve the config file path using the standard resolution order.
///
/// An explicit CLI path is returned even when it does not exist so that the
/// caller reports the missing file instead of silently using defaults.
pub fn resolve_config_path(cli_path: Option<&Path>) -> (Option<PathBuf>, ConfigSource) {
    // 1. CLI argument
    if let Some(path) = cli_path {
        return (Some(path.to_path_buf()), ConfigSource::CliArgument);
    }

    // 2. Environment variable
    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    // 3. XDG config directory
    let xdg_dir = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::config_dir);
    if let Some(dir) = xdg_dir {
        let path = dir.join(APP_NAME).join(CONFIG_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::XdgConfig);
        }
    }

    // 4. Built-in defaults
    (None, ConfigSource::BuiltinDefault)
}

/// Resolve, read, parse, and validate the configuration.
pub fn load_config(cli_path: Option<&Path>) -> ValidationResult<LoadedConfig> {
    let (path, source) = resolve_config_path(cli_path);

    let Some(path) = path else {
        return Ok(LoadedConfig {
            config: ClientConfig::default(),
            source,
            path: None,
            hash: None,
        });
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| ValidationError::IoError(format!("{}: {}", path.display(), e)))?;
    let config = ClientConfig::from_json(&content)
        .map_err(|e| ValidationError::ParseError(format!("{}: {}", path.display(), e)))?;
    validate_config(&config)?;

    Ok(LoadedConfig {
        config,
        source,
        hash: Some(compute_sha256(&content)),
        path: Some(path),
    })
}

/// Compute SHA-256 hash of a string.
fn compute_sha256(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
