//! Where the log level and format come from.
//!
//! `CM_LOG` and `CM_LOG_FORMAT` set the baseline; `-v`/`-q` on the command
//! line override it. `RUST_LOG`, when set, replaces the filter outright.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Environment variable selecting the log level.
pub const ENV_LOG_LEVEL: &str = "CM_LOG";

/// Environment variable selecting the log format.
pub const ENV_LOG_FORMAT: &str = "CM_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Plain lines on stderr.
    #[default]
    Human,
    /// One JSON object per event on stderr.
    Jsonl,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Human => "human",
            LogFormat::Jsonl => "jsonl",
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s.trim().to_ascii_lowercase().as_str() {
            "human" | "text" | "pretty" => LogFormat::Human,
            "jsonl" | "json" => LogFormat::Jsonl,
            other => return Err(format!("log format '{}' is not human or jsonl", other)),
        };
        Ok(format)
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum severity that reaches stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    /// Level implied by the `-v` count and `-q` flag; `None` when neither is given.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Option<Self> {
        match (quiet, verbose) {
            (true, _) => Some(LogLevel::Error),
            (false, 0) => None,
            (false, 1) => Some(LogLevel::Info),
            (false, 2) => Some(LogLevel::Debug),
            (false, _) => Some(LogLevel::Trace),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let alias = match wanted.as_str() {
            "warning" => "warn",
            "none" | "quiet" => "off",
            other => other,
        };
        [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
            LogLevel::Off,
        ]
        .into_iter()
        .find(|level| level.as_str() == alias)
        .ok_or_else(|| format!("log level '{}' is not recognised", s))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Prefix human lines with a timestamp.
    pub timestamps: bool,
    /// Allow ANSI colour when stderr is a terminal.
    pub color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::default(),
            timestamps: true,
            color: true,
        }
    }
}

impl LogConfig {
    /// Read the environment, then apply whatever the command line asked for.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        let level = std::env::var(ENV_LOG_LEVEL).ok();
        let format = std::env::var(ENV_LOG_FORMAT).ok();
        Self::from_vars(level.as_deref(), format.as_deref(), cli_level, cli_format)
    }

    /// Same as [`from_env`](Self::from_env) with the variables passed in.
    ///
    /// Values that do not parse are ignored rather than rejected.
    pub fn from_vars(
        env_level: Option<&str>,
        env_format: Option<&str>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            level: cli_level
                .or_else(|| env_level.and_then(|v| v.parse().ok()))
                .unwrap_or(defaults.level),
            format: cli_format
                .or_else(|| env_format.and_then(|v| v.parse().ok()))
                .unwrap_or(defaults.format),
            ..defaults
        }
    }

    pub fn with_format(self, format: LogFormat) -> Self {
        Self { format, ..self }
    }

    pub fn with_level(self, level: LogLevel) -> Self {
        Self { level, ..self }
    }

    pub fn with_timestamps(self, timestamps: bool) -> Self {
        Self { timestamps, ..self }
    }

    pub fn with_color(self, color: bool) -> Self {
        Self { color, ..self }
    }
}
