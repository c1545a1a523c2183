//! Configuration validation errors and semantic validation.

use regex::Regex;
use thiserror::Error;

use crate::config::ClientConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate a client configuration semantically.
pub fn validate_config(config: &ClientConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    let base = &config.api.base_url;
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(ValidationError::InvalidValue {
            field: "api.base_url".to_string(),
            message: format!("must start with http:// or https://, got '{}'", base),
        });
    }

    if !config.api.contacts_path.starts_with('/') {
        return Err(ValidationError::InvalidValue {
            field: "api.contacts_path".to_string(),
            message: format!("must start with '/', got '{}'", config.api.contacts_path),
        });
    }

    if config.api.timeout_secs == Some(0) {
        return Err(ValidationError::InvalidValue {
            field: "api.timeout_secs".to_string(),
            message: "must be positive; omit it to disable the timeout".to_string(),
        });
    }

    if let Some(ref pattern) = config.form.phone_pattern {
        // Same anchoring the form applies at validation time
        Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| ValidationError::InvalidValue {
            field: "form.phone_pattern".to_string(),
            message: e.to_string(),
        })?;
    }

    if config.view.title.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "view.title".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    Ok(())
}
