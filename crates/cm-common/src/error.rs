//! Error types for the contact manager.
//!
//! Every failure the client can report is one [`Error`] variant. Each variant
//! carries a numeric code that never changes meaning, a category, a flag
//! saying whether retrying can help, and a one-line fix for people.
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Backend Unreachable
//!   Reason: request to http://localhost:3000/api/contacts failed: connection refused
//!   Fix: Check that the contacts backend is running and that --api-url points at it.
//! ```
//!
//! # Machine-Facing Output
//!
//! ```json
//! {
//!   "code": 21,
//!   "category": "api",
//!   "message": "backend returned HTTP 500 for http://localhost:3000/api/contacts",
//!   "recoverable": true,
//!   "context": { "status": 500 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::contact::ContactId;

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse grouping of error codes; exit codes are derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file and pattern errors.
    Config,
    /// Backend transport and response errors.
    Api,
    /// Form constraint failures.
    Validation,
    /// Lookups against the in-memory collection.
    Lookup,
    /// User-gated actions.
    Action,
    /// Local files and JSON encoding.
    Io,
    /// Template rendering errors.
    Render,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Api => write!(f, "api"),
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Lookup => write!(f, "lookup"),
            ErrorCategory::Action => write!(f, "action"),
            ErrorCategory::Io => write!(f, "io"),
            ErrorCategory::Render => write!(f, "render"),
        }
    }
}

/// Unified error type for the contact manager.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // API errors (20-29)
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("backend returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("could not decode contact list: {0}")]
    Decode(String),

    // Validation errors (30-39)
    #[error("form has invalid fields: {}", fields.join(", "))]
    FormInvalid { fields: Vec<String> },

    // Lookup errors (40-49)
    #[error("contact {id} not found")]
    ContactNotFound { id: ContactId },

    // Action errors (50-59)
    #[error("deletion of contact {id} was not confirmed")]
    DeleteDeclined { id: ContactId },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Render errors (70-79)
    #[error("template error: {0}")]
    Template(String),
}

impl Error {
    /// Stable numeric code.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: API errors
    /// - 30-39: Validation errors
    /// - 40-49: Lookup errors
    /// - 50-59: Action errors
    /// - 60-69: I/O errors
    /// - 70-79: Render errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidConfig(_) => 11,
            Error::InvalidPattern { .. } => 12,
            Error::Transport { .. } => 20,
            Error::HttpStatus { .. } => 21,
            Error::Decode(_) => 22,
            Error::FormInvalid { .. } => 30,
            Error::ContactNotFound { .. } => 40,
            Error::DeleteDeclined { .. } => 50,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::Template(_) => 70,
        }
    }

    /// Category the code belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) | Error::InvalidPattern { .. } => {
                ErrorCategory::Config
            }
            Error::Transport { .. } | Error::HttpStatus { .. } | Error::Decode(_) => {
                ErrorCategory::Api
            }
            Error::FormInvalid { .. } => ErrorCategory::Validation,
            Error::ContactNotFound { .. } => ErrorCategory::Lookup,
            Error::DeleteDeclined { .. } => ErrorCategory::Action,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
            Error::Template(_) => ErrorCategory::Render,
        }
    }

    /// Returns whether this error is potentially recoverable by the user.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) | Error::InvalidPattern { .. } => true,

            // Backend may come back; nothing here retries on its own
            Error::Transport { .. } => true,
            Error::HttpStatus { status, .. } => *status >= 500,
            Error::Decode(_) => false,

            Error::FormInvalid { .. } => true,
            Error::ContactNotFound { .. } => false,
            Error::DeleteDeclined { .. } => true,

            Error::Io(_) => true,
            Error::Json(_) => true,

            Error::Template(_) => false,
        }
    }

    /// What a person should try next.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Run 'contacts config validate' to check the configuration file."
            }
            Error::InvalidConfig(_) => {
                "Fix the reported field in config.json, or remove the file to use defaults."
            }
            Error::InvalidPattern { .. } => {
                "Patterns use regular-expression syntax. Escape special characters such as '(' or '['."
            }
            Error::Transport { .. } => {
                "Check that the contacts backend is running and that --api-url points at it."
            }
            Error::HttpStatus { .. } => {
                "The backend rejected the request. Check the backend logs for details."
            }
            Error::Decode(_) => {
                "The backend response is not a JSON array of contacts. Check the configured contacts path."
            }
            Error::FormInvalid { .. } => {
                "Provide a value for every required field in the expected format."
            }
            Error::ContactNotFound { .. } => {
                "The contact is not in the current list. Run 'contacts list' to see available ids."
            }
            Error::DeleteDeclined { .. } => {
                "Answer 'y' at the prompt, or pass --yes to skip confirmation."
            }
            Error::Io(_) => {
                "Check permissions and that the target directory exists. Retry the operation."
            }
            Error::Json(_) => {
                "Invalid JSON. Check syntax with 'jq .' or restore from backup."
            }
            Error::Template(_) => {
                "Internal rendering failure. Please report this as a bug."
            }
        }
    }

    /// Title line for stderr reports.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidConfig(_) => "Invalid Configuration",
            Error::InvalidPattern { .. } => "Invalid Pattern",
            Error::Transport { .. } => "Backend Unreachable",
            Error::HttpStatus { .. } => "Backend Error",
            Error::Decode(_) => "Unexpected Backend Response",
            Error::FormInvalid { .. } => "Invalid Contact",
            Error::ContactNotFound { .. } => "Contact Not Found",
            Error::DeleteDeclined { .. } => "Deletion Cancelled",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
            Error::Template(_) => "Render Error",
        }
    }
}

/// An [`Error`] flattened for `--format json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Category of `code`.
    pub category: ErrorCategory,

    /// The error's `Display` text.
    pub message: String,

    /// Whether retrying may succeed.
    pub recoverable: bool,

    /// Additional structured context (e.g., contact id, HTTP status).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::ContactNotFound { id } | Error::DeleteDeclined { id } => {
                context.insert("contact_id".to_string(), serde_json::json!(id));
            }
            Error::HttpStatus { status, url } => {
                context.insert("status".to_string(), serde_json::json!(status));
                context.insert("url".to_string(), serde_json::json!(url));
            }
            Error::Transport { url, .. } => {
                context.insert("url".to_string(), serde_json::json!(url));
            }
            Error::FormInvalid { fields } => {
                context.insert("fields".to_string(), serde_json::json!(fields));
            }
            Error::InvalidPattern { pattern, .. } => {
                context.insert("pattern".to_string(), serde_json::json!(pattern));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Attach one more key to `context`.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Compact JSON, falling back to a minimal object if encoding fails.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Render an error as the three-line stderr report.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(Error::Config("test".into()).code(), 10);
        assert_eq!(Error::ContactNotFound { id: ContactId(3) }.code(), 40);
        assert_eq!(
            Error::HttpStatus {
                status: 404,
                url: "u".into()
            }
            .code(),
            21
        );
    }

    #[test]
    fn test_error_category() {
        assert_eq!(Error::Config("test".into()).category(), ErrorCategory::Config);
        assert_eq!(
            Error::Transport {
                url: "u".into(),
                reason: "r".into()
            }
            .category(),
            ErrorCategory::Api
        );
        assert_eq!(
            Error::DeleteDeclined { id: ContactId(1) }.category(),
            ErrorCategory::Action
        );
    }

    #[test]
    fn test_error_recoverable() {
        assert!(Error::HttpStatus {
            status: 503,
            url: "u".into()
        }
        .is_recoverable());
        assert!(!Error::HttpStatus {
            status: 400,
            url: "u".into()
        }
        .is_recoverable());
        assert!(!Error::ContactNotFound { id: ContactId(1) }.is_recoverable());
    }

    #[test]
    fn test_form_invalid_message_lists_fields() {
        let err = Error::FormInvalid {
            fields: vec!["full_name".into(), "email".into()],
        };
        assert_eq!(err.to_string(), "form has invalid fields: full_name, email");
    }

    #[test]
    fn test_structured_error_from_error() {
        let err = Error::ContactNotFound { id: ContactId(12) };
        let structured = StructuredError::from(&err);

        assert_eq!(structured.code, 40);
        assert_eq!(structured.category, ErrorCategory::Lookup);
        assert!(!structured.recoverable);
        assert_eq!(
            structured.context.get("contact_id"),
            Some(&serde_json::json!(12))
        );
    }

    #[test]
    fn test_structured_error_json() {
        let err = Error::HttpStatus {
            status: 500,
            url: "http://localhost/api/contacts".into(),
        };
        let json = StructuredError::from(&err).with_context("attempt", 1).to_json();

        assert!(json.contains(r#""code":21"#));
        assert!(json.contains(r#""category":"api""#));
        assert!(json.contains(r#""recoverable":true"#));
        assert!(json.contains(r#""attempt":1"#));
    }

    #[test]
    fn test_format_error_human() {
        let err = Error::DeleteDeclined { id: ContactId(4) };
        let formatted = format_error_human(&err, false);

        assert!(formatted.contains("Deletion Cancelled"));
        assert!(formatted.contains("deletion of contact 4 was not confirmed"));
        assert!(formatted.contains("--yes"));
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::Render.to_string(), "render");
    }
}
