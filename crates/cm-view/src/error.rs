//! Error types for UI rendering.

use thiserror::Error;

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, ViewError>;

/// Errors that can occur while rendering the document.
#[derive(Error, Debug)]
pub enum ViewError {
    /// Template rendering error.
    #[error("template error: {0}")]
    TemplateError(String),
}

impl From<askama::Error> for ViewError {
    fn from(err: askama::Error) -> Self {
        ViewError::TemplateError(err.to_string())
    }
}

impl From<ViewError> for cm_common::Error {
    fn from(err: ViewError) -> Self {
        match err {
            ViewError::TemplateError(msg) => cm_common::Error::Template(msg),
        }
    }
}
