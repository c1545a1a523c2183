//! Contact manager common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the contact manager crates:
//! - Contact records and their server-side wire shape
//! - Contact identity types
//! - Common error types
//! - Output formats for command payloads

pub mod contact;
pub mod error;
pub mod output;

pub use contact::{split_tags, Contact, ContactId, RawContact};
pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError};
pub use output::OutputFormat;
