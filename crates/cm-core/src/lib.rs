//! Contact manager client library.
//!
//! This crate provides:
//! - Backend access behind the [`ContactsApi`] trait, with an HTTP implementation
//! - The contact collection and its lookups
//! - The working tag list
//! - Form mode, field constraints, and submission payloads
//! - The event router tying them to the headless UI
//! - Logging setup and CLI exit codes

pub mod api;
pub mod app;
pub mod contacts;
pub mod exit_codes;
pub mod form;
pub mod logging;
pub mod output;
pub mod tags;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use api::{ContactsApi, HttpApi, Payload};
pub use app::{App, AssumeYes, Confirm, Element, Outcome, PromptConfirm, UiEvent};
pub use contacts::{ContactManager, ContactQuery, QueryResult};
pub use form::{FormManager, FormMode, Submission, Validity};
pub use tags::TagManager;
