//! Headless UI for the contact manager.
//!
//! The UI owns no business logic. It keeps a document model of the page
//! (which panel is visible, the contact rows, the filter message, and the
//! add/edit form) and renders it to HTML through askama templates.
//!
//! # Document contract
//!
//! Rendered pages expose the element ids and classes the event router keys on:
//! `#contacts_display`, `#contact_form_display`, `.add_contact_button`, `form`,
//! `#add_tag_button`, `#cancel_button`, `#search`, `#filter_message`,
//! `#clear_filter_button`, `.contact_container[data-id]`, `.full_name`,
//! `.phone_number`, `.email`, `.contact_tag`, `#edit`, and `#delete`.
//!
//! # Example
//!
//! ```
//! use cm_common::{Contact, ContactId};
//! use cm_view::{Panel, Ui};
//!
//! let mut ui = Ui::new();
//! let ann = Contact {
//!     id: ContactId(1),
//!     full_name: "Ann".into(),
//!     phone_number: "555".into(),
//!     email: "a@x.com".into(),
//!     tags: vec!["friend".into()],
//! };
//! ui.render_contacts(&[ann], None);
//! assert_eq!(ui.visible_panel(), Panel::Contacts);
//! assert!(ui.contacts_fragment().unwrap().contains("Ann"));
//! ```

pub mod error;
pub mod form;
pub mod page;
pub mod templates;
pub mod ui;

pub use error::{Result, ViewError};
pub use form::{FieldName, FormView, TagCheckbox};
pub use page::{PageOptions, PageRenderer};
pub use ui::{ContactsContent, Panel, Ui, NO_CONTACTS_MESSAGE};
