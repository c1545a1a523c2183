//! User events and the identity of the element they fired on.
//!
//! The router keys on the same ids and classes the rendered page exposes,
//! so an event built here is interchangeable with one lifted from the DOM.

use cm_common::ContactId;
use cm_view::form::{ADD_TAG_FIELD, TAG_CHECKBOX_NAME};
use cm_view::FieldName;

pub const ADD_CONTACT_CLASS: &str = "add_contact_button";
pub const CONTACT_TAG_CLASS: &str = "contact_tag";
pub const EDIT_ID: &str = "edit";
pub const DELETE_ID: &str = "delete";
pub const ADD_TAG_BUTTON_ID: &str = "add_tag_button";
pub const CANCEL_BUTTON_ID: &str = "cancel_button";
pub const CLEAR_FILTER_BUTTON_ID: &str = "clear_filter_button";
pub const SEARCH_ID: &str = "search";

/// The element an event targeted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// `name` attribute of an input.
    pub name: Option<String>,
    /// Text content.
    pub text: String,
    /// Current value of an input.
    pub value: String,
    /// Checked state of a checkbox.
    pub checked: bool,
    /// `data-id` of the enclosing `.contact_container`.
    pub container_id: Option<ContactId>,
    /// Value of the input immediately before this element.
    pub sibling_value: Option<String>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Self::default()
        }
    }

    pub fn with_class(class: &str) -> Self {
        Self {
            classes: vec![class.to_string()],
            ..Self::default()
        }
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn in_container(mut self, id: ContactId) -> Self {
        self.container_id = Some(id);
        self
    }

    pub fn after_input(mut self, value: impl Into<String>) -> Self {
        self.sibling_value = Some(value.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

/// Events the router understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Click(Element),
    Keyup(Element),
    /// An input's value or checked state changed.
    Input(Element),
    /// The contact form was submitted.
    Submit,
}

impl UiEvent {
    pub fn click_add_contact() -> Self {
        UiEvent::Click(Element::with_class(ADD_CONTACT_CLASS).text("Add Contact"))
    }

    pub fn click_edit(id: ContactId) -> Self {
        UiEvent::Click(Element::with_id(EDIT_ID).text("Edit").in_container(id))
    }

    pub fn click_delete(id: ContactId) -> Self {
        UiEvent::Click(Element::with_id(DELETE_ID).text("Delete").in_container(id))
    }

    /// Click on a tag link in a contact row.
    pub fn click_tag(tag: &str) -> Self {
        UiEvent::Click(Element::with_class(CONTACT_TAG_CLASS).text(tag))
    }

    /// Click "Add tag" with `value` typed into the input before it.
    pub fn click_add_tag(value: &str) -> Self {
        UiEvent::Click(
            Element::with_id(ADD_TAG_BUTTON_ID)
                .text("Add tag")
                .after_input(value),
        )
    }

    pub fn click_cancel() -> Self {
        UiEvent::Click(Element::with_id(CANCEL_BUTTON_ID).text("Cancel"))
    }

    pub fn click_clear_filter() -> Self {
        UiEvent::Click(Element::with_id(CLEAR_FILTER_BUTTON_ID).text("Clear filter"))
    }

    /// Key released in the search bar after typing `term`.
    pub fn search(term: &str) -> Self {
        UiEvent::Keyup(Element::with_id(SEARCH_ID).value(term))
    }

    pub fn input(field: FieldName, value: &str) -> Self {
        let mut element = Element::with_name(field.name()).value(value);
        element.id = Some(field.input_id().to_string());
        UiEvent::Input(element)
    }

    pub fn input_add_tag(value: &str) -> Self {
        UiEvent::Input(Element::with_name(ADD_TAG_FIELD).value(value))
    }

    pub fn toggle_tag(tag: &str, checked: bool) -> Self {
        UiEvent::Input(
            Element::with_name(TAG_CHECKBOX_NAME)
                .value(tag)
                .checked(checked),
        )
    }

    pub fn submit() -> Self {
        UiEvent::Submit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_match_document_contract() {
        match UiEvent::click_edit(ContactId(3)) {
            UiEvent::Click(el) => {
                assert!(el.is("edit"));
                assert_eq!(el.container_id, Some(ContactId(3)));
            }
            other => panic!("unexpected {other:?}"),
        }
        match UiEvent::click_tag("vip") {
            UiEvent::Click(el) => {
                assert!(el.has_class("contact_tag"));
                assert_eq!(el.text, "vip");
            }
            other => panic!("unexpected {other:?}"),
        }
        match UiEvent::input(FieldName::PhoneNumber, "555") {
            UiEvent::Input(el) => {
                assert_eq!(el.name.as_deref(), Some("phone_number"));
                assert!(el.is("phone"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
