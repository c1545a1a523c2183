//! Add/edit form document model.
//!
//! Mirrors the state a browser keeps for the contact form: input values,
//! tag checkboxes, per-field error messages, and the heading text.

use serde::Serialize;
use std::collections::BTreeMap;

/// Name of the ad hoc tag text input. It is never submitted as a tag.
pub const ADD_TAG_FIELD: &str = "add_tag";

/// Name shared by every tag checkbox.
pub const TAG_CHECKBOX_NAME: &str = "tags";

/// Heading shown while adding a contact.
pub const ADD_HEADING: &str = "Add Contact";

/// Heading shown while editing a contact.
pub const EDIT_HEADING: &str = "Edit Contact";

/// Text inputs of the contact form, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    FullName,
    PhoneNumber,
    Email,
}

impl FieldName {
    /// All fields in document order.
    pub const ALL: [FieldName; 3] = [
        FieldName::FullName,
        FieldName::PhoneNumber,
        FieldName::Email,
    ];

    /// Submitted form field name.
    pub fn name(self) -> &'static str {
        match self {
            FieldName::FullName => "full_name",
            FieldName::PhoneNumber => "phone_number",
            FieldName::Email => "email",
        }
    }

    /// Element id of the input.
    pub fn input_id(self) -> &'static str {
        match self {
            FieldName::FullName => "full_name",
            FieldName::PhoneNumber => "phone",
            FieldName::Email => "email",
        }
    }

    /// Text of the input's label.
    pub fn label(self) -> &'static str {
        match self {
            FieldName::FullName => "Full Name",
            FieldName::PhoneNumber => "Phone Number",
            FieldName::Email => "Email",
        }
    }

    /// HTML input type.
    pub fn input_type(self) -> &'static str {
        match self {
            FieldName::FullName => "text",
            FieldName::PhoneNumber => "tel",
            FieldName::Email => "email",
        }
    }

    /// Look a field up by its submitted name or element id.
    pub fn from_name(name: &str) -> Option<FieldName> {
        FieldName::ALL
            .into_iter()
            .find(|f| f.name() == name || f.input_id() == name)
    }
}

/// One checkbox of the tag checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCheckbox {
    pub value: String,
    pub checked: bool,
}

/// State of the add/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    heading: String,
    values: BTreeMap<FieldName, String>,
    add_tag: String,
    tag_boxes: Vec<TagCheckbox>,
    errors: BTreeMap<FieldName, String>,
}

impl Default for FormView {
    fn default() -> Self {
        Self::new()
    }
}

impl FormView {
    pub fn new() -> Self {
        Self {
            heading: ADD_HEADING.to_string(),
            values: BTreeMap::new(),
            add_tag: String::new(),
            tag_boxes: Vec::new(),
            errors: BTreeMap::new(),
        }
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn set_heading(&mut self, heading: impl Into<String>) {
        self.heading = heading.into();
    }

    /// Current value of a text input.
    pub fn value(&self, field: FieldName) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Store a text input's value.
    ///
    /// The email input sanitizes like `<input type="email">`: newlines are
    /// removed, then leading and trailing ASCII whitespace.
    pub fn set_value(&mut self, field: FieldName, value: impl Into<String>) {
        let value = value.into();
        let value = match field {
            FieldName::Email => sanitize_email(&value),
            FieldName::FullName | FieldName::PhoneNumber => value,
        };
        self.values.insert(field, value);
    }

    /// Current value of the ad hoc tag input.
    pub fn add_tag_value(&self) -> &str {
        &self.add_tag
    }

    pub fn set_add_tag_value(&mut self, value: impl Into<String>) {
        self.add_tag = value.into();
    }

    pub fn tag_boxes(&self) -> &[TagCheckbox] {
        &self.tag_boxes
    }

    /// Replace the checklist with one unchecked box per tag.
    pub fn replace_tag_boxes(&mut self, tags: &[String]) {
        self.tag_boxes = tags
            .iter()
            .map(|t| TagCheckbox {
                value: t.clone(),
                checked: false,
            })
            .collect();
    }

    /// Set the checked state of every box with the given value.
    ///
    /// Returns false when no box carries that value.
    pub fn set_tag_checked(&mut self, value: &str, checked: bool) -> bool {
        let mut found = false;
        for tag_box in self.tag_boxes.iter_mut().filter(|b| b.value == value) {
            tag_box.checked = checked;
            found = true;
        }
        found
    }

    /// Values of the checked boxes in document order.
    pub fn checked_tags(&self) -> Vec<&str> {
        self.tag_boxes
            .iter()
            .filter(|b| b.checked)
            .map(|b| b.value.as_str())
            .collect()
    }

    pub fn error(&self, field: FieldName) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<FieldName, String> {
        &self.errors
    }

    pub fn set_error(&mut self, field: FieldName, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Restore default values: empty inputs and unchecked boxes.
    ///
    /// Like a browser form reset this leaves error messages and the heading alone.
    pub fn reset(&mut self) {
        self.values.clear();
        self.add_tag.clear();
        for tag_box in &mut self.tag_boxes {
            tag_box.checked = false;
        }
    }

    /// Submittable `(name, value)` entries in document order.
    ///
    /// Unchecked boxes are not submitted; the ad hoc tag input is.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = FieldName::ALL
            .iter()
            .map(|f| (f.name().to_string(), self.value(*f).to_string()))
            .collect();
        for value in self.checked_tags() {
            entries.push((TAG_CHECKBOX_NAME.to_string(), value.to_string()));
        }
        entries.push((ADD_TAG_FIELD.to_string(), self.add_tag.clone()));
        entries
    }
}

fn sanitize_email(value: &str) -> String {
    let without_newlines: String = value.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
    without_newlines
        .trim_matches(|c: char| c.is_ascii_whitespace())
        .to_string()
}
