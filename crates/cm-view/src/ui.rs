//! The UI component: panel visibility, contact rows, filter message, and form.

use askama::Template;
use cm_common::Contact;
use tracing::debug;

use crate::error::Result;
use crate::form::{FieldName, FormView, ADD_HEADING, EDIT_HEADING};
use crate::templates::{ContactsTemplate, TagsTemplate};

/// Placeholder shown in place of rows when there is nothing to list.
pub const NO_CONTACTS_MESSAGE: &str = "There are no contacts to display.";

/// The two mutually exclusive panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Contacts,
    Form,
}

/// What the contacts panel currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactsContent {
    /// One row per contact.
    Rows(Vec<Contact>),
    /// The "no contacts" placeholder.
    Empty,
}

/// Document model of the page.
#[derive(Debug, Clone)]
pub struct Ui {
    visible: Panel,
    content: ContactsContent,
    filter_message: String,
    filter_visible: bool,
    search: String,
    form: FormView,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui {
    pub fn new() -> Self {
        Self {
            visible: Panel::Contacts,
            content: ContactsContent::Empty,
            filter_message: String::new(),
            filter_visible: false,
            search: String::new(),
            form: FormView::new(),
        }
    }

    pub fn visible_panel(&self) -> Panel {
        self.visible
    }

    pub fn content(&self) -> &ContactsContent {
        &self.content
    }

    /// Contacts currently shown as rows (empty for the placeholder).
    pub fn rows(&self) -> &[Contact] {
        match &self.content {
            ContactsContent::Rows(rows) => rows,
            ContactsContent::Empty => &[],
        }
    }

    /// Filter message text, if it is currently visible.
    pub fn filter_message(&self) -> Option<&str> {
        self.filter_visible.then_some(self.filter_message.as_str())
    }

    pub fn search_value(&self) -> &str {
        &self.search
    }

    pub fn set_search_value(&mut self, value: impl Into<String>) {
        self.search = value.into();
    }

    pub fn form(&self) -> &FormView {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormView {
        &mut self.form
    }

    /// Replace the listed contacts.
    ///
    /// A non-empty list hides any previous filter message, switches to the
    /// contacts panel, and then shows `filter_message` if one is given. An
    /// empty list only swaps in the placeholder; visibility is left as is.
    pub fn render_contacts(&mut self, contacts: &[Contact], filter_message: Option<&str>) {
        if contacts.is_empty() {
            self.content = ContactsContent::Empty;
            debug!("Rendered empty contact list");
            return;
        }

        self.content = ContactsContent::Rows(contacts.to_vec());
        self.filter_visible = false;
        self.show(Panel::Contacts);
        if let Some(message) = filter_message {
            self.filter_message = message.to_string();
            self.filter_visible = true;
        }
        debug!(rows = contacts.len(), filtered = filter_message.is_some(), "Rendered contacts");
    }

    /// Rebuild the tag checklist; every box starts unchecked.
    pub fn render_tags(&mut self, tags: &[String]) {
        self.form.replace_tag_boxes(tags);
    }

    /// Make exactly one panel visible.
    pub fn show(&mut self, panel: Panel) {
        self.visible = panel;
    }

    /// Open the form for adding a contact.
    pub fn display_add_contact(&mut self, tags: &[String]) {
        self.display_form(tags, None);
    }

    /// Open the form, populated from `contact` when editing.
    pub fn display_form(&mut self, tags: &[String], contact: Option<&Contact>) {
        self.render_tags(tags);
        match contact {
            Some(contact) => {
                self.populate_form_inputs(contact);
                self.form.set_heading(EDIT_HEADING);
            }
            None => self.form.set_heading(ADD_HEADING),
        }
        self.show(Panel::Form);
    }

    /// Copy a contact's values into the form and check its tags.
    pub fn populate_form_inputs(&mut self, contact: &Contact) {
        self.form.set_value(FieldName::FullName, contact.full_name.clone());
        self.form.set_value(FieldName::Email, contact.email.clone());
        self.form
            .set_value(FieldName::PhoneNumber, contact.phone_number.clone());
        for tag in &contact.tags {
            self.form.set_tag_checked(tag, true);
        }
    }

    /// Hide the filter message and list every contact again.
    pub fn clear_filter(&mut self, contacts: &[Contact]) {
        self.filter_visible = false;
        self.render_contacts(contacts, None);
    }

    /// Abandon the form and return to the contacts panel.
    pub fn cancel_add_contact(&mut self) {
        self.clear_error_messages();
        self.form.reset();
        self.show(Panel::Contacts);
    }

    pub fn clear_error_messages(&mut self) {
        self.form.clear_errors();
    }

    /// Annotate each invalid field with a message built from its label.
    pub fn render_error_messages(&mut self, invalid: &[FieldName]) {
        for field in invalid {
            let message = format!("Please enter a valid {}.", field.label().to_lowercase());
            self.form.set_error(*field, message);
        }
    }

    pub fn reset_form(&mut self) {
        self.form.reset();
    }

    /// HTML for the inside of the contacts panel.
    pub fn contacts_fragment(&self) -> Result<String> {
        match &self.content {
            ContactsContent::Rows(contacts) => Ok(ContactsTemplate { contacts }.render()?),
            ContactsContent::Empty => Ok(format!("<h1>{}</h1>", NO_CONTACTS_MESSAGE)),
        }
    }

    /// HTML for the tag checklist.
    pub fn tags_fragment(&self) -> Result<String> {
        Ok(TagsTemplate {
            tags: self.form.tag_boxes(),
        }
        .render()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cm_common::ContactId;

    fn contact(id: u64, name: &str, tags: &[&str]) -> Contact {
        Contact {
            id: ContactId(id),
            full_name: name.to_string(),
            phone_number: "555".to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_collection_shows_placeholder() {
        let mut ui = Ui::new();
        ui.render_contacts(&[], None);
        assert_eq!(ui.content(), &ContactsContent::Empty);
        assert!(ui.contacts_fragment().unwrap().contains(NO_CONTACTS_MESSAGE));
    }

    #[test]
    fn test_one_row_per_contact() {
        let mut ui = Ui::new();
        ui.render_contacts(&[contact(1, "Ann", &[]), contact(2, "Bo", &[])], None);
        let html = ui.contacts_fragment().unwrap();
        assert_eq!(html.matches("class=\"contact_container\"").count(), 2);
    }

    #[test]
    fn test_empty_render_keeps_visibility_and_message() {
        let mut ui = Ui::new();
        ui.render_contacts(&[contact(1, "Ann", &["vip"])], Some("Contacts with 'vip' tag:"));
        ui.show(Panel::Form);
        ui.render_contacts(&[], None);
        assert_eq!(ui.visible_panel(), Panel::Form);
        assert_eq!(ui.filter_message(), Some("Contacts with 'vip' tag:"));
    }

    #[test]
    fn test_non_empty_render_switches_panel_and_sets_message() {
        let mut ui = Ui::new();
        ui.show(Panel::Form);
        ui.render_contacts(&[contact(1, "Ann", &["vip"])], Some("Contacts with 'vip' tag:"));
        assert_eq!(ui.visible_panel(), Panel::Contacts);
        assert_eq!(ui.filter_message(), Some("Contacts with 'vip' tag:"));

        ui.render_contacts(&[contact(1, "Ann", &["vip"])], None);
        assert_eq!(ui.filter_message(), None);
    }

    #[test]
    fn test_display_form_for_edit_populates_and_checks() {
        let mut ui = Ui::new();
        let ann = contact(1, "Ann", &["vip"]);
        ui.display_form(&tags(&["friend", "vip"]), Some(&ann));

        assert_eq!(ui.visible_panel(), Panel::Form);
        assert_eq!(ui.form().heading(), EDIT_HEADING);
        assert_eq!(ui.form().value(FieldName::FullName), "Ann");
        assert_eq!(ui.form().value(FieldName::PhoneNumber), "555");
        assert_eq!(ui.form().checked_tags(), vec!["vip"]);
    }

    #[test]
    fn test_display_add_contact_heading() {
        let mut ui = Ui::new();
        ui.display_add_contact(&tags(&["friend"]));
        assert_eq!(ui.form().heading(), ADD_HEADING);
        assert_eq!(ui.form().tag_boxes().len(), 1);
        assert!(ui.form().checked_tags().is_empty());
    }

    #[test]
    fn test_error_messages_use_lowercased_label() {
        let mut ui = Ui::new();
        ui.render_error_messages(&[FieldName::FullName, FieldName::Email]);
        assert_eq!(
            ui.form().error(FieldName::FullName),
            Some("Please enter a valid full name.")
        );
        assert_eq!(
            ui.form().error(FieldName::Email),
            Some("Please enter a valid email.")
        );
        ui.clear_error_messages();
        assert!(ui.form().errors().is_empty());
    }

    #[test]
    fn test_cancel_returns_to_contacts() {
        let mut ui = Ui::new();
        ui.display_add_contact(&[]);
        ui.form_mut().set_value(FieldName::FullName, "draft");
        ui.render_error_messages(&[FieldName::Email]);

        ui.cancel_add_contact();

        assert_eq!(ui.visible_panel(), Panel::Contacts);
        assert_eq!(ui.form().value(FieldName::FullName), "");
        assert!(ui.form().errors().is_empty());
    }

    #[test]
    fn test_clear_filter_lists_everything() {
        let mut ui = Ui::new();
        let all = vec![contact(1, "Ann", &["vip"]), contact(2, "Bo", &[])];
        ui.render_contacts(&all[..1], Some("Contacts with 'vip' tag:"));
        ui.clear_filter(&all);
        assert_eq!(ui.rows().len(), 2);
        assert_eq!(ui.filter_message(), None);
    }
}
