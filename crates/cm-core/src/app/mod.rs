//! Event router wiring the API, the managers, and the UI together.
//!
//! The App holds no business logic of its own. Each [`UiEvent`] is matched on
//! the target element's id or class and handed to the component that owns
//! the behaviour. Mutations always re-fetch the collection afterwards; the
//! local copy is never edited in place.
//!
//! ```text
//!            click .add_contact_button / #edit
//!   Browsing ───────────────────────────────────▶ Form(Adding | Editing(id))
//!       ▲                                                   │
//!       └──── #cancel_button, or a refresh with rows ◀──────┘
//! ```

pub mod confirm;
pub mod events;

pub use confirm::{AssumeYes, Confirm, PromptConfirm};
pub use events::{Element, UiEvent};

use cm_common::{ContactId, Error, Result};
use cm_view::form::{ADD_TAG_FIELD, TAG_CHECKBOX_NAME};
use cm_view::{FieldName, Ui};
use regex::RegexBuilder;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::ContactsApi;
use crate::contacts::{ContactManager, ContactQuery};
use crate::form::{FormManager, FormMode, Submission};
use crate::tags::TagManager;
use events::{
    ADD_CONTACT_CLASS, ADD_TAG_BUTTON_ID, CANCEL_BUTTON_ID, CLEAR_FILTER_BUTTON_ID,
    CONTACT_TAG_CLASS, DELETE_ID, EDIT_ID, SEARCH_ID,
};

/// What handling an event did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// No handler claimed the event.
    Ignored,
    /// The form model changed; nothing was re-rendered.
    Updated,
    /// The contacts panel or tag checklist was re-rendered.
    Rendered,
    /// The form panel was opened.
    FormOpened { mode: FormMode },
    /// The form failed its constraints; these fields were annotated.
    Invalid { fields: Vec<FieldName> },
    /// The form was sent to the backend.
    Submitted { mode: FormMode },
    Deleted { id: ContactId },
    /// The user declined the delete confirmation; nothing was sent.
    Declined { id: ContactId },
    /// The event referred to a contact that is not in the collection.
    NotFound { id: ContactId },
    /// The search term is not a valid pattern; the view is unchanged.
    BadPattern { pattern: String },
}

/// Format of the tag filter message.
pub fn filter_message(tag: &str) -> String {
    format!("Contacts with '{}' tag:", tag)
}

/// Format of the delete confirmation prompt.
pub fn delete_prompt(full_name: &str) -> String {
    format!("Do you really want to delete the contact {}?", full_name)
}

/// Routes user events to the components.
pub struct App<A: ContactsApi, C: Confirm> {
    api: A,
    confirm: C,
    contacts: ContactManager,
    tags: TagManager,
    form: FormManager,
    ui: Ui,
    failures: Vec<Error>,
}

impl<A: ContactsApi, C: Confirm> App<A, C> {
    pub fn new(api: A, confirm: C, form: FormManager) -> Self {
        Self {
            api,
            confirm,
            contacts: ContactManager::new(),
            tags: TagManager::new(),
            form,
            ui: Ui::new(),
            failures: Vec::new(),
        }
    }

    /// Load the collection for the first time.
    pub fn init(&mut self) -> Result<()> {
        info!("Starting contact manager");
        self.refresh()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn contacts(&self) -> &ContactManager {
        &self.contacts
    }

    pub fn tags(&self) -> &TagManager {
        &self.tags
    }

    pub fn form(&self) -> &FormManager {
        &self.form
    }

    pub fn mode(&self) -> FormMode {
        self.form.mode()
    }

    /// Backend failures swallowed since the last call.
    ///
    /// The UI never surfaces these; callers that need to report them can.
    pub fn take_failures(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.failures)
    }

    /// Fetch the collection and re-render it.
    ///
    /// On failure the collection, tags, and view are left untouched.
    pub fn refresh(&mut self) -> Result<()> {
        let raw = self.api.list()?;
        let contacts = TagManager::parse_tags(raw);
        self.contacts.set(contacts);
        self.ui.render_contacts(self.contacts.contacts(), None);
        self.tags.init(self.contacts.contacts());
        info!(count = self.contacts.contacts().len(), "Contacts refreshed");
        Ok(())
    }

    fn refresh_after_mutation(&mut self) {
        if let Err(e) = self.refresh() {
            warn!(error = %e, "Refresh failed; view left unchanged");
            self.failures.push(e);
        }
    }

    fn record(&mut self, action: &str, result: Result<()>) {
        match result {
            Ok(()) => info!(action, "Backend accepted request"),
            Err(e) => {
                warn!(action, error = %e, "Backend request failed");
                self.failures.push(e);
            }
        }
    }

    /// Dispatch one event to its handler.
    pub fn handle(&mut self, event: UiEvent) -> Outcome {
        debug!(?event, "Handling event");
        match event {
            UiEvent::Click(target) => self.handle_click(&target),
            UiEvent::Keyup(target) if target.is(SEARCH_ID) => {
                self.ui.set_search_value(target.value.clone());
                self.search_filter(&target.value)
            }
            UiEvent::Keyup(_) => Outcome::Ignored,
            UiEvent::Input(target) => self.handle_input(&target),
            UiEvent::Submit => self.submit_form(),
        }
    }

    fn handle_click(&mut self, target: &Element) -> Outcome {
        if target.has_class(ADD_CONTACT_CLASS) {
            return self.display_add_contact();
        }
        if target.is(ADD_TAG_BUTTON_ID) {
            let value = target
                .sibling_value
                .clone()
                .unwrap_or_else(|| self.ui.form().add_tag_value().to_string());
            return self.add_tag(&value);
        }
        if target.is(CANCEL_BUTTON_ID) {
            return self.cancel();
        }
        if target.is(CLEAR_FILTER_BUTTON_ID) {
            return self.clear_filter();
        }
        if target.has_class(CONTACT_TAG_CLASS) {
            return self.filter_by_tag(&target.text);
        }
        if target.is(DELETE_ID) || target.is(EDIT_ID) {
            let Some(id) = target.container_id else {
                debug!("Row action outside a contact container");
                return Outcome::Ignored;
            };
            return if target.is(DELETE_ID) {
                self.delete_contact(id)
            } else {
                self.edit_contact(id)
            };
        }
        Outcome::Ignored
    }

    fn handle_input(&mut self, target: &Element) -> Outcome {
        let name = target.name.as_deref().or(target.id.as_deref());
        match name {
            Some(TAG_CHECKBOX_NAME) => {
                if self.ui.form_mut().set_tag_checked(&target.value, target.checked) {
                    Outcome::Updated
                } else {
                    Outcome::Ignored
                }
            }
            Some(ADD_TAG_FIELD) => {
                self.ui.form_mut().set_add_tag_value(target.value.clone());
                Outcome::Updated
            }
            Some(SEARCH_ID) => {
                self.ui.set_search_value(target.value.clone());
                Outcome::Updated
            }
            Some(other) => match FieldName::from_name(other) {
                Some(field) => {
                    self.ui.form_mut().set_value(field, target.value.clone());
                    Outcome::Updated
                }
                None => Outcome::Ignored,
            },
            None => Outcome::Ignored,
        }
    }

    /// Open an empty-headed form for a new contact.
    pub fn display_add_contact(&mut self) -> Outcome {
        self.form.set_mode(FormMode::Adding);
        self.ui.display_add_contact(self.tags.tags());
        Outcome::FormOpened {
            mode: FormMode::Adding,
        }
    }

    /// Open the form populated with contact `id`.
    pub fn edit_contact(&mut self, id: ContactId) -> Outcome {
        let Some(contact) = self.contacts.get_contact(id).cloned() else {
            warn!(%id, "Edit requested for unknown contact");
            return Outcome::NotFound { id };
        };
        let mode = FormMode::Editing(id);
        self.form.set_mode(mode);
        self.ui.display_form(self.tags.tags(), Some(&contact));
        Outcome::FormOpened { mode }
    }

    /// Ask for confirmation, then delete contact `id` and refresh.
    pub fn delete_contact(&mut self, id: ContactId) -> Outcome {
        let Some(full_name) = self.contacts.get_contact(id).map(|c| c.full_name.clone()) else {
            warn!(%id, "Delete requested for unknown contact");
            return Outcome::NotFound { id };
        };
        if !self.confirm.confirm(&delete_prompt(&full_name)) {
            info!(%id, "Delete declined");
            return Outcome::Declined { id };
        }

        let result = self.api.delete(id);
        self.record("delete", result);
        self.refresh_after_mutation();
        Outcome::Deleted { id }
    }

    /// Show only the contacts carrying `tag`, with a filter message.
    pub fn filter_by_tag(&mut self, tag: &str) -> Outcome {
        let filtered = self.contacts.filter(&ContactQuery::ByTag(tag.to_string()));
        self.ui
            .render_contacts(&filtered.into_vec(), Some(&filter_message(tag)));
        Outcome::Rendered
    }

    /// Show contacts whose name matches `term`, ignoring case.
    pub fn search_filter(&mut self, term: &str) -> Outcome {
        let pattern = match RegexBuilder::new(term).case_insensitive(true).build() {
            Ok(pattern) => pattern,
            Err(e) => {
                warn!(pattern = term, error = %e, "Ignoring invalid search pattern");
                return Outcome::BadPattern {
                    pattern: term.to_string(),
                };
            }
        };
        let filtered = self.contacts.filter(&ContactQuery::ByNamePattern(pattern));
        self.ui.render_contacts(&filtered.into_vec(), None);
        Outcome::Rendered
    }

    /// Add an ad hoc tag and rebuild the checklist.
    pub fn add_tag(&mut self, value: &str) -> Outcome {
        self.tags.add_tag(value);
        self.ui.render_tags(self.tags.tags());
        Outcome::Rendered
    }

    pub fn cancel(&mut self) -> Outcome {
        self.ui.cancel_add_contact();
        Outcome::Rendered
    }

    pub fn clear_filter(&mut self) -> Outcome {
        self.ui.clear_filter(self.contacts.contacts());
        Outcome::Rendered
    }

    /// Validate the form and, if it passes, send it.
    pub fn submit_form(&mut self) -> Outcome {
        self.ui.clear_error_messages();

        let invalid = self.form.check_validity(self.ui.form());
        if !invalid.is_empty() {
            self.ui.render_error_messages(&invalid);
            info!(fields = ?invalid, "Form rejected");
            return Outcome::Invalid { fields: invalid };
        }

        let mode = self.form.mode();
        let submission = self.form.prepare_submission(self.ui.form());
        self.send_form_data(submission);
        Outcome::Submitted { mode }
    }

    fn send_form_data(&mut self, submission: Submission) {
        let (action, result) = match &submission {
            Submission::Create(payload) => ("create", self.api.create(payload)),
            Submission::Update(id, payload) => ("update", self.api.update(*id, payload)),
        };
        self.record(action, result);
        self.refresh_after_mutation();
        self.ui.reset_form();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{raw_contact, InMemoryApi, ScriptedConfirm};
    use cm_view::Panel;

    fn app(api: InMemoryApi) -> App<InMemoryApi, ScriptedConfirm> {
        let form = FormManager::new(Some(r"[0-9\(\)+\-. ]+")).unwrap();
        let mut app = App::new(api, ScriptedConfirm::always(true), form);
        app.init().unwrap();
        app
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut app = app(InMemoryApi::new(vec![
            raw_contact(1, "Ann", Some("friend")),
            raw_contact(2, "Bob", None),
        ]));
        assert_eq!(app.handle(UiEvent::search("aNN")), Outcome::Rendered);
        assert_eq!(app.ui().rows().len(), 1);
        assert_eq!(app.ui().search_value(), "aNN");
        assert_eq!(app.ui().filter_message(), None);
    }

    #[test]
    fn test_bad_search_pattern_leaves_view() {
        let mut app = app(InMemoryApi::new(vec![raw_contact(1, "Ann", None)]));
        let outcome = app.handle(UiEvent::search("("));
        assert!(matches!(outcome, Outcome::BadPattern { .. }));
        assert_eq!(app.ui().rows().len(), 1);
    }

    #[test]
    fn test_unknown_keyup_and_click_ignored() {
        let mut app = app(InMemoryApi::new(vec![]));
        assert_eq!(
            app.handle(UiEvent::Keyup(Element::with_id("other"))),
            Outcome::Ignored
        );
        assert_eq!(
            app.handle(UiEvent::Click(Element::with_class("nothing"))),
            Outcome::Ignored
        );
        assert_eq!(
            app.handle(UiEvent::Click(Element::with_id("edit"))),
            Outcome::Ignored
        );
    }

    #[test]
    fn test_edit_unknown_contact() {
        let mut app = app(InMemoryApi::new(vec![raw_contact(1, "Ann", None)]));
        assert_eq!(
            app.handle(UiEvent::click_edit(ContactId(42))),
            Outcome::NotFound { id: ContactId(42) }
        );
        assert_eq!(app.ui().visible_panel(), Panel::Contacts);
        assert_eq!(app.mode(), FormMode::Adding);
    }

    #[test]
    fn test_input_events_update_form() {
        let mut app = app(InMemoryApi::new(vec![raw_contact(1, "Ann", Some("vip"))]));
        app.handle(UiEvent::click_add_contact());
        assert_eq!(
            app.handle(UiEvent::input(FieldName::Email, "z@x.com")),
            Outcome::Updated
        );
        assert_eq!(app.handle(UiEvent::toggle_tag("vip", true)), Outcome::Updated);
        assert_eq!(app.handle(UiEvent::toggle_tag("nope", true)), Outcome::Ignored);
        assert_eq!(app.ui().form().value(FieldName::Email), "z@x.com");
        assert_eq!(app.ui().form().checked_tags(), vec!["vip"]);
    }

    #[test]
    fn test_add_tag_uses_sibling_value() {
        let mut app = app(InMemoryApi::new(vec![raw_contact(1, "Ann", Some("vip"))]));
        app.handle(UiEvent::click_add_contact());
        app.handle(UiEvent::click_add_tag("family"));
        let boxes: Vec<_> = app
            .ui()
            .form()
            .tag_boxes()
            .iter()
            .map(|b| b.value.clone())
            .collect();
        assert_eq!(boxes, vec!["vip", "family"]);
    }

    #[test]
    fn test_prompt_text() {
        assert_eq!(
            delete_prompt("Ann"),
            "Do you really want to delete the contact Ann?"
        );
        assert_eq!(filter_message("vip"), "Contacts with 'vip' tag:");
    }
}
