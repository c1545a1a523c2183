//! In-memory contact collection and its lookups.

use cm_common::{Contact, ContactId};
use regex::Regex;

/// Criteria accepted by [`ContactManager::filter`].
#[derive(Debug, Clone)]
pub enum ContactQuery {
    /// Contacts carrying exactly this tag (case-sensitive).
    ByTag(String),
    /// The single contact with this id.
    ById(ContactId),
    /// Contacts whose full name matches the pattern anywhere.
    ByNamePattern(Regex),
}

/// Result of a [`ContactQuery`]; an id lookup never yields a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    Many(Vec<Contact>),
    One(Option<Contact>),
}

impl QueryResult {
    /// Flatten into a list, whatever the shape.
    pub fn into_vec(self) -> Vec<Contact> {
        match self {
            QueryResult::Many(contacts) => contacts,
            QueryResult::One(contact) => contact.into_iter().collect(),
        }
    }
}

/// Holds the last collection fetched from the backend.
#[derive(Debug, Clone, Default)]
pub struct ContactManager {
    contacts: Vec<Contact>,
}

impl ContactManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection wholesale.
    pub fn set(&mut self, contacts: Vec<Contact>) {
        self.contacts = contacts;
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Contact behind a row's `data-id`.
    pub fn get_contact(&self, id: ContactId) -> Option<&Contact> {
        self.by_id(id)
    }

    pub fn filter(&self, query: &ContactQuery) -> QueryResult {
        match query {
            ContactQuery::ByTag(tag) => QueryResult::Many(self.by_tag(tag)),
            ContactQuery::ById(id) => QueryResult::One(self.by_id(*id).cloned()),
            ContactQuery::ByNamePattern(pattern) => {
                QueryResult::Many(self.by_name_pattern(pattern))
            }
        }
    }

    pub fn by_tag(&self, tag: &str) -> Vec<Contact> {
        self.contacts
            .iter()
            .filter(|c| c.has_tag(tag))
            .cloned()
            .collect()
    }

    pub fn by_id(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    pub fn by_name_pattern(&self, pattern: &Regex) -> Vec<Contact> {
        self.contacts
            .iter()
            .filter(|c| pattern.is_match(&c.full_name))
            .cloned()
            .collect()
    }
}
