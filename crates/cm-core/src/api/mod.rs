//! Backend access for the contacts collection.
//!
//! The [`ContactsApi`] trait is the seam between the event router and the
//! network: [`HttpApi`] talks to a real backend, tests substitute an
//! in-memory implementation.

mod http;

pub use http::HttpApi;

use cm_common::{ContactId, RawContact, Result};
use serde::Serialize;

/// Content type of every mutation body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// One request per operation, no retries.
pub trait ContactsApi {
    /// `GET` the whole collection.
    fn list(&self) -> Result<Vec<RawContact>>;

    /// `POST` a new contact.
    fn create(&self, payload: &Payload) -> Result<()>;

    /// `PUT` an existing contact.
    fn update(&self, id: ContactId, payload: &Payload) -> Result<()>;

    /// `DELETE` a contact.
    fn delete(&self, id: ContactId) -> Result<()>;
}

impl<T: ContactsApi + ?Sized> ContactsApi for &T {
    fn list(&self) -> Result<Vec<RawContact>> {
        (**self).list()
    }

    fn create(&self, payload: &Payload) -> Result<()> {
        (**self).create(payload)
    }

    fn update(&self, id: ContactId, payload: &Payload) -> Result<()> {
        (**self).update(id, payload)
    }

    fn delete(&self, id: ContactId) -> Result<()> {
        (**self).delete(id)
    }
}

/// Ordered form body of a create or update request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Payload {
    pairs: Vec<(String, String)>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn keys(&self) -> Vec<&str> {
        self.pairs.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Borrowed pairs in the shape form encoders expect.
    pub fn as_form(&self) -> Vec<(&str, &str)> {
        self.pairs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Payload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = Payload::new();
        for (k, v) in iter {
            payload.append(k, v);
        }
        payload
    }
}
