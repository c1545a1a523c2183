//! Test doubles for driving the [`App`](crate::app::App) without a network.
//!
//! Available to unit tests and, through the `test-utils` feature, to
//! integration tests.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use cm_common::{ContactId, Error, RawContact, Result};

use crate::api::{ContactsApi, Payload};
use crate::app::Confirm;

/// A request as the fake backend saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    List,
    Create(Payload),
    Update(ContactId, Payload),
    Delete(ContactId),
}

impl RecordedRequest {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, RecordedRequest::List)
    }
}

#[derive(Debug, Default)]
struct State {
    contacts: Vec<RawContact>,
    next_id: u64,
    requests: Vec<RecordedRequest>,
    offline: bool,
    fail_mutations: bool,
}

/// In-memory contacts backend that records every request.
#[derive(Debug, Default)]
pub struct InMemoryApi {
    state: Mutex<State>,
}

impl InMemoryApi {
    pub fn new(contacts: Vec<RawContact>) -> Self {
        let next_id = contacts.iter().map(|c| c.id.0).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(State {
                contacts,
                next_id,
                ..State::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fail every request, list included, as an unreachable backend would.
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    /// Reject mutations with HTTP 500 while lists still succeed.
    pub fn set_fail_mutations(&self, fail: bool) {
        self.state().fail_mutations = fail;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    pub fn mutations(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(RecordedRequest::is_mutation)
            .collect()
    }

    pub fn contacts(&self) -> Vec<RawContact> {
        self.state().contacts.clone()
    }

    fn begin(&self, request: RecordedRequest) -> Result<MutexGuard<'_, State>> {
        let mut state = self.state();
        let mutation = request.is_mutation();
        state.requests.push(request);
        if state.offline {
            return Err(Error::Transport {
                url: "memory://contacts".to_string(),
                reason: "backend offline".to_string(),
            });
        }
        if mutation && state.fail_mutations {
            return Err(Error::HttpStatus {
                status: 500,
                url: "memory://contacts".to_string(),
            });
        }
        Ok(state)
    }
}

fn contact_from_payload(id: ContactId, payload: &Payload) -> RawContact {
    let field = |key: &str| payload.get(key).unwrap_or("").to_string();
    RawContact {
        id,
        full_name: field("full_name"),
        phone_number: field("phone_number"),
        email: field("email"),
        tags: payload.get("tags").map(str::to_string),
    }
}

impl ContactsApi for InMemoryApi {
    fn list(&self) -> Result<Vec<RawContact>> {
        let state = self.begin(RecordedRequest::List)?;
        Ok(state.contacts.clone())
    }

    fn create(&self, payload: &Payload) -> Result<()> {
        let mut state = self.begin(RecordedRequest::Create(payload.clone()))?;
        let id = ContactId(state.next_id);
        state.next_id += 1;
        state.contacts.push(contact_from_payload(id, payload));
        Ok(())
    }

    fn update(&self, id: ContactId, payload: &Payload) -> Result<()> {
        let mut state = self.begin(RecordedRequest::Update(id, payload.clone()))?;
        match state.contacts.iter_mut().find(|c| c.id == id) {
            Some(existing) => {
                *existing = contact_from_payload(id, payload);
                Ok(())
            }
            None => Err(Error::HttpStatus {
                status: 404,
                url: format!("memory://contacts/{}", id),
            }),
        }
    }

    fn delete(&self, id: ContactId) -> Result<()> {
        let mut state = self.begin(RecordedRequest::Delete(id))?;
        state.contacts.retain(|c| c.id != id);
        Ok(())
    }
}

/// Confirmation that replays scripted answers and records each prompt.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConfirm {
    answers: VecDeque<bool>,
    fallback: bool,
    prompts: Vec<String>,
}

impl ScriptedConfirm {
    /// Give the same answer every time.
    pub fn always(answer: bool) -> Self {
        Self {
            fallback: answer,
            ..Self::default()
        }
    }

    /// Give `answers` in order, then decline.
    pub fn answers(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_string());
        self.answers.pop_front().unwrap_or(self.fallback)
    }
}

/// Build a backend record; `tags` is the raw comma-joined string.
pub fn raw_contact(id: u64, full_name: &str, tags: Option<&str>) -> RawContact {
    RawContact {
        id: ContactId(id),
        full_name: full_name.to_string(),
        phone_number: "555".to_string(),
        email: format!("{}@x.com", full_name.to_lowercase().replace(' ', ".")),
        tags: tags.map(str::to_string),
    }
}
