//! Form mode, field constraints, and submission payloads.

use cm_common::{ContactId, Error, Result};
use cm_view::form::ADD_TAG_FIELD;
use cm_view::{FieldName, FormView};
use regex::Regex;
use serde::Serialize;

use crate::api::Payload;

/// Valid e-mail address grammar used by `<input type="email">`.
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

/// Whether the form creates a contact or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "mode", content = "id", rename_all = "snake_case")]
pub enum FormMode {
    #[default]
    Adding,
    Editing(ContactId),
}

/// Constraint flags of one input, named after their HTML counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Validity {
    pub value_missing: bool,
    pub type_mismatch: bool,
    pub pattern_mismatch: bool,
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        !(self.value_missing || self.type_mismatch || self.pattern_mismatch)
    }
}

/// A payload routed to the right backend operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(Payload),
    Update(ContactId, Payload),
}

/// Owns the form mode and evaluates the field constraints.
#[derive(Debug, Clone)]
pub struct FormManager {
    mode: FormMode,
    phone_source: Option<String>,
    phone_pattern: Option<Regex>,
    email: Regex,
}

impl FormManager {
    /// Build a manager enforcing `phone_pattern` on the phone input.
    ///
    /// The pattern must match the whole value, as an HTML `pattern` does.
    pub fn new(phone_pattern: Option<&str>) -> Result<Self> {
        let phone = phone_pattern
            .map(|source| compile(&format!("^(?:{})$", source), source))
            .transpose()?;
        Ok(Self {
            mode: FormMode::Adding,
            phone_source: phone_pattern.map(str::to_string),
            phone_pattern: phone,
            email: compile(EMAIL_PATTERN, EMAIL_PATTERN)?,
        })
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: FormMode) {
        self.mode = mode;
    }

    /// The phone pattern as written in configuration.
    pub fn phone_pattern(&self) -> Option<&str> {
        self.phone_source.as_deref()
    }

    /// Evaluate one input. Every field is required.
    pub fn validity(&self, field: FieldName, value: &str) -> Validity {
        let mut validity = Validity {
            value_missing: value.is_empty(),
            ..Validity::default()
        };
        if value.is_empty() {
            return validity;
        }

        match field {
            FieldName::Email => {
                validity.type_mismatch = !self.email.is_match(value);
            }
            FieldName::PhoneNumber => {
                if let Some(pattern) = &self.phone_pattern {
                    validity.pattern_mismatch = !pattern.is_match(value);
                }
            }
            FieldName::FullName => {}
        }
        validity
    }

    /// Fields failing any constraint, in document order.
    pub fn check_validity(&self, form: &FormView) -> Vec<FieldName> {
        FieldName::ALL
            .into_iter()
            .filter(|field| !self.validity(*field, form.value(*field)).is_valid())
            .collect()
    }

    /// Collapse the form entries into the wire payload.
    ///
    /// Entries whose name contains "tag" are joined with ", " into one
    /// trailing `tags` pair; the ad hoc tag input is dropped.
    pub fn encode_data(form: &FormView) -> Payload {
        let mut tags: Vec<String> = Vec::new();
        let mut payload = Payload::new();

        for (key, value) in form.entries() {
            if key.contains("tag") {
                if key != ADD_TAG_FIELD {
                    tags.push(value);
                }
            } else {
                payload.append(key, value);
            }
        }

        payload.append("tags", tags.join(", "));
        payload
    }

    /// Payload plus target operation for the current mode.
    pub fn prepare_submission(&self, form: &FormView) -> Submission {
        let mut payload = Self::encode_data(form);
        match self.mode {
            FormMode::Adding => Submission::Create(payload),
            FormMode::Editing(id) => {
                payload.append("id", id.to_string());
                Submission::Update(id, payload)
            }
        }
    }
}

fn compile(pattern: &str, source: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::InvalidPattern {
        pattern: source.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PHONE: &str = r"[0-9\(\)+\-. ]+";

    fn manager() -> FormManager {
        FormManager::new(Some(PHONE)).unwrap()
    }

    fn filled_form() -> FormView {
        let mut form = FormView::new();
        form.set_value(FieldName::FullName, "Ann");
        form.set_value(FieldName::PhoneNumber, "555-1234");
        form.set_value(FieldName::Email, "a@x.com");
        form
    }

    #[test]
    fn test_empty_fields_are_value_missing() {
        let manager = manager();
        for field in FieldName::ALL {
            let validity = manager.validity(field, "");
            assert!(validity.value_missing);
            assert!(!validity.type_mismatch && !validity.pattern_mismatch);
        }
        assert_eq!(manager.check_validity(&FormView::new()), FieldName::ALL.to_vec());
    }

    #[test]
    fn test_email_grammar() {
        let manager = manager();
        assert!(manager.validity(FieldName::Email, "a@x.com").is_valid());
        assert!(manager.validity(FieldName::Email, "a@localhost").is_valid());
        assert!(manager.validity(FieldName::Email, "no-at-sign").type_mismatch);
        assert!(manager.validity(FieldName::Email, "a@-x.com").type_mismatch);
        assert!(manager.validity(FieldName::Email, "a b@x.com").type_mismatch);
    }

    #[test]
    fn test_padded_email_is_stored_and_sent_trimmed() {
        let manager = manager();
        let mut form = filled_form();
        form.set_value(FieldName::Email, " a@x.com \n");

        assert_eq!(form.value(FieldName::Email), "a@x.com");
        assert!(manager.check_validity(&form).is_empty());
        let payload = FormManager::encode_data(&form);
        assert_eq!(payload.get("email"), Some("a@x.com"));

        form.set_value(FieldName::Email, "   ");
        let validity = manager.validity(FieldName::Email, form.value(FieldName::Email));
        assert!(validity.value_missing && !validity.type_mismatch);
    }

    #[test]
    fn test_phone_pattern_is_anchored() {
        let manager = manager();
        assert!(manager.validity(FieldName::PhoneNumber, "(555) 123-4567").is_valid());
        assert!(manager.validity(FieldName::PhoneNumber, "555x").pattern_mismatch);
        assert!(manager.validity(FieldName::PhoneNumber, "call 555").pattern_mismatch);
    }

    #[test]
    fn test_alternation_pattern_anchors_every_branch() {
        let manager = FormManager::new(Some("a|b")).unwrap();
        assert!(manager.validity(FieldName::PhoneNumber, "a").is_valid());
        assert!(manager.validity(FieldName::PhoneNumber, "ab").pattern_mismatch);
    }

    #[test]
    fn test_no_phone_pattern_accepts_anything() {
        let manager = FormManager::new(None).unwrap();
        assert!(manager.validity(FieldName::PhoneNumber, "anything").is_valid());
        assert_eq!(manager.phone_pattern(), None);
    }

    #[test]
    fn test_invalid_phone_pattern_rejected() {
        let err = FormManager::new(Some("[0-9")).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { ref pattern, .. } if pattern == "[0-9"));
    }

    #[test]
    fn test_name_only_checks_presence() {
        let manager = manager();
        assert!(manager.validity(FieldName::FullName, " ").is_valid());
        assert!(manager.validity(FieldName::FullName, "<script>").is_valid());
    }

    #[test]
    fn test_encode_data_joins_checked_tags() {
        let mut form = filled_form();
        form.replace_tag_boxes(&["friend".to_string(), "vip".to_string(), "work".to_string()]);
        form.set_tag_checked("friend", true);
        form.set_tag_checked("work", true);
        form.set_add_tag_value("ignored");

        let payload = FormManager::encode_data(&form);
        assert_eq!(
            payload.keys(),
            vec!["full_name", "phone_number", "email", "tags"]
        );
        assert_eq!(payload.get("tags"), Some("friend, work"));
    }

    proptest! {
        #[test]
        fn prop_encode_data_ends_with_single_joined_tags_pair(
            checked in prop::collection::vec(any::<bool>(), 0..8)
        ) {
            let tags: Vec<String> = (0..checked.len()).map(|i| format!("t{i}")).collect();
            let mut form = filled_form();
            form.replace_tag_boxes(&tags);
            for (tag, on) in tags.iter().zip(&checked) {
                form.set_tag_checked(tag, *on);
            }
            form.set_add_tag_value("ad hoc");
            let expected: Vec<&str> = tags
                .iter()
                .zip(&checked)
                .filter(|(_, on)| **on)
                .map(|(tag, _)| tag.as_str())
                .collect();

            let payload = FormManager::encode_data(&form);
            let pairs = payload.pairs();
            prop_assert_eq!(pairs.iter().filter(|(key, _)| key.contains("tag")).count(), 1);
            let (last_key, last_value) = &pairs[pairs.len() - 1];
            prop_assert_eq!(last_key.as_str(), "tags");
            let expected_joined = expected.join(", ");
            prop_assert_eq!(last_value.as_str(), expected_joined.as_str());
        }
    }

    #[test]
    fn test_encode_data_without_tags_sends_empty_string() {
        let payload = FormManager::encode_data(&filled_form());
        assert_eq!(payload.get("tags"), Some(""));
    }

    #[test]
    fn test_prepare_submission_by_mode() {
        let mut manager = manager();
        let form = filled_form();

        match manager.prepare_submission(&form) {
            Submission::Create(payload) => assert_eq!(payload.get("id"), None),
            other => panic!("unexpected {other:?}"),
        }

        manager.set_mode(FormMode::Editing(ContactId(7)));
        match manager.prepare_submission(&form) {
            Submission::Update(id, payload) => {
                assert_eq!(id, ContactId(7));
                assert_eq!(payload.keys().last(), Some(&"id"));
                assert_eq!(payload.get("id"), Some("7"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
