//! Contact records and identifiers.
//!
//! The backend sends tags as one comma-separated string; everything past the
//! API boundary works with [`Contact`], whose tags are already split.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned contact identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub u64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ContactId {
    fn from(id: u64) -> Self {
        ContactId(id)
    }
}

impl FromStr for ContactId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(ContactId)
    }
}

/// A contact exactly as the list endpoint returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContact {
    pub id: ContactId,
    pub full_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    /// Comma-separated tag string; `null` and missing both mean "no tags".
    #[serde(default)]
    pub tags: Option<String>,
}

/// A contact with its tag string split into an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
    pub tags: Vec<String>,
}

impl Contact {
    /// Exact, case-sensitive tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// The tag list joined back into the wire representation.
    pub fn tags_joined(&self) -> String {
        self.tags.join(", ")
    }
}

impl From<RawContact> for Contact {
    fn from(raw: RawContact) -> Self {
        let tags = split_tags(raw.tags.as_deref());
        Contact {
            id: raw.id,
            full_name: raw.full_name,
            phone_number: raw.phone_number,
            email: raw.email,
            tags,
        }
    }
}

/// Split a comma-joined tag string into trimmed tags.
///
/// An absent or empty string yields no tags. Interior empty segments are kept
/// (`"a,,b"` gives `["a", "", "b"]`), matching what the backend round-trips.
pub fn split_tags(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) if !s.is_empty() => s.split(',').map(|t| t.trim().to_string()).collect(),
        _ => Vec::new(),
    }
}
