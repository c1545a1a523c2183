//! Working tag list offered by the form's checklist.

use cm_common::{Contact, RawContact};
use tracing::debug;

/// De-duplicated tags scraped from the collection plus any ad hoc additions.
#[derive(Debug, Clone, Default)]
pub struct TagManager {
    tags: Vec<String>,
}

impl TagManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn the backend's comma-separated tag strings into lists.
    pub fn parse_tags(raw: Vec<RawContact>) -> Vec<Contact> {
        raw.into_iter().map(Contact::from).collect()
    }

    /// Every tag of every contact, in collection order, duplicates included.
    pub fn scrape_tags(contacts: &[Contact]) -> Vec<String> {
        contacts.iter().flat_map(|c| c.tags.iter().cloned()).collect()
    }

    /// Keep the first occurrence of each tag.
    pub fn remove_duplicates(tags: Vec<String>) -> Vec<String> {
        let mut uniques: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !uniques.contains(&tag) {
                uniques.push(tag);
            }
        }
        uniques
    }

    /// Rebuild the list from the collection, dropping ad hoc tags.
    pub fn init(&mut self, contacts: &[Contact]) {
        self.tags = Self::remove_duplicates(Self::scrape_tags(contacts));
        debug!(count = self.tags.len(), "Tag list rebuilt");
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Append an ad hoc tag. The value is taken verbatim, empty included.
    pub fn add_tag(&mut self, value: &str) {
        self.tags.push(value.to_string());
        self.tags = Self::remove_duplicates(std::mem::take(&mut self.tags));
        debug!(tag = value, count = self.tags.len(), "Tag added");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cm_common::ContactId;

    fn raw(id: u64, tags: Option<&str>) -> RawContact {
        RawContact {
            id: ContactId(id),
            full_name: format!("c{id}"),
            phone_number: String::new(),
            email: String::new(),
            tags: tags.map(str::to_string),
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_tags_splits_and_trims() {
        let contacts = TagManager::parse_tags(vec![
            raw(1, Some("friend, vip")),
            raw(2, None),
            raw(3, Some("")),
        ]);
        assert_eq!(contacts[0].tags, strings(&["friend", "vip"]));
        assert!(contacts[1].tags.is_empty());
        assert!(contacts[2].tags.is_empty());
    }

    #[test]
    fn test_remove_duplicates_keeps_first_occurrence() {
        let tags = TagManager::remove_duplicates(strings(&["b", "a", "b", "c", "a"]));
        assert_eq!(tags, strings(&["b", "a", "c"]));
    }

    #[test]
    fn test_init_scrapes_unique_tags() {
        let contacts = TagManager::parse_tags(vec![
            raw(1, Some("friend, vip")),
            raw(2, Some("vip,work")),
        ]);
        let mut manager = TagManager::new();
        manager.init(&contacts);
        assert_eq!(manager.tags(), strings(&["friend", "vip", "work"]).as_slice());
    }

    #[test]
    fn test_add_tag_dedups_and_is_dropped_on_init() {
        let contacts = TagManager::parse_tags(vec![raw(1, Some("friend"))]);
        let mut manager = TagManager::new();
        manager.init(&contacts);

        manager.add_tag("friend");
        assert_eq!(manager.tags(), strings(&["friend"]).as_slice());

        manager.add_tag("new");
        assert_eq!(manager.tags(), strings(&["friend", "new"]).as_slice());

        manager.init(&contacts);
        assert_eq!(manager.tags(), strings(&["friend"]).as_slice());
    }

    #[test]
    fn test_add_empty_tag_is_kept() {
        let mut manager = TagManager::new();
        manager.add_tag("");
        assert_eq!(manager.tags(), strings(&[""]).as_slice());
    }
}
