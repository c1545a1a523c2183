//! Command payload formatting for stdout.

use cm_common::{Contact, OutputFormat, Result};
use cm_view::{ContactsContent, Ui, NO_CONTACTS_MESSAGE};
use serde::Serialize;

/// Schema version stamped on JSON payloads.
pub const OUTPUT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Serialize)]
struct Listing<'a> {
    schema_version: &'static str,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter_message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    contacts: &'a [Contact],
}

/// The contacts panel as the user would see it.
pub fn format_listing(ui: &Ui, format: OutputFormat) -> Result<String> {
    let contacts = ui.rows();
    let message = match ui.content() {
        ContactsContent::Empty => Some(NO_CONTACTS_MESSAGE),
        ContactsContent::Rows(_) => None,
    };
    let filter_message = ui.filter_message();

    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&Listing {
            schema_version: OUTPUT_SCHEMA_VERSION,
            count: contacts.len(),
            filter_message,
            message,
            contacts,
        })?,
        OutputFormat::Summary => match filter_message {
            Some(filter) => format!("{} ({})", count_label(contacts.len()), filter),
            None => count_label(contacts.len()),
        },
        OutputFormat::Md => {
            let mut out = String::from("# Contacts\n\n");
            if let Some(filter) = filter_message {
                out.push_str(&format!("_{}_\n\n", filter));
            }
            match message {
                Some(message) => out.push_str(&format!("{}\n", message)),
                None => {
                    out.push_str("| ID | Full Name | Phone Number | Email | Tags |\n");
                    out.push_str("|---:|---|---|---|---|\n");
                    for c in contacts {
                        out.push_str(&format!(
                            "| {} | {} | {} | {} | {} |\n",
                            c.id,
                            escape_cell(&c.full_name),
                            escape_cell(&c.phone_number),
                            escape_cell(&c.email),
                            escape_cell(&c.tags_joined())
                        ));
                    }
                }
            }
            out
        }
    };
    Ok(out)
}

/// A single contact.
pub fn format_contact(contact: &Contact, format: OutputFormat) -> Result<String> {
    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(contact)?,
        OutputFormat::Summary => format!("[{}] {}", contact.id, contact.full_name),
        OutputFormat::Md => format!(
            "# {}\n\n- **ID:** {}\n- **Phone Number:** {}\n- **Email:** {}\n- **Tags:** {}\n",
            contact.full_name,
            contact.id,
            contact.phone_number,
            contact.email,
            contact.tags_joined()
        ),
    };
    Ok(out)
}

/// The working tag list.
pub fn format_tags(tags: &[String], format: OutputFormat) -> Result<String> {
    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "schema_version": OUTPUT_SCHEMA_VERSION,
            "count": tags.len(),
            "tags": tags,
        }))?,
        OutputFormat::Summary => format!("{} tags", tags.len()),
        OutputFormat::Md => {
            let mut out = String::from("# Tags\n\n");
            for tag in tags {
                out.push_str(&format!("- {}\n", tag));
            }
            out
        }
    };
    Ok(out)
}

fn count_label(count: usize) -> String {
    match count {
        1 => "1 contact".to_string(),
        n => format!("{} contacts", n),
    }
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cm_common::ContactId;

    fn ann() -> Contact {
        Contact {
            id: ContactId(1),
            full_name: "Ann".into(),
            phone_number: "555".into(),
            email: "a@x.com".into(),
            tags: vec!["friend".into(), "vip".into()],
        }
    }

    #[test]
    fn test_listing_json_with_filter() {
        let mut ui = Ui::new();
        ui.render_contacts(&[ann()], Some("Contacts with 'vip' tag:"));
        let json: serde_json::Value =
            serde_json::from_str(&format_listing(&ui, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["filter_message"], "Contacts with 'vip' tag:");
        assert_eq!(json["contacts"][0]["tags"][1], "vip");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_listing_empty_placeholder() {
        let ui = Ui::new();
        let json: serde_json::Value =
            serde_json::from_str(&format_listing(&ui, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["message"], NO_CONTACTS_MESSAGE);
        assert!(format_listing(&ui, OutputFormat::Md)
            .unwrap()
            .contains(NO_CONTACTS_MESSAGE));
    }

    #[test]
    fn test_listing_summary_and_md() {
        let mut ui = Ui::new();
        ui.render_contacts(&[ann()], None);
        assert_eq!(format_listing(&ui, OutputFormat::Summary).unwrap(), "1 contact");
        let md = format_listing(&ui, OutputFormat::Md).unwrap();
        assert!(md.contains("| 1 | Ann | 555 | a@x.com | friend, vip |"));
    }

    #[test]
    fn test_contact_and_tags() {
        assert_eq!(
            format_contact(&ann(), OutputFormat::Summary).unwrap(),
            "[1] Ann"
        );
        let tags = vec!["friend".to_string(), "vip".to_string()];
        assert_eq!(format_tags(&tags, OutputFormat::Summary).unwrap(), "2 tags");
        assert!(format_tags(&tags, OutputFormat::Md).unwrap().contains("- vip\n"));
    }
}
