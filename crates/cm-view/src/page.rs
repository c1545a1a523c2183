//! Full-page renderer.

use askama::Template;
use tracing::info;

use crate::error::Result;
use crate::form::FieldName;
use crate::templates::{FieldRow, PageTemplate};
use crate::ui::{Panel, Ui};

/// Page-level rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    /// Document title.
    pub title: String,
    /// `pattern` attribute for the phone number input.
    pub phone_pattern: Option<String>,
    /// Minify the output.
    pub minify: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: "Contact Manager".to_string(),
            phone_pattern: None,
            minify: false,
        }
    }
}

/// Renders the whole document for a [`Ui`] state.
pub struct PageRenderer {
    options: PageOptions,
}

impl PageRenderer {
    pub fn new(options: PageOptions) -> Self {
        Self { options }
    }

    /// Render the page as a standalone HTML document.
    pub fn render(&self, ui: &Ui) -> Result<String> {
        let form = ui.form();
        let fields = FieldName::ALL
            .iter()
            .map(|field| FieldRow {
                name: field.name(),
                id: field.input_id(),
                label: field.label(),
                input_type: field.input_type(),
                value: form.value(*field).to_string(),
                pattern: match field {
                    FieldName::PhoneNumber => self.options.phone_pattern.clone().unwrap_or_default(),
                    _ => String::new(),
                },
                error: form.error(*field).unwrap_or("").to_string(),
            })
            .collect();

        let page = PageTemplate {
            title: &self.options.title,
            search: ui.search_value(),
            contacts_visible: ui.visible_panel() == Panel::Contacts,
            filter_visible: ui.filter_message().is_some(),
            filter_message: ui.filter_message().unwrap_or(""),
            contacts_html: ui.contacts_fragment()?,
            form_visible: ui.visible_panel() == Panel::Form,
            heading: form.heading(),
            fields,
            tags_html: ui.tags_fragment()?,
            add_tag: form.add_tag_value(),
        };
        let html = page.render()?;

        let output = if self.options.minify {
            let cfg = minify_html::Cfg {
                minify_js: true,
                minify_css: true,
                ..Default::default()
            };
            String::from_utf8(minify_html::minify(html.as_bytes(), &cfg)).unwrap_or(html)
        } else {
            html
        };

        info!(bytes = output.len(), title = %self.options.title, "Page rendered");
        Ok(output)
    }
}
