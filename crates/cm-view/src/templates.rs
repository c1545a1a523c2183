//! Askama templates for the contact list, the tag checklist, and the page shell.

use askama::Template;
use cm_common::Contact;

use crate::form::TagCheckbox;

/// Contact rows rendered into `#contacts_display`.
#[derive(Template)]
#[template(
    source = r##"{% for contact in contacts %}
<div class="contact_container" data-id="{{ contact.id }}">
  <h3 class="full_name">{{ contact.full_name }}</h3>
  <dl>
    <dt>Phone Number:</dt>
    <dd class="phone_number">{{ contact.phone_number }}</dd>
    <dt>Email:</dt>
    <dd class="email">{{ contact.email }}</dd>
    <dt>Tags:</dt>
    <dd>{% for tag in contact.tags %}<a href="#" class="contact_tag">{{ tag }}</a>{% endfor %}</dd>
  </dl>
  <a href="#" id="edit" class="button">Edit</a>
  <a href="#" id="delete" class="button">Delete</a>
</div>
{% endfor %}"##,
    ext = "html"
)]
pub struct ContactsTemplate<'a> {
    pub contacts: &'a [Contact],
}

/// Tag checklist rendered into the form's fieldset.
#[derive(Template)]
#[template(
    source = r##"{% for tag in tags %}
<label><input type="checkbox" name="tags" value="{{ tag.value }}"{% if tag.checked %} checked{% endif %}>{{ tag.value }}</label>
{% endfor %}"##,
    ext = "html"
)]
pub struct TagsTemplate<'a> {
    pub tags: &'a [TagCheckbox],
}

/// One labelled text input of the form.
#[derive(Debug, Clone)]
pub struct FieldRow {
    pub name: &'static str,
    pub id: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
    pub value: String,
    pub pattern: String,
    pub error: String,
}

/// Full page: search bar, contacts panel, and form panel.
#[derive(Template)]
#[template(
    source = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{ title }}</title>
  <style>
    .error { border-color: #dc2626; }
    .error_message { color: #dc2626; font-size: 0.85em; }
    .contact_tag { margin-right: 0.5em; }
  </style>
</head>
<body>
  <header>
    <h1>{{ title }}</h1>
    <a href="#" class="add_contact_button">Add Contact</a>
    <input type="search" id="search" placeholder="Search" value="{{ search }}">
  </header>
  <main>
    <section id="contacts_display"{% if !contacts_visible %} style="display: none"{% endif %}>
      <div id="filter_message"{% if !filter_visible %} style="display: none"{% endif %}>
        <p>{{ filter_message }}</p>
        <a href="#" id="clear_filter_button">Clear filter</a>
      </div>
      <div>{{ contacts_html|safe }}</div>
    </section>
    <section id="contact_form_display"{% if !form_visible %} style="display: none"{% endif %}>
      <h2>{{ heading }}</h2>
      <form action="#" method="post" novalidate>
        {% for field in fields %}
        <div>
          <label for="{{ field.id }}">{{ field.label }}</label>
          <input type="{{ field.input_type }}" id="{{ field.id }}" name="{{ field.name }}" value="{{ field.value }}"{% if !field.pattern.is_empty() %} pattern="{{ field.pattern }}"{% endif %}{% if !field.error.is_empty() %} class="error"{% endif %} required>
          <span class="error_message">{{ field.error }}</span>
        </div>
        {% endfor %}
        <fieldset>
          <legend>Tags</legend>
          <div>{{ tags_html|safe }}</div>
          <input type="text" name="add_tag" value="{{ add_tag }}"><a href="#" id="add_tag_button">Add tag</a>
        </fieldset>
        <input type="submit" value="Submit">
        <a href="#" id="cancel_button">Cancel</a>
      </form>
    </section>
  </main>
</body>
</html>
"##,
    ext = "html"
)]
pub struct PageTemplate<'a> {
    pub title: &'a str,
    pub search: &'a str,
    pub contacts_visible: bool,
    pub filter_visible: bool,
    pub filter_message: &'a str,
    pub contacts_html: String,
    pub form_visible: bool,
    pub heading: &'a str,
    pub fields: Vec<FieldRow>,
    pub tags_html: String,
    pub add_tag: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cm_common::ContactId;

    #[test]
    fn test_contacts_template_escapes_names() {
        let contacts = vec![Contact {
            id: ContactId(9),
            full_name: "<b>Bo</b>".into(),
            phone_number: "1".into(),
            email: "b@x.com".into(),
            tags: vec![],
        }];
        let html = ContactsTemplate {
            contacts: &contacts,
        }
        .render()
        .unwrap();
        assert!(html.contains(r#"data-id="9""#));
        assert!(html.contains("&lt;b&gt;Bo&lt;/b&gt;"));
        assert!(!html.contains("<b>Bo</b>"));
    }

    #[test]
    fn test_tags_template_marks_checked() {
        let tags = vec![
            TagCheckbox {
                value: "friend".into(),
                checked: true,
            },
            TagCheckbox {
                value: "vip".into(),
                checked: false,
            },
        ];
        let html = TagsTemplate { tags: &tags }.render().unwrap();
        assert!(html.contains(r#"value="friend" checked>"#));
        assert!(html.contains(r#"value="vip">"#));
    }
}
