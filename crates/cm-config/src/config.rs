//! Client configuration types.

use serde::{Deserialize, Serialize};

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Scheme and authority of the backend, without a trailing path.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the contacts collection resource.
    #[serde(default = "default_contacts_path")]
    pub contacts_path: String,
    /// Per-request timeout in seconds. Unset means wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_contacts_path() -> String {
    "/api/contacts".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            contacts_path: default_contacts_path(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// URL of the contacts collection.
    pub fn contacts_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.contacts_path
        )
    }

    /// URL of a single contact resource.
    pub fn contact_url(&self, id: impl std::fmt::Display) -> String {
        format!(
            "{}/{}",
            self.contacts_url().trim_end_matches('/'),
            id
        )
    }
}

/// Form constraint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    /// `pattern` constraint for the phone number field; `null` disables it.
    #[serde(default = "default_phone_pattern")]
    pub phone_pattern: Option<String>,
}

fn default_phone_pattern() -> Option<String> {
    Some(r"[0-9\(\)+\-. ]+".to_string())
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            phone_pattern: default_phone_pattern(),
        }
    }
}

/// Page rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Document title for rendered pages.
    #[serde(default = "default_title")]
    pub title: String,
    /// Minify rendered pages.
    #[serde(default)]
    pub minify: bool,
}

fn default_title() -> String {
    "Contact Manager".to_string()
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            minify: false,
        }
    }
}

/// Complete client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Backend connection.
    #[serde(default)]
    pub api: ApiConfig,
    /// Form constraints.
    #[serde(default)]
    pub form: FormConfig,
    /// Page rendering.
    #[serde(default)]
    pub view: ViewConfig,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            api: ApiConfig::default(),
            form: FormConfig::default(),
            view: ViewConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration with built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the backend base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// Override the phone number pattern.
    pub fn with_phone_pattern(mut self, pattern: Option<String>) -> Self {
        self.form.phone_pattern = pattern;
        self
    }

    /// Load configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
