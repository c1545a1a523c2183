//! Blocking HTTP implementation of [`ContactsApi`].

use std::time::Duration;

use cm_common::{ContactId, Error, RawContact, Result};
use cm_config::ApiConfig;
use tracing::debug;

use super::{ContactsApi, Payload, FORM_CONTENT_TYPE};

/// Talks to the contacts backend over HTTP.
pub struct HttpApi {
    agent: ureq::Agent,
    config: ApiConfig,
}

impl HttpApi {
    pub fn new(config: ApiConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Self {
            agent: builder.build(),
            config,
        }
    }

    fn send_form(&self, method: &str, url: &str, payload: &Payload) -> Result<()> {
        let response = self
            .agent
            .request(method, url)
            .set("Content-Type", FORM_CONTENT_TYPE)
            .send_form(&payload.as_form())
            .map_err(|e| request_error(url, e))?;
        debug!(
            method,
            url,
            status = response.status(),
            fields = payload.pairs().len(),
            "Mutation sent"
        );
        Ok(())
    }
}

fn request_error(url: &str, err: ureq::Error) -> Error {
    match err {
        ureq::Error::Status(status, _) => Error::HttpStatus {
            status,
            url: url.to_string(),
        },
        ureq::Error::Transport(transport) => Error::Transport {
            url: url.to_string(),
            reason: transport.to_string(),
        },
    }
}

impl ContactsApi for HttpApi {
    fn list(&self) -> Result<Vec<RawContact>> {
        let url = self.config.contacts_url();
        let response = self
            .agent
            .get(&url)
            .set("Accept", "application/json")
            .call()
            .map_err(|e| request_error(&url, e))?;
        let contacts: Vec<RawContact> = response
            .into_json()
            .map_err(|e| Error::Decode(e.to_string()))?;
        debug!(url = %url, count = contacts.len(), "Fetched contacts");
        Ok(contacts)
    }

    fn create(&self, payload: &Payload) -> Result<()> {
        self.send_form("POST", &self.config.contacts_url(), payload)
    }

    fn update(&self, id: ContactId, payload: &Payload) -> Result<()> {
        self.send_form("PUT", &self.config.contact_url(id), payload)
    }

    fn delete(&self, id: ContactId) -> Result<()> {
        let url = self.config.contact_url(id);
        let response = self
            .agent
            .delete(&url)
            .call()
            .map_err(|e| request_error(&url, e))?;
        debug!(url = %url, status = response.status(), "Delete sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_backend_is_transport_error() {
        let api = HttpApi::new(ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            contacts_path: "/api/contacts".to_string(),
            timeout_secs: Some(2),
        });
        let err = api.list().unwrap_err();
        assert!(matches!(err, Error::Transport { .. }), "got {err:?}");
        assert!(err.to_string().contains("http://127.0.0.1:9/api/contacts"));
    }
}
