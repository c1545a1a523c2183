//! A throwaway HTTP backend for wire-level tests.

#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use tiny_http::{Header, Response, Server};

/// One request as the backend received it.
#[derive(Debug, Clone)]
pub struct Received {
    pub method: String,
    pub url: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Serves a fixed contact list on GET and answers every other method with
/// `mutation_status`. Runs on its own thread for the life of the test.
pub struct FakeBackend {
    pub base_url: String,
    received: Arc<Mutex<Vec<Received>>>,
}

impl FakeBackend {
    pub fn start(list_json: &str, mutation_status: u16) -> Self {
        let server = Server::http("127.0.0.1:0").expect("bind test server");
        let addr = server
            .server_addr()
            .to_ip()
            .expect("test server has an ip address");
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&received);
        let list_json = list_json.to_string();

        thread::spawn(move || {
            for mut request in server.incoming_requests() {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let content_type = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Content-Type"))
                    .map(|h| h.value.as_str().to_string());
                let method = request.method().to_string();
                log.lock().unwrap().push(Received {
                    method: method.clone(),
                    url: request.url().to_string(),
                    content_type,
                    body,
                });

                let response = if method == "GET" {
                    let header: Header = "Content-Type: application/json".parse().unwrap();
                    Response::from_string(list_json.clone()).with_header(header)
                } else {
                    Response::from_string("").with_status_code(mutation_status)
                };
                let _ = request.respond(response);
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            received,
        }
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Received> {
        self.received()
            .into_iter()
            .filter(|r| r.method != "GET")
            .collect()
    }
}

pub const TWO_CONTACTS: &str = r#"[
    {"id": 1, "full_name": "Ann", "phone_number": "555", "email": "a@x.com", "tags": "friend, vip"},
    {"id": 2, "full_name": "Bob", "phone_number": "556", "email": "b@x.com", "tags": null}
]"#;
