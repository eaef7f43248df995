//! Mock REST backend for store and form tests.

#![allow(dead_code)]

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use dairyops::{AppContext, ClientConfig};

/// Refresh delay used by forms under test.
pub const TEST_REFRESH_DELAY_MS: u64 = 20;

pub struct TestBackend {
    pub server: MockServer,
    pub ctx: AppContext,
}

impl TestBackend {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let mut config = ClientConfig::with_base_url(server.uri());
        config.forms.refresh_delay_ms = TEST_REFRESH_DELAY_MS;
        let ctx = AppContext::new(config).expect("context should build against mock server");
        Self { server, ctx }
    }

    /// Answers `verb path` with `data` wrapped in the usual envelope.
    pub async fn respond(&self, verb: &str, route: &str, data: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(wrapped(data)))
            .mount(&self.server)
            .await;
    }

    /// Like `respond`, but the mock must be hit exactly `times` times.
    pub async fn respond_times(&self, verb: &str, route: &str, data: Value, times: u64) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(wrapped(data)))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    pub async fn fail(&self, verb: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Requests received so far for `verb path`.
    pub async fn requests(&self, verb: &str, route: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == verb && r.url.path() == route)
            .collect()
    }

    /// JSON body of the only request received for `verb path`.
    pub async fn single_body(&self, verb: &str, route: &str) -> Value {
        let requests = self.requests(verb, route).await;
        assert_eq!(requests.len(), 1, "expected one {} {}", verb, route);
        serde_json::from_slice(&requests[0].body).expect("request body should be JSON")
    }
}

pub fn wrapped(data: Value) -> Value {
    serde_json::json!({ "statusCode": 200, "message": "OK", "data": data })
}
