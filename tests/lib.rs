//! Shared fixtures for the behavior tests.
//!
//! [`RecordingHttpClient`] answers every request with a scripted response
//! and keeps the requests it saw, so tests can assert on the exact URL,
//! headers and form body the pipeline produced.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

pub use mineos_market_core::{
    Config, ConfigOverrides, HttpClient, HttpRequest, HttpResponse, MarketClient, MarketError,
    TransportError,
};

pub const TEST_HOST: &str = "http://market.test/MineOSAPI/2.04/";

#[derive(Default)]
pub struct RecordingHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `200 OK` response with `body`.
    pub fn respond(self, body: &str) -> Self {
        self.push(Ok(HttpResponse::ok(body)))
    }

    pub fn respond_status(self, status: u16, status_text: &str) -> Self {
        self.push(Ok(HttpResponse::with_status(status, status_text, "")))
    }

    pub fn fail(self, message: &str) -> Self {
        self.push(Err(TransportError::new(message)))
    }

    fn push(self, response: Result<HttpResponse, TransportError>) -> Self {
        self.responses
            .lock()
            .expect("responses lock")
            .push_back(response);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests()
            .pop()
            .expect("at least one request was sent")
    }

    /// Decoded form pairs of the last request, sorted by key.
    pub fn last_form(&self) -> Vec<(String, String)> {
        let body = self.last_request().body.unwrap_or_default();
        let mut pairs = body
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect::<Vec<_>>();
        pairs.sort();
        pairs
    }
}

impl HttpClient for RecordingHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + Send + 'a>> {
        self.requests.lock().expect("requests lock").push(request);
        let response = self
            .responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no scripted response")));
        Box::pin(async move { response })
    }
}

/// Client pointed at [`TEST_HOST`] over `http`.
pub fn client_with(http: &Arc<RecordingHttpClient>) -> MarketClient {
    client_with_overrides(http, ConfigOverrides::new())
}

pub fn client_with_overrides(
    http: &Arc<RecordingHttpClient>,
    overrides: ConfigOverrides,
) -> MarketClient {
    let config = Config::with_overrides(ConfigOverrides::new().host_url(TEST_HOST));
    let mut client = MarketClient::with_http_client(config, Arc::clone(http) as Arc<dyn HttpClient>);
    client.use_config(overrides);
    client
}

pub fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut pairs = expected
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect::<Vec<_>>();
    pairs.sort();
    pairs
}

fn decode_component(text: &str) -> String {
    urlencoding::decode(text)
        .expect("utf-8 form component")
        .into_owned()
}
