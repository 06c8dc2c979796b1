//! Scripted transport for tests
//!
//! Responses are queued ahead of time and popped in call order; every
//! request is recorded so tests can assert on URLs, query parameters,
//! form fields, and call counts.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::AppError;
use crate::reader::client::ReaderClient;
use crate::reader::session::Session;
use crate::reader::transport::{Transport, WireResponse};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
}

#[derive(Default)]
struct Inner {
    responses: Mutex<VecDeque<Result<WireResponse, AppError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    calls: AtomicUsize,
}

/// Clone-able handle onto shared mock state, so tests can keep a copy for
/// assertions after handing the transport to a session
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Inner>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, body: &str) {
        self.push_status(200, body);
    }

    pub fn push_status(&self, status: u16, body: &str) {
        self.inner
            .responses
            .lock()
            .unwrap()
            .push_back(Ok(WireResponse {
                status,
                body: body.to_string(),
            }));
    }

    pub fn push_err(&self, err: AppError) {
        self.inner.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn call_count(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<WireResponse, AppError> {
        // An unscripted call gets an empty success body
        self.inner
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(WireResponse {
                status: 200,
                body: "{}".to_string(),
            }))
    }

    fn record(&self, request: RecordedRequest) {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.requests.lock().unwrap().push(request);
    }
}

/// Build a `ReaderClient` over this mock and run the credential exchange,
/// consuming one scripted auth response
pub async fn authenticated_client(transport: &MockTransport) -> ReaderClient<MockTransport> {
    transport.push_ok("SID=test-token");
    let session = Session::new(
        transport.clone(),
        "https://rss.example/api/greader.php".to_string(),
        "alice".to_string(),
        "secret".to_string(),
    );
    let client = ReaderClient::new(session);
    client.authenticate().await.unwrap();
    client
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(
        &self,
        url: &str,
        _headers: &[(String, String)],
        query: &[(String, String)],
    ) -> Result<WireResponse, AppError> {
        self.record(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            query: query.to_vec(),
            form: Vec::new(),
        });
        self.next_response()
    }

    async fn post_form(
        &self,
        url: &str,
        _headers: &[(String, String)],
        form: &[(String, String)],
    ) -> Result<WireResponse, AppError> {
        self.record(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            query: Vec::new(),
            form: form.to_vec(),
        });
        self.next_response()
    }
}
