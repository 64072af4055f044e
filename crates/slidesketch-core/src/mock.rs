//! Mock completion backend for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

use crate::ExtractError;
use crate::completion::{CompletionBackend, CompletionFuture, CompletionRequest, CompletionResponse};

/// A configurable mock response for [`MockCompletion`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// A successful envelope whose first choice carries this content string.
    Content(String),
    /// A successful call returning this exact envelope.
    Envelope(Value),
    /// A non-success HTTP status with a text body.
    Upstream { status: u16, body: String },
    /// The call never produced a response (connection refused, reset, ...).
    NetworkError(String),
}

/// A hand-rolled mock implementing [`CompletionBackend`] for tests.
///
/// Returns the same response for every call, or a sequence (repeating the
/// last one once exhausted). Every request and API key it sees is recorded.
pub struct MockCompletion {
    responses: Mutex<Vec<MockResponse>>,
    fallback: MockResponse,
    requests: Mutex<Vec<(CompletionRequest, String)>>,
    call_count: AtomicUsize,
}

impl MockCompletion {
    /// Create a mock that always returns `response`.
    pub fn new(response: MockResponse) -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            fallback: response,
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Shorthand for a mock that always answers with `content`.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self::new(MockResponse::Content(content.into()))
    }

    /// Create a mock that returns responses in order, repeating the last.
    pub fn with_sequence(mut responses: Vec<MockResponse>) -> Self {
        assert!(
            !responses.is_empty(),
            "sequence must have at least one response"
        );
        responses.reverse();
        let fallback = responses[0].clone();
        Self {
            responses: Mutex::new(responses),
            fallback,
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `complete()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// The most recent request and the API key it was sent with.
    pub fn last_request(&self) -> Option<(CompletionRequest, String)> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    fn next_response(&self) -> MockResponse {
        let mut seq = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        seq.pop().unwrap_or_else(|| self.fallback.clone())
    }
}

impl CompletionBackend for MockCompletion {
    fn name(&self) -> &str {
        "mock"
    }

    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
        api_key: &'a str,
    ) -> CompletionFuture<'a> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((request.clone(), api_key.to_string()));
        let response = self.next_response();

        Box::pin(async move {
            match response {
                MockResponse::Content(content) => Ok(CompletionResponse::with_content(content)),
                MockResponse::Envelope(envelope) => Ok(CompletionResponse::from_envelope(envelope)),
                MockResponse::Upstream { status, body } => {
                    Err(ExtractError::Upstream { status, body })
                }
                MockResponse::NetworkError(msg) => Err(ExtractError::Backend(msg)),
            }
        })
    }
}
