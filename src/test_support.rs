//! Loopback HTTP client and a canned completion service for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use reqwest::Client;

use crate::error::CompletionError;
use crate::extract::{CompletionRequest, CompletionService};

/// Client that never routes loopback traffic through a proxy.
pub fn local_client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}

/// Completion service that always answers with the same reply.
pub struct CannedCompletion {
    reply: String,
    calls: AtomicUsize,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl CannedCompletion {
    pub fn new(reply: impl Into<String>) -> Self {
        CannedCompletion {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl CompletionService for CannedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        Ok(self.reply.clone())
    }
}
