//! Test doubles shared by the handler and auth tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use valkyrie_common::Submission;
use valkyrie_store::{MemoryStore, StoreError, SubmissionStore};

use crate::AppState;

/// Store double that records which operations were invoked, delegating to
/// an in-memory store for actual behavior.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    append_called: AtomicBool,
    list_called: AtomicBool,
    delete_called: AtomicBool,
    clear_called: AtomicBool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_was_called(&self) -> bool {
        self.append_called.load(Ordering::SeqCst)
    }

    pub fn any_call(&self) -> bool {
        self.append_called.load(Ordering::SeqCst)
            || self.list_called.load(Ordering::SeqCst)
            || self.delete_called.load(Ordering::SeqCst)
            || self.clear_called.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionStore for RecordingStore {
    async fn append(&self, submission: &Submission) -> Result<(), StoreError> {
        self.append_called.store(true, Ordering::SeqCst);
        self.inner.append(submission).await
    }

    async fn list(&self) -> Result<Vec<Submission>, StoreError> {
        self.list_called.store(true, Ordering::SeqCst);
        self.inner.list().await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.delete_called.store(true, Ordering::SeqCst);
        self.inner.delete_by_id(id).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.clear_called.store(true, Ordering::SeqCst);
        self.inner.clear().await
    }
}

/// Store double where every operation fails as unreachable.
pub struct FailingStore;

#[async_trait]
impl SubmissionStore for FailingStore {
    async fn append(&self, _submission: &Submission) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("backend offline".to_string()))
    }

    async fn list(&self) -> Result<Vec<Submission>, StoreError> {
        Err(StoreError::Unavailable("backend offline".to_string()))
    }

    async fn delete_by_id(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("backend offline".to_string()))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("backend offline".to_string()))
    }
}

pub fn test_state(store: Arc<dyn SubmissionStore>) -> Arc<AppState> {
    Arc::new(AppState {
        store,
        admin_email: "admin@example.com".to_string(),
        admin_password: "hunter2".to_string(),
        admin_token: "test-admin-token".to_string(),
        rate_limiter: Mutex::new(HashMap::new()),
    })
}

pub fn client_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 40000))
}

/// Read a response body back into JSON for assertions.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
