use async_trait::async_trait;
use tokio::sync::Mutex;

use valkyrie_common::Submission;

use crate::error::{Result, StoreError};
use crate::store::SubmissionStore;

/// Session-scoped store. Contents are gone when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    submissions: Mutex<Vec<Submission>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn append(&self, submission: &Submission) -> Result<()> {
        let mut submissions = self.submissions.lock().await;
        if submissions.iter().any(|s| s.id == submission.id) {
            return Err(StoreError::DuplicateId(submission.id.clone()));
        }
        submissions.push(submission.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Submission>> {
        let mut submissions = self.submissions.lock().await.clone();
        submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(submissions)
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.submissions.lock().await.retain(|s| s.id != id);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.submissions.lock().await.clear();
        Ok(())
    }
}
