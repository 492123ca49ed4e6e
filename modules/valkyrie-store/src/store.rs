use async_trait::async_trait;

use valkyrie_common::Submission;

use crate::error::Result;

/// Pluggable persistence for waitlist submissions.
///
/// Every operation is a single awaited unit of work. The store never
/// retries internally: each call either succeeds or fails once and
/// reports upward.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Insert a new submission. Fails with `StoreError::DuplicateId` if a
    /// record with the same id already exists; a failed append leaves the
    /// store unchanged.
    async fn append(&self, submission: &Submission) -> Result<()>;

    /// All submissions, newest first by creation time. An empty store
    /// yields an empty vec, never an error.
    async fn list(&self) -> Result<Vec<Submission>>;

    /// Delete a submission by id. Deleting an unknown id is a no-op.
    async fn delete_by_id(&self, id: &str) -> Result<()>;

    /// Remove every submission. Idempotent.
    async fn clear(&self) -> Result<()>;
}
