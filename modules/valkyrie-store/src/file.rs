use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use valkyrie_common::Submission;

use crate::error::{Result, StoreError};
use crate::store::SubmissionStore;

/// Flat-file store: one pretty-printed JSON array, rewritten wholesale on
/// every mutation. A missing or empty file reads as no submissions.
///
/// All operations serialize behind a single mutex, so concurrent
/// read-modify-write cycles cannot lose updates. Dev/test oriented; the
/// production backend is [`crate::PgStore`].
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Vec<Submission>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, submissions: &[Submission]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let json = serde_json::to_vec_pretty(submissions)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for FileStore {
    async fn append(&self, submission: &Submission) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut submissions = self.read_all().await?;
        if submissions.iter().any(|s| s.id == submission.id) {
            return Err(StoreError::DuplicateId(submission.id.clone()));
        }
        submissions.push(submission.clone());
        self.write_all(&submissions).await
    }

    async fn list(&self) -> Result<Vec<Submission>> {
        let _guard = self.lock.lock().await;
        let mut submissions = self.read_all().await?;
        submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(submissions)
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut submissions = self.read_all().await?;
        submissions.retain(|s| s.id != id);
        self.write_all(&submissions).await
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.write_all(&[]).await
    }
}
