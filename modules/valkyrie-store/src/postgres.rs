//! PgStore — submission store backed by Postgres.
//!
//! The production backend. One row per submission; `id` is the primary
//! key, so duplicate ids are refused by the database itself rather than
//! by a read-check.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use valkyrie_common::{InvestmentRange, Submission, SubmissionKind};

use crate::error::{Result, StoreError};
use crate::store::SubmissionStore;

/// Store over a [`PgPool`]. The pool is built once at startup and owned
/// here; `PgPool` is safe for concurrent use across tasks, so one store
/// serves every request.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to Postgres and build the connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(unavailable)?;
        Ok(Self { pool })
    }

    /// Create the submissions table if it does not exist yet.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS submissions (
                id               TEXT         PRIMARY KEY,
                kind             TEXT         NOT NULL,
                name             TEXT         NOT NULL,
                email            TEXT         NOT NULL,
                company          TEXT         NOT NULL,
                role             TEXT         NOT NULL,
                message          TEXT         NOT NULL,
                investment_range TEXT,
                created_at       TIMESTAMPTZ  NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for PgStore {
    async fn append(&self, submission: &Submission) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO submissions (id, kind, name, email, company, role, message, investment_range, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&submission.id)
        .bind(submission.kind.as_str())
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&submission.company)
        .bind(&submission.role)
        .bind(&submission.message)
        .bind(submission.investment_range.map(|r| r.as_str()))
        .bind(submission.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::DuplicateId(submission.id.clone()))
            }
            Err(e) => Err(unavailable(e)),
        }
    }

    async fn list(&self) -> Result<Vec<Submission>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(
            r#"
            SELECT id, kind, name, email, company, role, message, investment_range, created_at
            FROM submissions
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM submissions")
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}

fn unavailable(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

// ---------------------------------------------------------------------------
// sqlx row mapping
// ---------------------------------------------------------------------------

struct SubmissionRow(Submission);

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for SubmissionRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> std::result::Result<Self, sqlx::Error> {
        use sqlx::Row;

        let kind: String = row.try_get("kind")?;
        let kind = kind
            .parse::<SubmissionKind>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "kind".to_string(),
                source: Box::new(e),
            })?;

        let investment_range: Option<String> = row.try_get("investment_range")?;
        let investment_range = investment_range
            .map(|r| r.parse::<InvestmentRange>())
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "investment_range".to_string(),
                source: Box::new(e),
            })?;

        Ok(SubmissionRow(Submission {
            id: row.try_get("id")?,
            kind,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            company: row.try_get("company")?,
            role: row.try_get("role")?,
            message: row.try_get("message")?,
            investment_range,
            created_at: row.try_get("created_at")?,
        }))
    }
}
