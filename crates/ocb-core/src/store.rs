//! SQLite-backed submission archive.
//!
//! Append-only: submissions are inserted once and never updated or deleted.
//! Each insert is its own transaction; SQLite's serialization of writers is
//! the only ordering guarantee between concurrent handlers.

use std::path::Path;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use crate::domain::{NewSubmission, Submission, UserId};
use crate::{errors::Error, Result};

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS submissions (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    submitter      INTEGER NOT NULL,
    handle         TEXT,
    text           TEXT NOT NULL,
    created_at     TEXT NOT NULL,
    internet_score REAL
)";

pub struct SubmissionStore {
    pool: SqlitePool,
}

impl SubmissionStore {
    /// Open (creating if missing) the submissions database and ensure the
    /// schema exists.
    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// In-memory database for tests. A single connection, so every query sees
    /// the same memory store.
    pub async fn open_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Archive one submission. The store assigns the id and timestamp.
    pub async fn insert(&self, new: NewSubmission) -> Result<Submission> {
        let created_at = Utc::now();

        let row = sqlx::query(
            "INSERT INTO submissions (submitter, handle, text, created_at, internet_score)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(new.submitter.0)
        .bind(&new.handle)
        .bind(&new.text)
        .bind(created_at.to_rfc3339())
        .bind(new.internet_score)
        .fetch_one(&self.pool)
        .await?;

        Ok(Submission {
            id: row.get::<i64, _>(0),
            submitter: new.submitter,
            handle: new.handle,
            text: new.text,
            created_at,
            internet_score: new.internet_score,
        })
    }

    /// Full history, oldest first. Every comparison reads the whole table.
    pub async fn all(&self) -> Result<Vec<Submission>> {
        let rows = sqlx::query(
            "SELECT id, submitter, handle, text, created_at, internet_score
             FROM submissions ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_submission).collect()
    }

    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) FROM submissions")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>(0))
    }
}

fn row_to_submission(row: SqliteRow) -> Result<Submission> {
    let created_at_raw: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
        .map_err(|e| Error::External(format!("bad created_at in store: {e}")))?
        .with_timezone(&Utc);

    Ok(Submission {
        id: row.get("id"),
        submitter: UserId(row.get("submitter")),
        handle: row.get("handle"),
        text: row.get("text"),
        created_at,
        internet_score: row.get("internet_score"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_sub(submitter: i64, handle: Option<&str>, text: &str) -> NewSubmission {
        NewSubmission {
            submitter: UserId(submitter),
            handle: handle.map(|s| s.to_string()),
            text: text.to_string(),
            internet_score: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = SubmissionStore::open_in_memory().await.unwrap();

        let a = store.insert(new_sub(1, Some("alice"), "first")).await.unwrap();
        let b = store.insert(new_sub(2, None, "second")).await.unwrap();

        assert!(b.id > a.id);
        assert!(b.created_at >= a.created_at);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn all_returns_rows_oldest_first() {
        let store = SubmissionStore::open_in_memory().await.unwrap();

        store.insert(new_sub(1, Some("alice"), "first")).await.unwrap();
        store.insert(new_sub(2, Some("bob"), "second")).await.unwrap();

        let rows = store.all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text, "first");
        assert_eq!(rows[1].text, "second");
        assert_eq!(rows[0].handle.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn internet_score_round_trips() {
        let store = SubmissionStore::open_in_memory().await.unwrap();

        let mut with_score = new_sub(1, None, "scanned");
        with_score.internet_score = Some(42.5);
        store.insert(with_score).await.unwrap();
        store.insert(new_sub(2, None, "unscanned")).await.unwrap();

        let rows = store.all().await.unwrap();
        assert_eq!(rows[0].internet_score, Some(42.5));
        assert_eq!(rows[1].internet_score, None);
    }
}
