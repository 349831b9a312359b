//! Per-doctor waiting line entries.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::engine::queue_order::Queued;

/// A patient's place in one doctor's line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct QueueEntry {
    pub id: i64,
    pub user_id: String,
    pub doctor_id: String,
    pub joined_at: String,
    pub is_emergency: bool,
}

impl Queued for QueueEntry {
    fn is_emergency(&self) -> bool {
        self.is_emergency
    }

    fn joined_at(&self) -> &str {
        &self.joined_at
    }

    fn sequence(&self) -> i64 {
        self.id
    }
}

/// Queue entry joined with the waiting patient's name, for the doctor view
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WaitingPatient {
    pub queue_id: i64,
    pub user_id: String,
    #[serde(skip)]
    pub first_name: String,
    #[serde(skip)]
    pub last_name: String,
    #[sqlx(skip)]
    pub name: String,
    pub joined_at: String,
    pub is_emergency: bool,
}

impl Queued for WaitingPatient {
    fn is_emergency(&self) -> bool {
        self.is_emergency
    }

    fn joined_at(&self) -> &str {
        &self.joined_at
    }

    fn sequence(&self) -> i64 {
        self.queue_id
    }
}

#[derive(Debug, Deserialize)]
pub struct JoinQueueRequest {
    pub user_id: Option<String>,
    pub doctor_id: Option<String>,
    pub is_emergency: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueuePositionResponse {
    pub position: usize,
    pub doctor_id: String,
    pub estimated_wait_minutes: i64,
}

impl QueueEntry {
    /// Add a patient to a doctor's line unless they already wait in any line.
    ///
    /// Returns `None` when the user already holds an entry. The unique index
    /// on `user_id` decides this in a single statement, so concurrent joins by
    /// different patients never contend on a read-then-write upgrade.
    pub async fn join(
        db: &SqlitePool,
        user_id: &str,
        doctor_id: &str,
        is_emergency: bool,
        joined_at: &str,
    ) -> Result<Option<QueueEntry>, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO queue_entries (user_id, doctor_id, joined_at, is_emergency) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(doctor_id)
        .bind(joined_at)
        .bind(is_emergency)
        .execute(db)
        .await;

        let result = match result {
            Ok(result) => result,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(Some(QueueEntry {
            id: result.last_insert_rowid(),
            user_id: user_id.to_string(),
            doctor_id: doctor_id.to_string(),
            joined_at: joined_at.to_string(),
            is_emergency,
        }))
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<QueueEntry>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM queue_entries WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_user(
        db: &SqlitePool,
        user_id: &str,
    ) -> Result<Option<QueueEntry>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM queue_entries WHERE user_id = ? LIMIT 1")
            .bind(user_id)
            .fetch_optional(db)
            .await
    }

    /// All entries in a doctor's line, oldest first
    pub async fn list_for_doctor(
        db: &SqlitePool,
        doctor_id: &str,
    ) -> Result<Vec<QueueEntry>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM queue_entries WHERE doctor_id = ? ORDER BY joined_at ASC, id ASC")
            .bind(doctor_id)
            .fetch_all(db)
            .await
    }

    pub async fn count_for_doctor(db: &SqlitePool, doctor_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM queue_entries WHERE doctor_id = ?")
            .bind(doctor_id)
            .fetch_one(db)
            .await
    }
}

impl WaitingPatient {
    /// Entries in a doctor's line with patient names attached.
    ///
    /// Entries whose patient record is missing are left out. Rows come back
    /// unordered; callers apply [`crate::engine::queue_order::priority_order`].
    pub async fn list_for_doctor(
        db: &SqlitePool,
        doctor_id: &str,
    ) -> Result<Vec<WaitingPatient>, sqlx::Error> {
        let mut rows: Vec<WaitingPatient> = sqlx::query_as(
            r#"
            SELECT q.id AS queue_id, q.user_id, u.first_name, u.last_name,
                   q.joined_at, q.is_emergency
            FROM queue_entries q
            INNER JOIN users u ON u.id = q.user_id
            WHERE q.doctor_id = ?
            "#,
        )
        .bind(doctor_id)
        .fetch_all(db)
        .await?;

        for row in &mut rows {
            row.name = format!("{} {}", row.first_name, row.last_name);
        }

        Ok(rows)
    }
}
