//! Completed consultations, kept as history for wait estimates and analytics.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::QueueEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Consultation {
    pub id: i64,
    pub patient_id: String,
    pub doctor_id: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteConsultationRequest {
    pub queue_id: Option<i64>,
}

impl Consultation {
    /// Close a queue entry: record the consultation and remove the entry.
    ///
    /// Both writes commit together. Returns `None` without writing anything if
    /// the entry was already removed by someone else.
    pub async fn complete(
        db: &SqlitePool,
        entry: &QueueEntry,
        end_time: &str,
        duration_minutes: i64,
    ) -> Result<Option<Consultation>, sqlx::Error> {
        let mut tx = db.begin().await?;

        let deleted = sqlx::query("DELETE FROM queue_entries WHERE id = ?")
            .bind(entry.id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO consultations (patient_id, doctor_id, start_time, end_time, duration_minutes)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.user_id)
        .bind(&entry.doctor_id)
        .bind(&entry.joined_at)
        .bind(end_time)
        .bind(duration_minutes)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(Consultation {
            id: result.last_insert_rowid(),
            patient_id: entry.user_id.clone(),
            doctor_id: entry.doctor_id.clone(),
            start_time: entry.joined_at.clone(),
            end_time: end_time.to_string(),
            duration_minutes: Some(duration_minutes),
        }))
    }

    /// Historical durations for one doctor; rows without a duration come back as `None`
    pub async fn durations_for_doctor(
        db: &SqlitePool,
        doctor_id: &str,
    ) -> Result<Vec<Option<i64>>, sqlx::Error> {
        sqlx::query_scalar("SELECT duration_minutes FROM consultations WHERE doctor_id = ?")
            .bind(doctor_id)
            .fetch_all(db)
            .await
    }

    /// Mean duration across every consultation, `None` when there are none
    pub async fn average_duration(db: &SqlitePool) -> Result<Option<f64>, sqlx::Error> {
        sqlx::query_scalar("SELECT AVG(duration_minutes) FROM consultations")
            .fetch_one(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn count(db: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(db)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_complete_moves_entry_into_history() {
        let db = crate::db::init_in_memory().await.unwrap();
        let entry = QueueEntry::join(&db, "p1", "d1", true, "2024-03-01T09:00:00.000000Z")
            .await
            .unwrap()
            .unwrap();

        let consultation = Consultation::complete(&db, &entry, "2024-03-01T09:12:30.000000Z", 12)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(consultation.patient_id, "p1");
        assert_eq!(consultation.doctor_id, "d1");
        assert_eq!(consultation.start_time, entry.joined_at);
        assert_eq!(consultation.duration_minutes, Some(12));

        assert_eq!(count(&db, "queue_entries").await, 0);
        assert_eq!(count(&db, "consultations").await, 1);
    }

    #[tokio::test]
    async fn test_complete_twice_writes_history_once() {
        let db = crate::db::init_in_memory().await.unwrap();
        let entry = QueueEntry::join(&db, "p1", "d1", false, "2024-03-01T09:00:00.000000Z")
            .await
            .unwrap()
            .unwrap();

        assert!(Consultation::complete(&db, &entry, "2024-03-01T09:05:00.000000Z", 5)
            .await
            .unwrap()
            .is_some());
        assert!(Consultation::complete(&db, &entry, "2024-03-01T09:06:00.000000Z", 6)
            .await
            .unwrap()
            .is_none());

        assert_eq!(count(&db, "consultations").await, 1);
    }

    #[tokio::test]
    async fn test_durations_and_average() {
        let db = crate::db::init_in_memory().await.unwrap();
        assert_eq!(Consultation::average_duration(&db).await.unwrap(), None);

        for (doctor, minutes) in [("d1", Some(10)), ("d1", None), ("d2", Some(30))] {
            sqlx::query(
                "INSERT INTO consultations (patient_id, doctor_id, start_time, end_time, duration_minutes) VALUES ('p', ?, '', '', ?)",
            )
            .bind(doctor)
            .bind(minutes)
            .execute(&db)
            .await
            .unwrap();
        }

        let mut durations = Consultation::durations_for_doctor(&db, "d1").await.unwrap();
        durations.sort();
        assert_eq!(durations, vec![None, Some(10)]);

        // AVG ignores NULL rows
        let avg = Consultation::average_duration(&db).await.unwrap().unwrap();
        assert!((avg - 20.0).abs() < f64::EPSILON);
    }
}
