//! Wait-time estimation from consultation history.
//!
//! The estimate is a plain queueing-delay proxy: mean historical consultation
//! length for the doctor times the number of people currently in their line.
//! There is no trained model behind it.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::{Consultation, QueueEntry};

/// Estimate used when a doctor has no usable consultation history
pub const DEFAULT_WAIT_MINUTES: i64 = 15;

/// Mean of the known durations times the line length, truncated.
///
/// Returns `fallback` when no duration is known; the line length plays no
/// part in that case.
pub fn estimate_wait_minutes(durations: &[Option<i64>], queue_length: i64, fallback: i64) -> i64 {
    let known: Vec<i64> = durations.iter().flatten().copied().collect();
    if known.is_empty() {
        return fallback;
    }

    let mean = known.iter().sum::<i64>() as f64 / known.len() as f64;
    (mean * queue_length as f64) as i64
}

/// Whole minutes between joining the line and completion, never below 1.
///
/// Whole days count toward the total, so a wait crossing midnight or lasting
/// more than a day is not reduced to its seconds-within-a-day remainder.
pub fn consultation_minutes(joined_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> i64 {
    let minutes = (ended_at - joined_at).num_seconds().div_euclid(60);
    if minutes > 0 {
        minutes
    } else {
        1
    }
}

/// Current estimate for one doctor's line
pub async fn estimate_for_doctor(
    db: &SqlitePool,
    doctor_id: &str,
    fallback: i64,
) -> Result<i64, sqlx::Error> {
    let durations = Consultation::durations_for_doctor(db, doctor_id).await?;
    if durations.iter().all(Option::is_none) {
        return Ok(fallback);
    }

    let queue_length = QueueEntry::count_for_doctor(db, doctor_id).await?;
    Ok(estimate_wait_minutes(&durations, queue_length, fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_no_history_uses_default_regardless_of_length() {
        for length in [0, 1, 5, 40] {
            assert_eq!(estimate_wait_minutes(&[], length, DEFAULT_WAIT_MINUTES), 15);
        }
        assert_eq!(estimate_wait_minutes(&[None, None], 3, DEFAULT_WAIT_MINUTES), 15);
    }

    #[test]
    fn test_mean_times_length() {
        let history = [Some(10), Some(20), Some(30)];
        assert_eq!(estimate_wait_minutes(&history, 2, DEFAULT_WAIT_MINUTES), 40);
        assert_eq!(estimate_wait_minutes(&history, 0, DEFAULT_WAIT_MINUTES), 0);
    }

    #[test]
    fn test_missing_durations_are_ignored_and_result_truncated() {
        // mean of 10 and 15 is 12.5; 12.5 * 3 = 37.5
        let history = [Some(10), None, Some(15)];
        assert_eq!(estimate_wait_minutes(&history, 3, DEFAULT_WAIT_MINUTES), 37);
    }

    #[test]
    fn test_consultation_minutes_floor_and_clamp() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        assert_eq!(consultation_minutes(start, start), 1);
        assert_eq!(consultation_minutes(start, start + chrono::Duration::seconds(59)), 1);
        assert_eq!(consultation_minutes(start, start + chrono::Duration::seconds(179)), 2);
        assert_eq!(consultation_minutes(start, start + chrono::Duration::minutes(45)), 45);
        assert_eq!(consultation_minutes(start, start + chrono::Duration::days(1)), 1440);
        let day_and_change = chrono::Duration::days(1) + chrono::Duration::seconds(5 * 60 + 59);
        assert_eq!(consultation_minutes(start, start + day_and_change), 1445);
        // Clock skew never yields a zero or negative duration
        assert_eq!(consultation_minutes(start, start - chrono::Duration::minutes(5)), 1);
    }

    #[tokio::test]
    async fn test_estimate_for_doctor_uses_history_and_line_length() {
        let db = crate::db::init_in_memory().await.unwrap();

        assert_eq!(estimate_for_doctor(&db, "d1", DEFAULT_WAIT_MINUTES).await.unwrap(), 15);

        for minutes in [10, 20, 30] {
            sqlx::query(
                "INSERT INTO consultations (patient_id, doctor_id, start_time, end_time, duration_minutes) VALUES ('p', 'd1', '', '', ?)",
            )
            .bind(minutes)
            .execute(&db)
            .await
            .unwrap();
        }
        QueueEntry::join(&db, "p1", "d1", false, "2024-03-01T09:00:00.000000Z").await.unwrap();
        QueueEntry::join(&db, "p2", "d1", true, "2024-03-01T09:01:00.000000Z").await.unwrap();
        QueueEntry::join(&db, "p3", "d2", false, "2024-03-01T09:02:00.000000Z").await.unwrap();

        assert_eq!(estimate_for_doctor(&db, "d1", DEFAULT_WAIT_MINUTES).await.unwrap(), 40);
    }
}
