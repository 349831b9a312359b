use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::require;
use super::MessageResponse;
use crate::db::{format_timestamp, JoinQueueRequest, QueueEntry, QueuePositionResponse};
use crate::engine::{queue_order, wait_time};
use crate::AppState;

/// Join a doctor's line. A patient may wait in only one line at a time.
///
/// POST /api/queue/join
pub async fn join_queue(
    State(state): State<Arc<AppState>>,
    Json(req): Json<JoinQueueRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    let user_id = require(&mut errors, "user_id", req.user_id);
    let doctor_id = require(&mut errors, "doctor_id", req.doctor_id);
    errors.finish()?;

    let (Some(user_id), Some(doctor_id)) = (user_id, doctor_id) else {
        return Err(ApiError::internal("Validation state is inconsistent"));
    };
    let is_emergency = req.is_emergency.unwrap_or(false);
    let joined_at = format_timestamp(chrono::Utc::now());

    let entry = QueueEntry::join(&state.db, &user_id, &doctor_id, is_emergency, &joined_at)
        .await
        .map_err(|e| match ApiError::from(e) {
            err if err.status() == StatusCode::CONFLICT => already_queued(),
            err => err,
        })?
        .ok_or_else(already_queued)?;

    tracing::info!(
        queue_id = entry.id,
        user_id = %entry.user_id,
        doctor_id = %entry.doctor_id,
        is_emergency = entry.is_emergency,
        "Patient joined queue"
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Successfully joined the queue")),
    ))
}

fn already_queued() -> ApiError {
    ApiError::conflict("You are already in a queue")
}

/// Position in line and estimated wait.
///
/// The position counts arrivals only; emergencies ahead in the doctor's view
/// do not change it.
///
/// GET /api/queue/position/:user_id
pub async fn get_queue_position(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<QueuePositionResponse>, ApiError> {
    let entry = QueueEntry::find_by_user(&state.db, &user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Not in a queue"))?;

    let line = QueueEntry::list_for_doctor(&state.db, &entry.doctor_id).await?;
    let position = queue_order::chronological_rank(&line, entry.id)
        .ok_or_else(|| ApiError::not_found("Not in a queue"))?;

    let estimated_wait_minutes = wait_time::estimate_for_doctor(
        &state.db,
        &entry.doctor_id,
        state.config.queue.default_wait_minutes,
    )
    .await?;

    Ok(Json(QueuePositionResponse {
        position,
        doctor_id: entry.doctor_id,
        estimated_wait_minutes,
    }))
}
