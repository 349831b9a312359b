use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use super::error::ApiError;
use super::validation::required_field;
use super::MessageResponse;
use crate::db::{
    format_timestamp, parse_timestamp, CompleteConsultationRequest, Consultation, QueueEntry,
    Role, User, UserResponse, WaitingPatient,
};
use crate::engine::{queue_order, wait_time};
use crate::AppState;

/// All registered doctors (password never included)
///
/// GET /api/doctors
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let doctors = User::list_by_role(&state.db, Role::Doctor).await?;
    Ok(Json(doctors.into_iter().map(UserResponse::from).collect()))
}

/// A doctor's line: emergencies first, then by arrival
///
/// GET /api/doctor/queue/:doctor_id
pub async fn get_doctor_queue(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Vec<WaitingPatient>>, ApiError> {
    let mut patients = WaitingPatient::list_for_doctor(&state.db, &doctor_id).await?;
    queue_order::priority_order(&mut patients);
    Ok(Json(patients))
}

/// Close a queue entry and record the consultation
///
/// POST /api/doctor/complete_consultation
pub async fn complete_consultation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CompleteConsultationRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let queue_id = required_field("queue_id", req.queue_id)?;

    let entry = QueueEntry::find_by_id(&state.db, queue_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Queue entry not found"))?;

    let joined_at = parse_timestamp(&entry.joined_at).map_err(|e| {
        tracing::error!(queue_id = queue_id, "Stored joined_at '{}' is invalid: {}", entry.joined_at, e);
        ApiError::internal("Queue entry has an invalid timestamp")
    })?;
    let now = chrono::Utc::now();
    let duration = wait_time::consultation_minutes(joined_at, now);

    let consultation = Consultation::complete(&state.db, &entry, &format_timestamp(now), duration)
        .await?
        .ok_or_else(|| ApiError::not_found("Queue entry not found"))?;

    tracing::info!(
        queue_id = queue_id,
        consultation_id = consultation.id,
        doctor_id = %consultation.doctor_id,
        duration_minutes = duration,
        "Consultation completed"
    );

    Ok(Json(MessageResponse::new("Consultation completed successfully")))
}
