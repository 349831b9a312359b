use axum::{extract::State, Json};
use std::sync::Arc;

use super::error::ApiError;
use crate::engine::analytics::{stored_totals, AnalyticsReport};
use crate::AppState;

/// Admin dashboard. `peak_hours` and `no_show_rate` are simulated.
///
/// GET /api/admin/analytics
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AnalyticsReport>, ApiError> {
    let totals = stored_totals(&state.db).await?;
    // ThreadRng is !Send, so it must not live across an await
    let report = AnalyticsReport::new(totals, &mut rand::rng());
    Ok(Json(report))
}
