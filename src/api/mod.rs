mod analytics;
pub mod auth;
mod doctors;
pub mod error;
mod queue;
mod validation;


use axum::{
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Plain `{ "message": ... }` acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Accounts
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/doctors", get(doctors::list_doctors))
        // Patient side of the queue
        .route("/queue/join", post(queue::join_queue))
        .route("/queue/position/:user_id", get(queue::get_queue_position))
        // Doctor side of the queue
        .route("/doctor/queue/:doctor_id", get(doctors::get_doctor_queue))
        .route(
            "/doctor/complete_consultation",
            post(doctors::complete_consultation),
        )
        // Admin
        .route("/admin/analytics", get(analytics::get_analytics));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
