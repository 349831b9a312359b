//! Registration and login.
//!
//! Passwords are stored and compared as plaintext and no session or token is
//! issued: the client keeps `user_id` and `role` itself. This is only fit for
//! demos and tests. Anything facing real patients needs hashed passwords and
//! real sessions first.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{require, required_field, validate_role};
use crate::db::{CreateUser, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User};
use crate::AppState;

/// POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    let email = require(&mut errors, "email", req.email);
    let password = require(&mut errors, "password", req.password);
    let role = require(&mut errors, "role", req.role).and_then(|role| match validate_role(&role) {
        Ok(role) => Some(role),
        Err(msg) => {
            errors.add("role", msg);
            None
        }
    });
    errors.finish()?;

    // finish() returned Ok, so every required field is present
    let (Some(email), Some(password), Some(role)) = (email, password, role) else {
        return Err(ApiError::internal("Validation state is inconsistent"));
    };

    let user = User::create(
        &state.db,
        &CreateUser {
            email,
            password,
            role,
            first_name: req.first_name.unwrap_or_default(),
            last_name: req.last_name.unwrap_or_default(),
            specialty: req.specialty.unwrap_or_default(),
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, role = %role, "Registered user {}", user.email);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id: user.id,
        }),
    ))
}

/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = required_field("email", req.email)?;
    let password = required_field("password", req.password)?;

    let user = User::find_by_credentials(&state.db, &email, &password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    tracing::debug!(user_id = %user.id, "Login successful");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user_id: user.id,
        role: user.role,
    }))
}
