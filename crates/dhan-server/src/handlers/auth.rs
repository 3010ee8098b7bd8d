//! Authentication handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use dhan_core::auth::{hash_password, verify_password};
use dhan_core::models::{NewUser, User};

use crate::{issue_token, AppError, AppState, AuthUser};

/// Request body for POST /api/auth/register
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Request body for POST /api/auth/token
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for POST /api/auth/token
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /api/auth/register - Create a new user account
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<User>, AppError> {
    let email = body.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::bad_request("A valid email is required"));
    }
    if body.password.len() < 8 {
        return Err(AppError::bad_request(
            "Password must be at least 8 characters",
        ));
    }
    if body.full_name.trim().is_empty() {
        return Err(AppError::bad_request("Name is required"));
    }

    let password_hash = hash_password(&body.password)?;
    let user = state
        .db
        .create_user(&NewUser {
            email,
            password_hash,
            full_name: body.full_name.trim().to_string(),
        })
        .map_err(|e| match e {
            // Duplicate email
            dhan_core::Error::InvalidData(msg) => AppError::conflict(&msg),
            other => AppError::from_core(other),
        })?;

    info!(user_id = user.id, "User registered");
    Ok(Json(user))
}

/// POST /api/auth/token - Exchange credentials for a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let email = body.email.trim().to_lowercase();

    // Unknown email and wrong password produce the same response
    let (user, stored_hash) = state
        .db
        .find_credentials(&email)?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    if !verify_password(&body.password, &stored_hash)? {
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let access_token = issue_token(&state.config, user.id)?;
    info!(user_id = user.id, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// GET /api/auth/me - The currently authenticated user
pub async fn get_me(Extension(AuthUser(user)): Extension<AuthUser>) -> Json<User> {
    Json(user)
}
