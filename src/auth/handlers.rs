// HTTP handlers for authentication endpoints

use crate::auth::{
    error::AuthError,
    middleware::Bearer,
    models::{AuthResponse, LoginRequest, RegisterRequest, UserView},
    service::AuthService,
};
use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;

/// Register a new user
/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Missing field, invalid email, or weak password"),
        (status = 409, description = "Email already registered"),
        (status = 503, description = "Credential store unavailable")
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(service): State<Arc<AuthService>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    tracing::debug!("Registration request received");
    let response = service.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login a user
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid email or password"),
        (status = 503, description = "Credential store unavailable")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(service): State<Arc<AuthService>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    tracing::debug!("Login request received");
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Get the authenticated user's profile
/// GET /api/auth/profile
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = UserView),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User no longer exists"),
        (status = 503, description = "Credential store unavailable")
    ),
    security(("bearer_token" = [])),
    tag = "auth"
)]
pub async fn profile_handler(
    State(service): State<Arc<AuthService>>,
    Bearer(token): Bearer,
) -> Result<Json<UserView>, AuthError> {
    let view = service.profile(token.as_deref()).await?;
    Ok(Json(view))
}

/// Logout (stateless no-op)
/// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logout successful")
    ),
    tag = "auth"
)]
pub async fn logout_handler(
    State(service): State<Arc<AuthService>>,
) -> Json<serde_json::Value> {
    service.logout();
    Json(json!({ "message": "Logout successful" }))
}
