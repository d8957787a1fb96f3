//! Registration, login and logout.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::middleware::AuthUser;
use crate::auth::registration::{self, RegistrationForm};
use crate::auth::{password, tokens};
use crate::error::{ApiError, ApiErrorBody};
use crate::models::account::NewAccount;
use crate::models::car::NewCar;
use crate::models::profile::NewProfile;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

// ---------------------------------------------------------------------------
// POST /api/v1/register
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub username: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/register",
    tag = "Accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Validation failed", body = ApiErrorBody),
        (status = 409, description = "Username taken", body = ApiErrorBody),
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let username = body.username.trim().to_lowercase();
    let first_name = body.first_name.trim();
    let last_name = body.last_name.trim();

    let taken = !username.is_empty() && state.accounts.username_exists(&username).await?;
    registration::validate_registration(
        &RegistrationForm {
            username: &username,
            first_name,
            last_name,
            password: &body.password,
            password_confirm: &body.password_confirm,
        },
        taken,
    )
    .map_err(ApiError::form)?;

    let password_hash = password::hash_password(&body.password)?;

    state
        .accounts
        .register(
            NewAccount {
                username: username.clone(),
                password_hash,
            },
            NewProfile {
                username: username.clone(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                join_date: Utc::now().date_naive(),
            },
            NewCar::placeholder(&username),
        )
        .await?;

    tracing::info!(%username, "account registered");

    Ok((StatusCode::CREATED, Json(RegisterResponse { username })))
}

// ---------------------------------------------------------------------------
// POST /api/v1/login
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub username: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/login",
    tag = "Accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ApiErrorBody),
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = body.username.trim().to_lowercase();

    // Same response for unknown users and wrong passwords.
    let valid = match state.accounts.password_hash(&username).await? {
        Some(hash) => password::authenticate_password(&body.password, &hash),
        None => false,
    };
    if !valid {
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let access_token = tokens::generate_access_token();
    tokens::store_access_token(
        state.kv.as_ref(),
        &access_token,
        &tokens::AccessTokenData {
            username: username.clone(),
        },
    )
    .await?;

    tracing::info!(%username, "user logged in");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: tokens::ACCESS_TOKEN_TTL_SECS,
        username,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/logout
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/logout",
    tag = "Accounts",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
    ),
)]
pub async fn logout(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    tokens::delete_access_token(state.kv.as_ref(), &auth.token).await?;
    tracing::info!(username = %auth.username, "user logged out");
    Ok(StatusCode::NO_CONTENT)
}
