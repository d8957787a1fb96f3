//! Public profiles, ratings and the caller's own settings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use travel_common::FuelType;
use utoipa::ToSchema;

use crate::auth::middleware::AuthUser;
use crate::error::{ApiError, ApiErrorBody, FieldError};
use crate::models::car::{Car, CarChanges};
use crate::models::profile::{Profile, ProfileChanges};
use crate::models::rating::{DriverRating, NewRating};
use crate::search_stats;
use crate::AppState;

const BIO_LIMIT: usize = 180;
const NAME_LIMIT: usize = 20;
const MAKE_LIMIT: usize = 50;
const MAX_MPG: i32 = 999;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile/{username}", get(get_profile))
        .route("/profile/{username}/ratings", post(rate_user))
        .route("/settings", get(get_settings))
        .route("/settings/profile", patch(update_profile))
        .route("/settings/car", patch(update_car))
}

// ---------------------------------------------------------------------------
// GET /api/v1/profile/{username}
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct PublicProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub photo: Option<String>,
    pub verified: bool,
    pub join_date: NaiveDate,
    pub rating: DriverRating,
}

#[utoipa::path(
    get,
    path = "/api/v1/profile/{username}",
    tag = "Profiles",
    params(
        ("username" = String, Path, description = "Username"),
    ),
    responses(
        (status = 200, description = "Public profile", body = PublicProfile),
        (status = 404, description = "Not found", body = ApiErrorBody),
    ),
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<PublicProfile>, ApiError> {
    let username = username.to_lowercase();
    let profile = state
        .accounts
        .profile(&username)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("The username {username} does not exist")))?;
    let rating = state.accounts.driver_rating(&username).await?;

    Ok(Json(PublicProfile {
        username: profile.username,
        first_name: profile.first_name,
        last_name: profile.last_name,
        bio: profile.bio,
        photo: profile.photo,
        verified: profile.verified,
        join_date: profile.join_date,
        rating,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/profile/{username}/ratings
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct RateRequest {
    pub rating: i32,
}

#[utoipa::path(
    post,
    path = "/api/v1/profile/{username}/ratings",
    tag = "Profiles",
    security(("bearer" = [])),
    params(
        ("username" = String, Path, description = "User being rated"),
    ),
    request_body = RateRequest,
    responses(
        (status = 201, description = "Rating recorded", body = DriverRating),
        (status = 400, description = "Validation failed", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 404, description = "Not found", body = ApiErrorBody),
    ),
)]
pub async fn rate_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(body): Json<RateRequest>,
) -> Result<(StatusCode, Json<DriverRating>), ApiError> {
    let username = username.to_lowercase();
    if !state.accounts.username_exists(&username).await? {
        return Err(ApiError::not_found(format!(
            "The username {username} does not exist"
        )));
    }

    let mut errors = Vec::new();
    if username == auth.username {
        errors.push(FieldError::new("rating", "You cannot rate yourself"));
    }
    if !(1..=5).contains(&body.rating) {
        errors.push(FieldError::new("rating", "Rating must be between 1 and 5"));
    }
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    state
        .accounts
        .add_rating(NewRating {
            rated_username: username.clone(),
            rating_given: body.rating,
        })
        .await?;
    tracing::info!(rated = %username, by = %auth.username, rating = body.rating, "rating added");

    let rating = state.accounts.driver_rating(&username).await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

// ---------------------------------------------------------------------------
// GET /api/v1/settings
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsResponse {
    pub profile: Profile,
    pub car: Car,
    /// Distinct routes the caller has searched.
    pub routes_searched: i64,
    /// Debounced search total across those routes.
    pub total_searches: i64,
}

#[utoipa::path(
    get,
    path = "/api/v1/settings",
    tag = "Settings",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Own profile and car", body = SettingsResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
    ),
)]
pub async fn get_settings(
    AuthUser { username, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let profile = state
        .accounts
        .profile(&username)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;
    let car = state
        .accounts
        .car(&username)
        .await?
        .ok_or_else(|| ApiError::not_found("Car not found"))?;

    let (routes_searched, total_searches) =
        search_stats::get_total_routes_searched(state.searches.as_ref(), &username).await?;

    Ok(Json(SettingsResponse {
        profile,
        car,
        routes_searched,
        total_searches,
    }))
}

// ---------------------------------------------------------------------------
// PATCH /api/v1/settings/profile
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    /// Only applied together with `work`.
    pub home: Option<String>,
    /// Only applied together with `home`.
    pub work: Option<String>,
}

fn check_name(field: &str, label: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.is_empty() || value.chars().count() > NAME_LIMIT || value.contains(' ') {
        errors.push(FieldError::new(
            field,
            format!("{label} must be 1-{NAME_LIMIT} characters with no spaces"),
        ));
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/settings/profile",
    tag = "Settings",
    security(("bearer" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 400, description = "Validation failed", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
    ),
)]
pub async fn update_profile(
    AuthUser { username, .. }: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let mut errors = Vec::new();
    if let Some(bio) = &body.bio {
        if bio.chars().count() > BIO_LIMIT {
            errors.push(FieldError::new(
                "bio",
                format!("Bio must be at most {BIO_LIMIT} characters"),
            ));
        }
    }
    check_name("first_name", "First name", &body.first_name, &mut errors);
    check_name("last_name", "Last name", &body.last_name, &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let (home, work) = match (body.home, body.work) {
        (Some(home), Some(work)) => (Some(home), Some(work)),
        _ => (None, None),
    };

    let profile = state
        .accounts
        .update_profile(
            &username,
            ProfileChanges {
                first_name: body.first_name,
                last_name: body.last_name,
                bio: body.bio,
                home,
                work,
            },
        )
        .await?;
    tracing::info!(%username, "profile updated");

    Ok(Json(profile))
}

// ---------------------------------------------------------------------------
// PATCH /api/v1/settings/car
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCarRequest {
    pub make: String,
    pub mpg: i32,
    /// `petrol`, `diesel` or `electric`.
    pub fuel_type: String,
    /// Litres.
    pub engine_size: f64,
}

#[utoipa::path(
    patch,
    path = "/api/v1/settings/car",
    tag = "Settings",
    security(("bearer" = [])),
    request_body = UpdateCarRequest,
    responses(
        (status = 200, description = "Car updated", body = Car),
        (status = 400, description = "Validation failed", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
    ),
)]
pub async fn update_car(
    AuthUser { username, .. }: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<UpdateCarRequest>,
) -> Result<Json<Car>, ApiError> {
    let mut errors = Vec::new();

    let make = body.make.trim().to_string();
    if make.is_empty() || make.chars().count() > MAKE_LIMIT {
        errors.push(FieldError::new(
            "make",
            format!("Make must be 1-{MAKE_LIMIT} characters"),
        ));
    }
    if !(1..=MAX_MPG).contains(&body.mpg) {
        errors.push(FieldError::new(
            "mpg",
            format!("MPG must be between 1 and {MAX_MPG}"),
        ));
    }
    let fuel = body.fuel_type.parse::<FuelType>();
    if fuel.is_err() {
        errors.push(FieldError::new(
            "fuel_type",
            "Fuel type must be petrol, diesel or electric",
        ));
    }
    if body.engine_size <= 0.0 {
        errors.push(FieldError::new(
            "engine_size",
            "Engine size must be greater than 0",
        ));
    }

    let fuel = match fuel {
        Ok(fuel) if errors.is_empty() => fuel,
        _ => return Err(ApiError::validation(errors)),
    };

    let car = state
        .accounts
        .update_car(
            &username,
            CarChanges {
                make,
                mpg: body.mpg,
                fuel_type: fuel.as_str().to_string(),
                engine_size: body.engine_size,
            },
        )
        .await?;
    tracing::info!(%username, make = %car.make, "car updated");

    Ok(Json(car))
}
