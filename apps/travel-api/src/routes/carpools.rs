//! Carpool rides, joins, interest markers and standalone requests.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::middleware::AuthUser;
use crate::carpool::{self, validation::RequestDraft, validation::RideDraft};
use crate::error::{ApiError, ApiErrorBody};
use crate::models::carpool_request::CarpoolRequest;
use crate::models::carpool_ride::{CarpoolRide, RideListing, RideState};
use crate::models::rating::DriverRating;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/carpools", get(list_carpools).post(create_carpool))
        .route("/carpools/{journey_id}", get(get_carpool))
        .route("/carpools/{journey_id}/join", post(join_carpool))
        .route(
            "/toggle_carpool_interest/{journey_id}",
            get(toggle_carpool_interest),
        )
        .route(
            "/carpool_requests",
            get(list_carpool_requests).post(create_carpool_request),
        )
}

// ---------------------------------------------------------------------------
// GET /api/v1/carpools
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct RideListItem {
    #[serde(flatten)]
    pub listing: RideListing,
    pub state: RideState,
    /// Whether the caller has marked interest in this ride.
    pub interested: bool,
}

#[utoipa::path(
    get,
    path = "/api/v1/carpools",
    tag = "Carpools",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Rides open for pickup", body = [RideListItem]),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
    ),
)]
pub async fn list_carpools(
    AuthUser { username, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<RideListItem>>, ApiError> {
    let rides = carpool::incomplete_rides(state.carpools.as_ref(), Utc::now()).await?;
    let interested: HashSet<i32> = state
        .carpools
        .interested_journeys(&username)
        .await?
        .into_iter()
        .collect();

    let items = rides
        .into_iter()
        .map(|listing| RideListItem {
            state: listing.ride.state(),
            interested: interested.contains(&listing.ride.journey_id),
            listing,
        })
        .collect();

    Ok(Json(items))
}

// ---------------------------------------------------------------------------
// POST /api/v1/carpools
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCarpoolRequest {
    pub seats: Option<i32>,
    pub starting_point: Option<String>,
    pub destination: Option<String>,
    pub pickup_datetime: Option<DateTime<Utc>>,
    pub price: Option<i32>,
    pub description: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/carpools",
    tag = "Carpools",
    security(("bearer" = [])),
    request_body = CreateCarpoolRequest,
    responses(
        (status = 201, description = "Ride posted", body = CarpoolRide),
        (status = 400, description = "Validation failed", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
    ),
)]
pub async fn create_carpool(
    AuthUser { username, .. }: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateCarpoolRequest>,
) -> Result<(StatusCode, Json<CarpoolRide>), ApiError> {
    let draft = RideDraft {
        seats: body.seats,
        starting_point: body.starting_point,
        destination: body.destination,
        pickup_datetime: body.pickup_datetime,
        price: body.price,
        description: body.description.unwrap_or_default(),
    };

    let ride = carpool::post_ride(
        state.accounts.as_ref(),
        state.carpools.as_ref(),
        state.estimator.as_ref(),
        &username,
        &draft,
        Utc::now(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ride)))
}

// ---------------------------------------------------------------------------
// GET /api/v1/carpools/{journey_id}
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct CarpoolDetail {
    #[serde(flatten)]
    pub ride: CarpoolRide,
    pub state: RideState,
    pub passengers: Vec<String>,
    pub interest_count: i64,
    pub interested: bool,
    pub driver_rating: DriverRating,
}

#[utoipa::path(
    get,
    path = "/api/v1/carpools/{journey_id}",
    tag = "Carpools",
    security(("bearer" = [])),
    params(
        ("journey_id" = i32, Path, description = "Ride ID"),
    ),
    responses(
        (status = 200, description = "Ride detail", body = CarpoolDetail),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 404, description = "Not found", body = ApiErrorBody),
    ),
)]
pub async fn get_carpool(
    AuthUser { username, .. }: AuthUser,
    State(state): State<AppState>,
    Path(journey_id): Path<i32>,
) -> Result<Json<CarpoolDetail>, ApiError> {
    let ride = state
        .carpools
        .ride(journey_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Carpool journey not found"))?;

    let passengers = state.carpools.passengers(journey_id).await?;
    let interest_count = state.carpools.interest_count(journey_id).await?;
    let interested = state
        .carpools
        .interested_journeys(&username)
        .await?
        .contains(&journey_id);
    let driver_rating = state.accounts.driver_rating(&ride.driver).await?;

    Ok(Json(CarpoolDetail {
        state: ride.state(),
        ride,
        passengers,
        interest_count,
        interested,
        driver_rating,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/carpools/{journey_id}/join
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/carpools/{journey_id}/join",
    tag = "Carpools",
    security(("bearer" = [])),
    params(
        ("journey_id" = i32, Path, description = "Ride ID"),
    ),
    responses(
        (status = 201, description = "Seat taken", body = CarpoolRequest),
        (status = 400, description = "Cannot join", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
    ),
)]
pub async fn join_carpool(
    AuthUser { username, .. }: AuthUser,
    State(state): State<AppState>,
    Path(journey_id): Path<i32>,
) -> Result<(StatusCode, Json<CarpoolRequest>), ApiError> {
    let request = carpool::join_ride(state.carpools.as_ref(), journey_id, &username).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

// ---------------------------------------------------------------------------
// GET /api/v1/toggle_carpool_interest/{journey_id}
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct InterestResponse {
    pub journey_id: i32,
    pub interested: bool,
}

#[utoipa::path(
    get,
    path = "/api/v1/toggle_carpool_interest/{journey_id}",
    tag = "Carpools",
    security(("bearer" = [])),
    params(
        ("journey_id" = i32, Path, description = "Ride ID"),
    ),
    responses(
        (status = 200, description = "New interest state", body = InterestResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 404, description = "Not found", body = ApiErrorBody),
    ),
)]
pub async fn toggle_carpool_interest(
    AuthUser { username, .. }: AuthUser,
    State(state): State<AppState>,
    Path(journey_id): Path<i32>,
) -> Result<Json<InterestResponse>, ApiError> {
    let interested =
        carpool::toggle_interest(state.carpools.as_ref(), journey_id, &username).await?;
    Ok(Json(InterestResponse {
        journey_id,
        interested,
    }))
}

// ---------------------------------------------------------------------------
// /api/v1/carpool_requests
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCarpoolRequestBody {
    pub num_passengers: Option<i32>,
    pub starting_point: Option<String>,
    pub destination: Option<String>,
    pub pickup_datetime: Option<DateTime<Utc>>,
    pub price: Option<i32>,
    pub description: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/carpool_requests",
    tag = "Carpools",
    security(("bearer" = [])),
    request_body = CreateCarpoolRequestBody,
    responses(
        (status = 201, description = "Request submitted", body = CarpoolRequest),
        (status = 400, description = "Validation failed", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
    ),
)]
pub async fn create_carpool_request(
    AuthUser { username, .. }: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateCarpoolRequestBody>,
) -> Result<(StatusCode, Json<CarpoolRequest>), ApiError> {
    let draft = RequestDraft {
        num_passengers: body.num_passengers,
        starting_point: body.starting_point,
        destination: body.destination,
        pickup_datetime: body.pickup_datetime,
        price: body.price,
        description: body.description.unwrap_or_default(),
    };

    let request =
        carpool::submit_request(state.carpools.as_ref(), &username, &draft, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

#[utoipa::path(
    get,
    path = "/api/v1/carpool_requests",
    tag = "Carpools",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller's requests and joins", body = [CarpoolRequest]),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
    ),
)]
pub async fn list_carpool_requests(
    AuthUser { username, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CarpoolRequest>>, ApiError> {
    Ok(Json(state.carpools.requests_for(&username).await?))
}
