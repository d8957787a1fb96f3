//! Route lookups across travel modes, and the caller's search history.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use travel_common::units::{km_to_miles, metres_to_km, round_to};
use travel_common::{emissions, fuel, FuelType, TravelMode};
use utoipa::ToSchema;

use crate::auth::middleware::AuthUser;
use crate::error::{ApiError, ApiErrorBody, FieldError};
use crate::estimate::{try_estimate, RouteEstimate};
use crate::models::car::Car;
use crate::search_stats::{self, SearchSummary};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/routes", post(search_route).get(route_history))
}

// ---------------------------------------------------------------------------
// POST /api/v1/routes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct RouteSearchRequest {
    pub origin: String,
    pub destination: String,
    /// `walking`, `driving`, `cycling` (or `bicycling`) or `transit`.
    pub mode: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModeEstimate {
    pub mode: String,
    /// Absent when no estimate could be obtained for this mode.
    pub estimate: Option<RouteEstimate>,
    pub co2_kg: Option<f64>,
    /// Only for walking and cycling.
    pub calories: Option<f64>,
}

/// Running costs of driving the route in the caller's car.
#[derive(Debug, Serialize, ToSchema)]
pub struct DrivingCost {
    pub car_make: String,
    pub mpg: i32,
    pub fuel_type: String,
    /// Litres; absent for electric cars.
    pub fuel_used: Option<f64>,
    /// kWh; only for electric cars.
    pub energy_used: Option<f64>,
    pub fuel_cost: f64,
    /// Per litre, or per kWh for electric cars.
    pub fuel_price: f64,
    pub co2_kg: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RouteSearchResponse {
    pub origin: String,
    pub destination: String,
    pub selected_mode: String,
    pub modes: Vec<ModeEstimate>,
    /// `"lowest - highest"` across modes, a single value when they agree,
    /// `"Unknown"` when nothing was available.
    pub distance_range: String,
    pub driving: Option<DrivingCost>,
    /// How many times the caller has searched this route.
    pub search_count: i32,
}

#[utoipa::path(
    post,
    path = "/api/v1/routes",
    tag = "Routes",
    security(("bearer" = [])),
    request_body = RouteSearchRequest,
    responses(
        (status = 200, description = "Estimates for every mode", body = RouteSearchResponse),
        (status = 400, description = "Validation failed", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
    ),
)]
pub async fn search_route(
    AuthUser { username, .. }: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<RouteSearchRequest>,
) -> Result<Json<RouteSearchResponse>, ApiError> {
    let origin = body.origin.trim();
    let destination = body.destination.trim();

    let mut errors = Vec::new();
    if origin.is_empty() {
        errors.push(FieldError::new("origin", "Origin is required"));
    }
    if destination.is_empty() {
        errors.push(FieldError::new("destination", "Destination is required"));
    }
    let selected = body.mode.parse::<TravelMode>();
    if selected.is_err() {
        errors.push(FieldError::new(
            "mode",
            "Mode must be walking, driving, cycling or transit",
        ));
    }
    let selected = match selected {
        Ok(mode) if errors.is_empty() => mode,
        _ => return Err(ApiError::validation(errors)),
    };

    let search = search_stats::record_search(
        state.searches.as_ref(),
        &username,
        origin,
        destination,
        Utc::now(),
    )
    .await?;

    let car = state.accounts.car(&username).await?;
    let fuel_type = car.as_ref().map(Car::fuel).unwrap_or_default();

    let mut modes = Vec::with_capacity(TravelMode::ALL.len());
    for mode in TravelMode::ALL {
        let estimate = try_estimate(state.estimator.as_ref(), origin, destination, mode).await;
        modes.push(mode_estimate(mode, estimate, fuel_type));
    }

    let driving = match (&car, driving_distance(&modes)) {
        (Some(car), Some(distance_m)) => Some(driving_cost(car, distance_m, &state.config)),
        _ => None,
    };

    Ok(Json(RouteSearchResponse {
        origin: origin.to_string(),
        destination: destination.to_string(),
        selected_mode: selected.to_string(),
        distance_range: distance_range(&modes),
        modes,
        driving,
        search_count: search.search_count,
    }))
}

fn mode_estimate(
    mode: TravelMode,
    estimate: Option<RouteEstimate>,
    fuel: FuelType,
) -> ModeEstimate {
    let co2_kg = estimate
        .as_ref()
        .map(|e| round_to(emissions::co2_kg(e.distance_m, mode, fuel), 2));
    let calories = estimate
        .as_ref()
        .filter(|_| mode.is_active())
        .map(|e| emissions::calories_burned(e.distance_m, mode).round());
    ModeEstimate {
        mode: mode.to_string(),
        estimate,
        co2_kg,
        calories,
    }
}

fn driving_distance(modes: &[ModeEstimate]) -> Option<f64> {
    modes
        .iter()
        .find(|m| m.mode == TravelMode::Driving.as_str())
        .and_then(|m| m.estimate.as_ref())
        .map(|e| e.distance_m)
}

fn driving_cost(car: &Car, distance_m: f64, config: &crate::config::Config) -> DrivingCost {
    let miles = km_to_miles(metres_to_km(distance_m));
    let fuel_type = car.fuel();
    let price = config.fuel_price(fuel_type);

    let (fuel_used, energy_used, cost) = match fuel_type {
        FuelType::Electric => {
            let wh = fuel::watt_hours_required(fuel::DEFAULT_EV_WH_PER_MILE, miles);
            let cost = fuel::ev_cost(fuel::DEFAULT_EV_WH_PER_MILE, miles, price);
            (None, Some(round_to(wh / 1000.0, 2)), cost)
        }
        FuelType::Petrol | FuelType::Diesel => {
            let litres = fuel::fuel_used_litres(miles, f64::from(car.mpg));
            (Some(round_to(litres, 2)), None, fuel::fuel_cost(litres, price))
        }
    };

    DrivingCost {
        car_make: car.make.clone(),
        mpg: car.mpg,
        fuel_type: fuel_type.to_string(),
        fuel_used,
        energy_used,
        fuel_cost: round_to(cost, 2),
        fuel_price: round_to(price, 2),
        co2_kg: round_to(
            emissions::co2_kg(distance_m, TravelMode::Driving, fuel_type),
            2,
        ),
    }
}

/// Shortest and longest estimated distance across modes, as display text.
pub fn distance_range(modes: &[ModeEstimate]) -> String {
    let estimates = || modes.iter().filter_map(|m| m.estimate.as_ref());
    let lowest = estimates().min_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    let highest = estimates().max_by(|a, b| a.distance_m.total_cmp(&b.distance_m));

    match (lowest, highest) {
        (Some(lo), Some(hi)) if lo.distance_text == hi.distance_text => lo.distance_text.clone(),
        (Some(lo), Some(hi)) => format!("{} - {}", lo.distance_text, hi.distance_text),
        _ => "Unknown".to_string(),
    }
}

// ---------------------------------------------------------------------------
// GET /api/v1/routes
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/routes",
    tag = "Routes",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller's search statistics", body = SearchSummary),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
    ),
)]
pub async fn route_history(
    AuthUser { username, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<SearchSummary>, ApiError> {
    Ok(Json(
        search_stats::summary(state.searches.as_ref(), &username).await?,
    ))
}
