//! Long-term fuel cost and emission projections for the caller's car.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use travel_common::projection::project;
use travel_common::units::{miles_to_km, round_to};
use travel_common::{emissions, fuel, FuelType, TravelMode};
use utoipa::{IntoParams, ToSchema};

use crate::auth::middleware::AuthUser;
use crate::config::Config;
use crate::error::{ApiError, ApiErrorBody, FieldError};
use crate::models::car::Car;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/trends", get(get_trends))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendsQuery {
    /// Defaults to the configured monthly mileage.
    pub monthly_miles: Option<f64>,
    /// Adds an electric-car comparison at this consumption.
    pub ev_wh_per_mile: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Projection {
    pub months: u32,
    pub value: f64,
}

/// Monthly figures and their projections for one vehicle.
#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleTrend {
    /// Litres for combustion cars, kWh for electric ones.
    pub energy: Vec<Projection>,
    pub cost: Vec<Projection>,
    pub co2_kg: Vec<Projection>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrendsResponse {
    pub monthly_miles: f64,
    pub car_make: String,
    pub fuel_type: String,
    pub current: VehicleTrend,
    /// Present when `ev_wh_per_mile` was given.
    pub ev_comparison: Option<VehicleTrend>,
}

/// Finite and above zero; rejects NaN and infinities.
fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn projected(monthly: f64) -> Vec<Projection> {
    project(monthly)
        .into_iter()
        .map(|p| Projection {
            months: p.months,
            value: round_to(p.value, 2),
        })
        .collect()
}

fn electric_trend(wh_per_mile: f64, monthly_miles: f64, config: &Config) -> VehicleTrend {
    let wh = fuel::watt_hours_required(wh_per_mile, monthly_miles);
    VehicleTrend {
        energy: projected(wh / 1000.0),
        cost: projected(fuel::ev_cost(
            wh_per_mile,
            monthly_miles,
            config.electricity_price_per_kwh,
        )),
        co2_kg: projected(emissions::ev_co2_kg(wh)),
    }
}

fn car_trend(car: &Car, monthly_miles: f64, config: &Config) -> VehicleTrend {
    match car.fuel() {
        FuelType::Electric => electric_trend(fuel::DEFAULT_EV_WH_PER_MILE, monthly_miles, config),
        fuel_type @ (FuelType::Petrol | FuelType::Diesel) => {
            let litres = fuel::fuel_used_litres(monthly_miles, f64::from(car.mpg));
            let metres = miles_to_km(monthly_miles) * 1000.0;
            VehicleTrend {
                energy: projected(litres),
                cost: projected(fuel::fuel_cost(litres, config.fuel_price(fuel_type))),
                co2_kg: projected(emissions::co2_kg(metres, TravelMode::Driving, fuel_type)),
            }
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/trends",
    tag = "Trends",
    security(("bearer" = [])),
    params(TrendsQuery),
    responses(
        (status = 200, description = "Projected costs and emissions", body = TrendsResponse),
        (status = 400, description = "Validation failed", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
    ),
)]
pub async fn get_trends(
    AuthUser { username, .. }: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<TrendsResponse>, ApiError> {
    let monthly_miles = query.monthly_miles.unwrap_or(state.config.monthly_miles);

    let mut errors = Vec::new();
    if !is_positive(monthly_miles) {
        errors.push(FieldError::new(
            "monthly_miles",
            "Monthly miles must be greater than 0",
        ));
    }
    if matches!(query.ev_wh_per_mile, Some(wh) if !is_positive(wh)) {
        errors.push(FieldError::new(
            "ev_wh_per_mile",
            "Consumption must be greater than 0",
        ));
    }
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let car = state
        .accounts
        .car(&username)
        .await?
        .ok_or_else(|| ApiError::not_found("Car not found"))?;

    Ok(Json(TrendsResponse {
        monthly_miles,
        current: car_trend(&car, monthly_miles, &state.config),
        ev_comparison: query
            .ev_wh_per_mile
            .map(|wh| electric_trend(wh, monthly_miles, &state.config)),
        fuel_type: car.fuel().to_string(),
        car_make: car.make,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(fuel_type: &str, mpg: i32) -> Car {
        Car {
            owner: "a".into(),
            make: "Test".into(),
            mpg,
            fuel_type: fuel_type.into(),
            engine_size: 1.6,
        }
    }

    #[test]
    fn projections_scale_linearly() {
        let trend = car_trend(&car("petrol", 50), 1000.0, &Config::default());
        let months: Vec<u32> = trend.cost.iter().map(|p| p.months).collect();
        assert_eq!(months, vec![1, 3, 6, 12, 60, 120]);

        // 1000 miles at 50 mpg is 20 gallons.
        assert_eq!(trend.energy[0].value, 90.92);
        assert_eq!(trend.cost[0].value, 136.38);
        assert_eq!(trend.cost[3].value, round_to(136.3827 * 12.0, 2));
    }

    #[test]
    fn electric_car_uses_grid_figures() {
        let trend = car_trend(&car("electric", 50), 1000.0, &Config::default());
        // 300 Wh/mile for 1000 miles.
        assert_eq!(trend.energy[0].value, 300.0);
        assert_eq!(trend.cost[0].value, 102.0);
        assert_eq!(trend.co2_kg[0].value, 69.9);
    }

    #[test]
    fn only_finite_positive_inputs_pass() {
        assert!(is_positive(1.0));
        assert!(!is_positive(0.0));
        assert!(!is_positive(-5.0));
        assert!(!is_positive(f64::NAN));
        assert!(!is_positive(f64::INFINITY));
    }
}
