//! Carpool lifecycle: posting rides, joining them, marking interest and
//! submitting standalone requests.
//!
//! Callers pass the acting username and the current time explicitly.

pub mod validation;

use chrono::{DateTime, Utc};
use travel_common::{emissions, TravelMode};

use crate::db::{AccountStore, CarpoolStore, JoinOutcome};
use crate::error::ApiError;
use crate::estimate::{try_estimate, RouteEstimator};
use crate::models::carpool_request::CarpoolRequest;
use crate::models::carpool_ride::{CarpoolRide, NewCarpoolRide, RideListing};
use validation::{RequestDraft, RideDraft};

/// Validate and store a ride offered by `driver`, attaching driving
/// estimates when the estimator can provide them.
pub async fn post_ride(
    accounts: &dyn AccountStore,
    carpools: &dyn CarpoolStore,
    estimator: &dyn RouteEstimator,
    driver: &str,
    draft: &RideDraft,
    now: DateTime<Utc>,
) -> Result<CarpoolRide, ApiError> {
    let driver_exists = accounts.username_exists(driver).await?;
    let mut ride = validation::validate_carpool_ride(driver, driver_exists, draft, now)
        .map_err(ApiError::form)?;

    if let Some(estimate) = try_estimate(
        estimator,
        &ride.starting_point,
        &ride.destination,
        TravelMode::Driving,
    )
    .await
    {
        let fuel = accounts
            .car(driver)
            .await?
            .map(|car| car.fuel())
            .unwrap_or_default();
        attach_estimates(&mut ride, estimate.distance_m, fuel);
        ride.distance_text = Some(estimate.distance_text);
        ride.estimate_duration = Some(estimate.duration_s);
        ride.estimate_duration_text = Some(estimate.duration_text);
    }

    let ride = carpools.add_ride(ride).await?;
    tracing::info!(journey_id = ride.journey_id, driver = %ride.driver, "carpool ride posted");
    Ok(ride)
}

/// Fill distance and the CO2 split: the driver plus every initial seat
/// share the trip's emissions.
fn attach_estimates(ride: &mut NewCarpoolRide, distance_m: f64, fuel: travel_common::FuelType) {
    let total = emissions::co2_kg(distance_m, TravelMode::Driving, fuel);
    let occupants = u32::try_from(ride.seats_initial).unwrap_or(0);
    let (per_person, saved) = emissions::shared_co2(total, occupants);
    ride.distance = Some(distance_m);
    ride.estimate_co2_per_person = Some(per_person);
    ride.estimate_co2_saved = Some(saved);
}

/// Take a seat on `journey_id` for `username`.
///
/// Eligibility is checked first so every reason is reported; the seat
/// decrement itself is conditional, so a ride filled in between still
/// yields the no-seats message.
pub async fn join_ride(
    carpools: &dyn CarpoolStore,
    journey_id: i32,
    username: &str,
) -> Result<CarpoolRequest, ApiError> {
    let ride = carpools.ride(journey_id).await?;
    validation::validate_joining_carpool(ride.as_ref(), username).map_err(ApiError::form)?;

    match carpools.add_passenger(journey_id, username).await? {
        JoinOutcome::Joined(request) => {
            tracing::info!(journey_id, %username, "passenger joined carpool");
            Ok(request)
        }
        JoinOutcome::NoSeats => Err(ApiError::form(vec![validation::NO_SEATS.to_string()])),
        JoinOutcome::NotFound => Err(ApiError::form(vec![
            validation::RIDE_NOT_FOUND.to_string()
        ])),
    }
}

/// Flip `username`'s interest in a ride. Returns whether they are now
/// interested.
pub async fn toggle_interest(
    carpools: &dyn CarpoolStore,
    journey_id: i32,
    username: &str,
) -> Result<bool, ApiError> {
    if carpools.ride(journey_id).await?.is_none() {
        return Err(ApiError::not_found("Carpool journey not found"));
    }
    let interested = carpools.toggle_interest(journey_id, username).await?;
    tracing::info!(journey_id, %username, interested, "carpool interest toggled");
    Ok(interested)
}

/// Rides still open for pickup after `now`, soonest first.
pub async fn incomplete_rides(
    carpools: &dyn CarpoolStore,
    now: DateTime<Utc>,
) -> Result<Vec<RideListing>, ApiError> {
    carpools.incomplete_rides(now).await
}

/// Validate and store a standalone request (no ride attached).
pub async fn submit_request(
    carpools: &dyn CarpoolStore,
    requester: &str,
    draft: &RequestDraft,
    now: DateTime<Utc>,
) -> Result<CarpoolRequest, ApiError> {
    let request =
        validation::validate_carpool_request(requester, draft, now).map_err(ApiError::form)?;
    let request = carpools.add_request(request).await?;
    tracing::info!(request_id = request.request_id, %requester, "carpool request submitted");
    Ok(request)
}
