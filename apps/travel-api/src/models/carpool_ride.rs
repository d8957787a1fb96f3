use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Nullable};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::schema::carpool_ride;
use crate::models::rating::DriverRating;

/// A driver-posted carpool offering.
///
/// `seats_available` stays within `0..=seats_initial`. `is_complete` is
/// read-only: nothing in the service marks a ride complete.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable, Serialize, ToSchema)]
#[diesel(table_name = carpool_ride)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CarpoolRide {
    pub journey_id: i32,
    pub driver: String,
    pub seats_initial: i32,
    pub seats_available: i32,
    pub starting_point: String,
    pub destination: String,
    pub pickup_datetime: DateTime<Utc>,
    pub price: i32,
    pub description: String,
    /// Driving distance in metres.
    pub distance: Option<f64>,
    pub distance_text: Option<String>,
    /// Driving time in seconds.
    pub estimate_duration: Option<f64>,
    pub estimate_duration_text: Option<String>,
    /// Kilograms of CO2 attributed to each occupant.
    pub estimate_co2_per_person: Option<f64>,
    pub estimate_co2_saved: Option<f64>,
    pub is_complete: bool,
}

/// Joinability of an existing ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RideState {
    Open,
    Full,
    Completed,
}

impl CarpoolRide {
    pub fn state(&self) -> RideState {
        if self.is_complete {
            RideState::Completed
        } else if self.seats_available < 1 {
            RideState::Full
        } else {
            RideState::Open
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = carpool_ride)]
pub struct NewCarpoolRide {
    pub driver: String,
    pub seats_initial: i32,
    pub seats_available: i32,
    pub starting_point: String,
    pub destination: String,
    pub pickup_datetime: DateTime<Utc>,
    pub price: i32,
    pub description: String,
    pub distance: Option<f64>,
    pub distance_text: Option<String>,
    pub estimate_duration: Option<f64>,
    pub estimate_duration_text: Option<String>,
    pub estimate_co2_per_person: Option<f64>,
    pub estimate_co2_saved: Option<f64>,
}

/// One row of the open-rides listing: the ride plus its driver's rating.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RideListing {
    #[serde(flatten)]
    pub ride: CarpoolRide,
    pub driver_rating: DriverRating,
}

/// Raw row of the listing query; ratings come from an outer join so drivers
/// without any are still present.
#[derive(Debug, QueryableByName)]
pub struct RideListingRow {
    #[diesel(embed)]
    pub ride: CarpoolRide,
    #[diesel(sql_type = Nullable<Double>)]
    pub average_rating: Option<f64>,
    #[diesel(sql_type = BigInt)]
    pub rating_count: i64,
}

impl From<RideListingRow> for RideListing {
    fn from(row: RideListingRow) -> Self {
        Self {
            ride: row.ride,
            driver_rating: DriverRating {
                average: row.average_rating,
                count: row.rating_count,
            },
        }
    }
}
