//! Repository interfaces, one per aggregate.
//!
//! Route handlers and the carpool/search services only talk to these traits.
//! [`crate::db::pg::PgStore`] backs them with PostgreSQL and
//! [`crate::db::memory::MemoryDb`] with process memory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ApiError;
use crate::models::account::NewAccount;
use crate::models::car::{Car, CarChanges, NewCar};
use crate::models::carpool_request::{CarpoolRequest, NewCarpoolRequest};
use crate::models::carpool_ride::{CarpoolRide, NewCarpoolRide, RideListing};
use crate::models::profile::{NewProfile, Profile, ProfileChanges};
use crate::models::rating::{DriverRating, NewRating};
use crate::models::route::{Route, RouteSearch, SearchedRoute};

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn username_exists(&self, username: &str) -> Result<bool, ApiError>;

    /// Create the account, its profile and its placeholder car together.
    ///
    /// Fails with a conflict when the username is already registered.
    async fn register(
        &self,
        account: NewAccount,
        profile: NewProfile,
        car: NewCar,
    ) -> Result<(), ApiError>;

    async fn password_hash(&self, username: &str) -> Result<Option<String>, ApiError>;

    async fn profile(&self, username: &str) -> Result<Option<Profile>, ApiError>;

    async fn update_profile(
        &self,
        username: &str,
        changes: ProfileChanges,
    ) -> Result<Profile, ApiError>;

    async fn car(&self, username: &str) -> Result<Option<Car>, ApiError>;

    async fn update_car(&self, username: &str, changes: CarChanges) -> Result<Car, ApiError>;

    async fn add_rating(&self, rating: NewRating) -> Result<(), ApiError>;

    async fn driver_rating(&self, username: &str) -> Result<DriverRating, ApiError>;
}

/// Result of trying to take a seat on a ride.
#[derive(Debug)]
pub enum JoinOutcome {
    Joined(CarpoolRequest),
    /// The ride had no seat left when the decrement ran.
    NoSeats,
    NotFound,
}

#[async_trait]
pub trait CarpoolStore: Send + Sync {
    /// Insert a ride; `seats_available` is taken from `seats_initial`.
    async fn add_ride(&self, ride: NewCarpoolRide) -> Result<CarpoolRide, ApiError>;

    async fn ride(&self, journey_id: i32) -> Result<Option<CarpoolRide>, ApiError>;

    /// Rides not complete whose pickup is after `now`, soonest first, with
    /// the driver's rating (drivers without ratings included).
    async fn incomplete_rides(&self, now: DateTime<Utc>) -> Result<Vec<RideListing>, ApiError>;

    /// Atomically decrement the seat count and record a one-passenger
    /// request referencing the ride.
    async fn add_passenger(&self, journey_id: i32, username: &str)
        -> Result<JoinOutcome, ApiError>;

    async fn add_request(&self, request: NewCarpoolRequest) -> Result<CarpoolRequest, ApiError>;

    /// Requests made by `username`, latest pickup first.
    async fn requests_for(&self, username: &str) -> Result<Vec<CarpoolRequest>, ApiError>;

    /// Usernames that joined the ride, in join order.
    async fn passengers(&self, journey_id: i32) -> Result<Vec<String>, ApiError>;

    /// Flip the interest marker and return whether it is now set.
    async fn toggle_interest(&self, journey_id: i32, username: &str) -> Result<bool, ApiError>;

    async fn interested_journeys(&self, username: &str) -> Result<Vec<i32>, ApiError>;

    async fn interest_count(&self, journey_id: i32) -> Result<i64, ApiError>;
}

#[async_trait]
pub trait RouteSearchStore: Send + Sync {
    /// Return the route for the exact pair, creating it if absent. The first
    /// writer wins.
    async fn find_or_create_route(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Route, ApiError>;

    async fn search(&self, username: &str, route_id: i32)
        -> Result<Option<RouteSearch>, ApiError>;

    /// Insert a fresh counter. If one appeared concurrently only its
    /// `last_searched_timestamp` is refreshed.
    async fn insert_search(&self, search: RouteSearch) -> Result<RouteSearch, ApiError>;

    /// Increment the counter and refresh both timestamps, but only when the
    /// last counted search is older than the debounce window. Otherwise this
    /// behaves like [`touch_search`](Self::touch_search).
    async fn count_search(
        &self,
        username: &str,
        route_id: i32,
        now: DateTime<Utc>,
    ) -> Result<RouteSearch, ApiError>;

    /// Refresh `last_searched_timestamp` only.
    async fn touch_search(
        &self,
        username: &str,
        route_id: i32,
        now: DateTime<Utc>,
    ) -> Result<RouteSearch, ApiError>;

    /// Every route `username` searched, most searched first.
    async fn searches_for(&self, username: &str) -> Result<Vec<SearchedRoute>, ApiError>;
}
