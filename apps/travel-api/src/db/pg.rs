//! PostgreSQL-backed repositories.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::dsl::{count_star, sql};
use diesel::sql_types::{Double, Nullable, Timestamptz};
use diesel_async::{AsyncConnection, RunQueryDsl};
use scoped_futures::ScopedFutureExt;

use crate::db::pool::DbPool;
use crate::db::schema::{
    account, car, carpool_interest, carpool_request, carpool_ride, profile, rating, route,
    route_search,
};
use crate::db::stores::{AccountStore, CarpoolStore, JoinOutcome, RouteSearchStore};
use crate::error::ApiError;
use crate::models::account::NewAccount;
use crate::models::car::{Car, CarChanges, NewCar};
use crate::models::carpool_request::{CarpoolRequest, NewCarpoolRequest};
use crate::models::carpool_ride::{CarpoolRide, NewCarpoolRide, RideListing, RideListingRow};
use crate::models::profile::{NewProfile, Profile, ProfileChanges};
use crate::models::rating::{DriverRating, NewRating};
use crate::models::route::{NewRoute, Route, RouteSearch, SearchedRoute};
use crate::search_stats::DEBOUNCE_SECS;

const INCOMPLETE_RIDES_SQL: &str = "\
SELECT c.*, r.average_rating, COALESCE(r.rating_count, 0) AS rating_count \
FROM carpool_ride c \
LEFT JOIN ( \
    SELECT rated_username, \
           AVG(rating_given)::float8 AS average_rating, \
           COUNT(*) AS rating_count \
    FROM rating \
    GROUP BY rated_username \
) r ON r.rated_username = c.driver \
WHERE c.is_complete = FALSE AND c.pickup_datetime > $1 \
ORDER BY c.pickup_datetime ASC";

/// Repositories over a shared connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Accounts, profiles, cars, ratings
// ---------------------------------------------------------------------------

#[async_trait]
impl AccountStore for PgStore {
    async fn username_exists(&self, username: &str) -> Result<bool, ApiError> {
        let mut conn = self.pool.get().await?;

        let count: i64 = account::table
            .filter(account::username.eq(username))
            .count()
            .get_result(&mut conn)
            .await?;

        Ok(count > 0)
    }

    async fn register(
        &self,
        new_account: NewAccount,
        new_profile: NewProfile,
        new_car: NewCar,
    ) -> Result<(), ApiError> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                diesel::insert_into(account::table)
                    .values(&new_account)
                    .execute(conn)
                    .await?;
                diesel::insert_into(profile::table)
                    .values(&new_profile)
                    .execute(conn)
                    .await?;
                diesel::insert_into(car::table)
                    .values(&new_car)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ApiError::conflict("Username has already been registered!")
            }
            other => ApiError::from(other),
        })
    }

    async fn password_hash(&self, username: &str) -> Result<Option<String>, ApiError> {
        let mut conn = self.pool.get().await?;

        let hash: Option<String> = account::table
            .find(username)
            .select(account::password_hash)
            .first(&mut conn)
            .await
            .optional()?;

        Ok(hash)
    }

    async fn profile(&self, username: &str) -> Result<Option<Profile>, ApiError> {
        let mut conn = self.pool.get().await?;

        let found = profile::table
            .find(username)
            .select(Profile::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(found)
    }

    async fn update_profile(
        &self,
        username: &str,
        changes: ProfileChanges,
    ) -> Result<Profile, ApiError> {
        let mut conn = self.pool.get().await?;

        diesel::update(profile::table.find(username))
            .set(&changes)
            .returning(Profile::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?
            .ok_or_else(|| ApiError::not_found("Profile not found"))
    }

    async fn car(&self, username: &str) -> Result<Option<Car>, ApiError> {
        let mut conn = self.pool.get().await?;

        let found = car::table
            .find(username)
            .select(Car::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(found)
    }

    async fn update_car(&self, username: &str, changes: CarChanges) -> Result<Car, ApiError> {
        let mut conn = self.pool.get().await?;

        diesel::update(car::table.find(username))
            .set(&changes)
            .returning(Car::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?
            .ok_or_else(|| ApiError::not_found("Car not found"))
    }

    async fn add_rating(&self, new_rating: NewRating) -> Result<(), ApiError> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(rating::table)
            .values(&new_rating)
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    async fn driver_rating(&self, username: &str) -> Result<DriverRating, ApiError> {
        let mut conn = self.pool.get().await?;

        let (average, count): (Option<f64>, i64) = rating::table
            .filter(rating::rated_username.eq(username))
            .select((
                sql::<Nullable<Double>>("AVG(rating_given)::float8"),
                count_star(),
            ))
            .get_result(&mut conn)
            .await?;

        Ok(DriverRating { average, count })
    }
}

// ---------------------------------------------------------------------------
// Carpools
// ---------------------------------------------------------------------------

#[async_trait]
impl CarpoolStore for PgStore {
    async fn add_ride(&self, mut ride: NewCarpoolRide) -> Result<CarpoolRide, ApiError> {
        ride.seats_available = ride.seats_initial;

        let mut conn = self.pool.get().await?;

        let created = diesel::insert_into(carpool_ride::table)
            .values(&ride)
            .returning(CarpoolRide::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(created)
    }

    async fn ride(&self, journey_id: i32) -> Result<Option<CarpoolRide>, ApiError> {
        let mut conn = self.pool.get().await?;

        let found = carpool_ride::table
            .find(journey_id)
            .select(CarpoolRide::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(found)
    }

    async fn incomplete_rides(&self, now: DateTime<Utc>) -> Result<Vec<RideListing>, ApiError> {
        let mut conn = self.pool.get().await?;

        let rows: Vec<RideListingRow> = diesel::sql_query(INCOMPLETE_RIDES_SQL)
            .bind::<Timestamptz, _>(now)
            .load(&mut conn)
            .await?;

        Ok(rows.into_iter().map(RideListing::from).collect())
    }

    async fn add_passenger(
        &self,
        journey_id: i32,
        username: &str,
    ) -> Result<JoinOutcome, ApiError> {
        let mut conn = self.pool.get().await?;
        let username = username.to_string();

        // The conditional decrement and the request insert commit together;
        // a ride with no seat left matches zero rows instead of going negative.
        let outcome = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let ride: Option<CarpoolRide> = diesel::update(
                        carpool_ride::table
                            .filter(carpool_ride::journey_id.eq(journey_id))
                            .filter(carpool_ride::seats_available.gt(0)),
                    )
                    .set(carpool_ride::seats_available.eq(carpool_ride::seats_available - 1))
                    .returning(CarpoolRide::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;

                    let Some(ride) = ride else {
                        let exists: i64 = carpool_ride::table
                            .filter(carpool_ride::journey_id.eq(journey_id))
                            .count()
                            .get_result(conn)
                            .await?;
                        return Ok(if exists > 0 {
                            JoinOutcome::NoSeats
                        } else {
                            JoinOutcome::NotFound
                        });
                    };

                    let request = diesel::insert_into(carpool_request::table)
                        .values(NewCarpoolRequest {
                            requester: username,
                            journey_id: Some(ride.journey_id),
                            num_passengers: 1,
                            starting_point: ride.starting_point,
                            destination: ride.destination,
                            pickup_datetime: ride.pickup_datetime,
                            price: Some(ride.price),
                            description: ride.description,
                        })
                        .returning(CarpoolRequest::as_returning())
                        .get_result(conn)
                        .await?;

                    Ok(JoinOutcome::Joined(request))
                }
                .scope_boxed()
            })
            .await?;

        Ok(outcome)
    }

    async fn add_request(&self, request: NewCarpoolRequest) -> Result<CarpoolRequest, ApiError> {
        let mut conn = self.pool.get().await?;

        let created = diesel::insert_into(carpool_request::table)
            .values(&request)
            .returning(CarpoolRequest::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(created)
    }

    async fn requests_for(&self, username: &str) -> Result<Vec<CarpoolRequest>, ApiError> {
        let mut conn = self.pool.get().await?;

        let list = carpool_request::table
            .filter(carpool_request::requester.eq(username))
            .order((
                carpool_request::pickup_datetime.desc(),
                carpool_request::request_id.desc(),
            ))
            .select(CarpoolRequest::as_select())
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    async fn passengers(&self, journey_id: i32) -> Result<Vec<String>, ApiError> {
        let mut conn = self.pool.get().await?;

        let list = carpool_request::table
            .filter(carpool_request::journey_id.eq(journey_id))
            .order(carpool_request::request_id.asc())
            .select(carpool_request::requester)
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    async fn toggle_interest(&self, journey_id: i32, username: &str) -> Result<bool, ApiError> {
        let mut conn = self.pool.get().await?;
        let username = username.to_string();

        let interested = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let removed = diesel::delete(
                        carpool_interest::table.find((journey_id, username.as_str())),
                    )
                    .execute(conn)
                    .await?;

                    if removed > 0 {
                        return Ok(false);
                    }

                    diesel::insert_into(carpool_interest::table)
                        .values((
                            carpool_interest::journey_id.eq(journey_id),
                            carpool_interest::username.eq(&username),
                        ))
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;

                    Ok(true)
                }
                .scope_boxed()
            })
            .await?;

        Ok(interested)
    }

    async fn interested_journeys(&self, username: &str) -> Result<Vec<i32>, ApiError> {
        let mut conn = self.pool.get().await?;

        let ids = carpool_interest::table
            .filter(carpool_interest::username.eq(username))
            .select(carpool_interest::journey_id)
            .load(&mut conn)
            .await?;

        Ok(ids)
    }

    async fn interest_count(&self, journey_id: i32) -> Result<i64, ApiError> {
        let mut conn = self.pool.get().await?;

        let count = carpool_interest::table
            .filter(carpool_interest::journey_id.eq(journey_id))
            .count()
            .get_result(&mut conn)
            .await?;

        Ok(count)
    }
}

// ---------------------------------------------------------------------------
// Route searches
// ---------------------------------------------------------------------------

#[async_trait]
impl RouteSearchStore for PgStore {
    async fn find_or_create_route(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Route, ApiError> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(route::table)
            .values(NewRoute {
                origin,
                destination,
            })
            .on_conflict((route::origin, route::destination))
            .do_nothing()
            .execute(&mut conn)
            .await?;

        let found = route::table
            .filter(route::origin.eq(origin))
            .filter(route::destination.eq(destination))
            .select(Route::as_select())
            .first(&mut conn)
            .await?;

        Ok(found)
    }

    async fn search(
        &self,
        username: &str,
        route_id: i32,
    ) -> Result<Option<RouteSearch>, ApiError> {
        let mut conn = self.pool.get().await?;

        let found = route_search::table
            .find((username, route_id))
            .select(RouteSearch::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(found)
    }

    async fn insert_search(&self, search: RouteSearch) -> Result<RouteSearch, ApiError> {
        let mut conn = self.pool.get().await?;

        let stored = diesel::insert_into(route_search::table)
            .values(&search)
            .on_conflict((route_search::username, route_search::route_id))
            .do_update()
            .set(route_search::last_searched_timestamp.eq(search.last_searched_timestamp))
            .returning(RouteSearch::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(stored)
    }

    async fn count_search(
        &self,
        username: &str,
        route_id: i32,
        now: DateTime<Utc>,
    ) -> Result<RouteSearch, ApiError> {
        let mut conn = self.pool.get().await?;
        let window_start = now - Duration::seconds(DEBOUNCE_SECS);

        let counted = diesel::update(
            route_search::table
                .find((username, route_id))
                .filter(route_search::last_updated_timestamp.lt(window_start)),
        )
        .set((
            route_search::search_count.eq(route_search::search_count + 1),
            route_search::last_searched_timestamp.eq(now),
            route_search::last_updated_timestamp.eq(now),
        ))
        .returning(RouteSearch::as_returning())
        .get_result(&mut conn)
        .await
        .optional()?;
        drop(conn);

        match counted {
            Some(search) => Ok(search),
            // A concurrent search already counted this window.
            None => self.touch_search(username, route_id, now).await,
        }
    }

    async fn touch_search(
        &self,
        username: &str,
        route_id: i32,
        now: DateTime<Utc>,
    ) -> Result<RouteSearch, ApiError> {
        let mut conn = self.pool.get().await?;

        let updated = diesel::update(route_search::table.find((username, route_id)))
            .set(route_search::last_searched_timestamp.eq(now))
            .returning(RouteSearch::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(updated)
    }

    async fn searches_for(&self, username: &str) -> Result<Vec<SearchedRoute>, ApiError> {
        let mut conn = self.pool.get().await?;

        let list: Vec<SearchedRoute> = route_search::table
            .inner_join(route::table)
            .filter(route_search::username.eq(username))
            .order((
                route_search::search_count.desc(),
                route_search::last_searched_timestamp.desc(),
            ))
            .select((
                route::route_id,
                route::origin,
                route::destination,
                route_search::search_count,
                route_search::last_searched_timestamp,
            ))
            .load(&mut conn)
            .await?;

        Ok(list)
    }
}
