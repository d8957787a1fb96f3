//! In-process repositories for tests and database-less local runs.
//!
//! Every operation takes one lock over all tables, so multi-step writes such
//! as joining a ride are atomic here as well.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::db::stores::{AccountStore, CarpoolStore, JoinOutcome, RouteSearchStore};
use crate::error::ApiError;
use crate::models::account::{Account, NewAccount};
use crate::models::car::{Car, CarChanges, NewCar};
use crate::models::carpool_request::{CarpoolRequest, NewCarpoolRequest};
use crate::models::carpool_ride::{CarpoolRide, NewCarpoolRide, RideListing};
use crate::models::profile::{NewProfile, Profile, ProfileChanges};
use crate::models::rating::{DriverRating, NewRating};
use crate::models::route::{Route, RouteSearch, SearchedRoute};
use crate::search_stats::DEBOUNCE_SECS;

#[derive(Default)]
struct Tables {
    accounts: HashMap<String, Account>,
    profiles: HashMap<String, Profile>,
    cars: HashMap<String, Car>,
    ratings: Vec<NewRating>,
    rides: BTreeMap<i32, CarpoolRide>,
    requests: Vec<CarpoolRequest>,
    interests: HashSet<(i32, String)>,
    routes: Vec<Route>,
    searches: HashMap<(String, i32), RouteSearch>,
    next_journey_id: i32,
    next_request_id: i32,
}

impl Tables {
    fn driver_rating(&self, username: &str) -> DriverRating {
        let values: Vec<i32> = self
            .ratings
            .iter()
            .filter(|r| r.rated_username == username)
            .map(|r| r.rating_given)
            .collect();
        DriverRating::from_values(&values)
    }

    fn insert_request(&mut self, new: NewCarpoolRequest) -> CarpoolRequest {
        self.next_request_id += 1;
        let request = CarpoolRequest {
            request_id: self.next_request_id,
            requester: new.requester,
            journey_id: new.journey_id,
            num_passengers: new.num_passengers,
            starting_point: new.starting_point,
            destination: new.destination,
            pickup_datetime: new.pickup_datetime,
            price: new.price,
            description: new.description,
        };
        self.requests.push(request.clone());
        request
    }
}

#[derive(Default)]
pub struct MemoryDb {
    tables: Mutex<Tables>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, ApiError> {
        self.tables
            .lock()
            .map_err(|_| ApiError::internal("In-memory store unavailable"))
    }
}

#[async_trait]
impl AccountStore for MemoryDb {
    async fn username_exists(&self, username: &str) -> Result<bool, ApiError> {
        Ok(self.lock()?.accounts.contains_key(username))
    }

    async fn register(
        &self,
        account: NewAccount,
        profile: NewProfile,
        car: NewCar,
    ) -> Result<(), ApiError> {
        let mut tables = self.lock()?;
        if tables.accounts.contains_key(&account.username) {
            return Err(ApiError::conflict("Username has already been registered!"));
        }

        tables.accounts.insert(
            account.username.clone(),
            Account {
                username: account.username,
                password_hash: account.password_hash,
                created_at: Utc::now(),
            },
        );
        tables.profiles.insert(
            profile.username.clone(),
            Profile {
                username: profile.username,
                first_name: profile.first_name,
                last_name: profile.last_name,
                bio: None,
                photo: None,
                verified: false,
                join_date: profile.join_date,
                home: None,
                work: None,
            },
        );
        tables.cars.insert(
            car.owner.clone(),
            Car {
                owner: car.owner,
                make: car.make,
                mpg: car.mpg,
                fuel_type: car.fuel_type,
                engine_size: car.engine_size,
            },
        );
        Ok(())
    }

    async fn password_hash(&self, username: &str) -> Result<Option<String>, ApiError> {
        Ok(self
            .lock()?
            .accounts
            .get(username)
            .map(|a| a.password_hash.clone()))
    }

    async fn profile(&self, username: &str) -> Result<Option<Profile>, ApiError> {
        Ok(self.lock()?.profiles.get(username).cloned())
    }

    async fn update_profile(
        &self,
        username: &str,
        changes: ProfileChanges,
    ) -> Result<Profile, ApiError> {
        let mut tables = self.lock()?;
        let profile = tables
            .profiles
            .get_mut(username)
            .ok_or_else(|| ApiError::not_found("Profile not found"))?;
        profile.apply(changes);
        Ok(profile.clone())
    }

    async fn car(&self, username: &str) -> Result<Option<Car>, ApiError> {
        Ok(self.lock()?.cars.get(username).cloned())
    }

    async fn update_car(&self, username: &str, changes: CarChanges) -> Result<Car, ApiError> {
        let mut tables = self.lock()?;
        let car = tables
            .cars
            .get_mut(username)
            .ok_or_else(|| ApiError::not_found("Car not found"))?;
        car.apply(changes);
        Ok(car.clone())
    }

    async fn add_rating(&self, rating: NewRating) -> Result<(), ApiError> {
        self.lock()?.ratings.push(rating);
        Ok(())
    }

    async fn driver_rating(&self, username: &str) -> Result<DriverRating, ApiError> {
        Ok(self.lock()?.driver_rating(username))
    }
}

#[async_trait]
impl CarpoolStore for MemoryDb {
    async fn add_ride(&self, new: NewCarpoolRide) -> Result<CarpoolRide, ApiError> {
        let mut tables = self.lock()?;
        tables.next_journey_id += 1;
        let ride = CarpoolRide {
            journey_id: tables.next_journey_id,
            driver: new.driver,
            seats_initial: new.seats_initial,
            seats_available: new.seats_initial,
            starting_point: new.starting_point,
            destination: new.destination,
            pickup_datetime: new.pickup_datetime,
            price: new.price,
            description: new.description,
            distance: new.distance,
            distance_text: new.distance_text,
            estimate_duration: new.estimate_duration,
            estimate_duration_text: new.estimate_duration_text,
            estimate_co2_per_person: new.estimate_co2_per_person,
            estimate_co2_saved: new.estimate_co2_saved,
            is_complete: false,
        };
        tables.rides.insert(ride.journey_id, ride.clone());
        Ok(ride)
    }

    async fn ride(&self, journey_id: i32) -> Result<Option<CarpoolRide>, ApiError> {
        Ok(self.lock()?.rides.get(&journey_id).cloned())
    }

    async fn incomplete_rides(&self, now: DateTime<Utc>) -> Result<Vec<RideListing>, ApiError> {
        let tables = self.lock()?;
        let mut listings: Vec<RideListing> = tables
            .rides
            .values()
            .filter(|ride| !ride.is_complete && ride.pickup_datetime > now)
            .map(|ride| RideListing {
                ride: ride.clone(),
                driver_rating: tables.driver_rating(&ride.driver),
            })
            .collect();
        listings.sort_by_key(|l| l.ride.pickup_datetime);
        Ok(listings)
    }

    async fn add_passenger(
        &self,
        journey_id: i32,
        username: &str,
    ) -> Result<JoinOutcome, ApiError> {
        let mut tables = self.lock()?;
        let Some(ride) = tables.rides.get_mut(&journey_id) else {
            return Ok(JoinOutcome::NotFound);
        };
        if ride.seats_available < 1 {
            return Ok(JoinOutcome::NoSeats);
        }
        ride.seats_available -= 1;

        let new = NewCarpoolRequest {
            requester: username.to_string(),
            journey_id: Some(ride.journey_id),
            num_passengers: 1,
            starting_point: ride.starting_point.clone(),
            destination: ride.destination.clone(),
            pickup_datetime: ride.pickup_datetime,
            price: Some(ride.price),
            description: ride.description.clone(),
        };
        Ok(JoinOutcome::Joined(tables.insert_request(new)))
    }

    async fn add_request(&self, request: NewCarpoolRequest) -> Result<CarpoolRequest, ApiError> {
        Ok(self.lock()?.insert_request(request))
    }

    async fn requests_for(&self, username: &str) -> Result<Vec<CarpoolRequest>, ApiError> {
        let tables = self.lock()?;
        let mut list: Vec<CarpoolRequest> = tables
            .requests
            .iter()
            .filter(|r| r.requester == username)
            .cloned()
            .collect();
        list.sort_by(|a, b| {
            b.pickup_datetime
                .cmp(&a.pickup_datetime)
                .then(b.request_id.cmp(&a.request_id))
        });
        Ok(list)
    }

    async fn passengers(&self, journey_id: i32) -> Result<Vec<String>, ApiError> {
        Ok(self
            .lock()?
            .requests
            .iter()
            .filter(|r| r.journey_id == Some(journey_id))
            .map(|r| r.requester.clone())
            .collect())
    }

    async fn toggle_interest(&self, journey_id: i32, username: &str) -> Result<bool, ApiError> {
        let mut tables = self.lock()?;
        let key = (journey_id, username.to_string());
        if tables.interests.remove(&key) {
            return Ok(false);
        }
        tables.interests.insert(key);
        Ok(true)
    }

    async fn interested_journeys(&self, username: &str) -> Result<Vec<i32>, ApiError> {
        let tables = self.lock()?;
        let mut ids: Vec<i32> = tables
            .interests
            .iter()
            .filter(|(_, u)| u == username)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn interest_count(&self, journey_id: i32) -> Result<i64, ApiError> {
        let tables = self.lock()?;
        let count = tables
            .interests
            .iter()
            .filter(|(id, _)| *id == journey_id)
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl RouteSearchStore for MemoryDb {
    async fn find_or_create_route(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Route, ApiError> {
        let mut tables = self.lock()?;
        if let Some(route) = tables
            .routes
            .iter()
            .find(|r| r.origin == origin && r.destination == destination)
        {
            return Ok(route.clone());
        }
        let route = Route {
            route_id: tables.routes.len() as i32 + 1,
            origin: origin.to_string(),
            destination: destination.to_string(),
        };
        tables.routes.push(route.clone());
        Ok(route)
    }

    async fn search(
        &self,
        username: &str,
        route_id: i32,
    ) -> Result<Option<RouteSearch>, ApiError> {
        Ok(self
            .lock()?
            .searches
            .get(&(username.to_string(), route_id))
            .cloned())
    }

    async fn insert_search(&self, search: RouteSearch) -> Result<RouteSearch, ApiError> {
        let mut tables = self.lock()?;
        let key = (search.username.clone(), search.route_id);
        let stored = tables
            .searches
            .entry(key)
            .and_modify(|existing| {
                existing.last_searched_timestamp = search.last_searched_timestamp;
            })
            .or_insert_with(|| search.clone());
        Ok(stored.clone())
    }

    async fn count_search(
        &self,
        username: &str,
        route_id: i32,
        now: DateTime<Utc>,
    ) -> Result<RouteSearch, ApiError> {
        let mut tables = self.lock()?;
        let search = tables
            .searches
            .get_mut(&(username.to_string(), route_id))
            .ok_or_else(|| ApiError::not_found("Route search not found"))?;
        if now - search.last_updated_timestamp > Duration::seconds(DEBOUNCE_SECS) {
            search.search_count += 1;
            search.last_updated_timestamp = now;
        }
        search.last_searched_timestamp = now;
        Ok(search.clone())
    }

    async fn touch_search(
        &self,
        username: &str,
        route_id: i32,
        now: DateTime<Utc>,
    ) -> Result<RouteSearch, ApiError> {
        let mut tables = self.lock()?;
        let search = tables
            .searches
            .get_mut(&(username.to_string(), route_id))
            .ok_or_else(|| ApiError::not_found("Route search not found"))?;
        search.last_searched_timestamp = now;
        Ok(search.clone())
    }

    async fn searches_for(&self, username: &str) -> Result<Vec<SearchedRoute>, ApiError> {
        let tables = self.lock()?;
        let mut list: Vec<SearchedRoute> = tables
            .searches
            .values()
            .filter(|s| s.username == username)
            .filter_map(|s| {
                let route = tables.routes.iter().find(|r| r.route_id == s.route_id)?;
                Some(SearchedRoute {
                    route_id: route.route_id,
                    origin: route.origin.clone(),
                    destination: route.destination.clone(),
                    search_count: s.search_count,
                    last_searched_timestamp: s.last_searched_timestamp,
                })
            })
            .collect();
        list.sort_by(|a, b| {
            b.search_count
                .cmp(&a.search_count)
                .then(b.last_searched_timestamp.cmp(&a.last_searched_timestamp))
        });
        Ok(list)
    }
}
