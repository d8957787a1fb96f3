//! Field checks for carpool requests, rides and joins.
//!
//! Every rule runs; a failure yields the full list of messages rather than
//! the first one hit.

use chrono::{DateTime, Utc};

use crate::models::carpool_request::NewCarpoolRequest;
use crate::models::carpool_ride::{CarpoolRide, NewCarpoolRide};

pub const DESCRIPTION_LIMIT: usize = 500;

pub const MISSING_FIELDS: &str = "Please fill in all required fields (marked with *).";
pub const INVALID_PASSENGERS: &str = "Please enter a valid number of passengers (>= 1).";
pub const INVALID_SEATS: &str = "Please enter a valid number of seats (>= 1).";
pub const INVALID_PRICE: &str = "Please enter a valid price (>= 0).";
pub const PICKUP_NOT_FUTURE: &str = "The pickup time must be in the future.";
pub const UNKNOWN_DRIVER: &str = "The driver does not have an account.";

pub const RIDE_NOT_FOUND: &str = "This carpool journey does not exist.";
pub const OWN_RIDE: &str = "You cannot join your own carpool journey.";
pub const RIDE_COMPLETE: &str = "This carpool journey has already been completed.";
pub const NO_SEATS: &str = "There are not enough seats available.";

pub fn description_too_long(len: usize) -> String {
    format!(
        "Your description is too long - it contains {len} characters, and there is a \
         {DESCRIPTION_LIMIT} character limit."
    )
}

/// A passenger's ask for a lift, as submitted. `None` means not provided.
#[derive(Debug, Clone, Default)]
pub struct RequestDraft {
    pub num_passengers: Option<i32>,
    pub starting_point: Option<String>,
    pub destination: Option<String>,
    pub pickup_datetime: Option<DateTime<Utc>>,
    pub price: Option<i32>,
    pub description: String,
}

/// A driver's offer of a ride, as submitted.
#[derive(Debug, Clone, Default)]
pub struct RideDraft {
    pub seats: Option<i32>,
    pub starting_point: Option<String>,
    pub destination: Option<String>,
    pub pickup_datetime: Option<DateTime<Utc>>,
    pub price: Option<i32>,
    pub description: String,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn check_description(description: &str, errors: &mut Vec<String>) {
    let len = description.chars().count();
    if len > DESCRIPTION_LIMIT {
        errors.push(description_too_long(len));
    }
}

fn check_pickup(pickup: Option<DateTime<Utc>>, now: DateTime<Utc>, errors: &mut Vec<String>) {
    if let Some(at) = pickup {
        if at <= now {
            errors.push(PICKUP_NOT_FUTURE.to_string());
        }
    }
}

fn check_price(price: Option<i32>, errors: &mut Vec<String>) {
    if let Some(p) = price {
        if p < 0 {
            errors.push(INVALID_PRICE.to_string());
        }
    }
}

/// Validate a standalone request and build the row to insert.
///
/// Zero passengers counts as provided (and then fails the range rule);
/// only `None` is missing. Price is optional for requests.
pub fn validate_carpool_request(
    requester: &str,
    draft: &RequestDraft,
    now: DateTime<Utc>,
) -> Result<NewCarpoolRequest, Vec<String>> {
    let mut errors = Vec::new();

    let required = match (
        draft.num_passengers,
        present(&draft.starting_point),
        present(&draft.destination),
        draft.pickup_datetime,
    ) {
        (Some(n), Some(from), Some(to), Some(at)) => Some((n, from, to, at)),
        _ => {
            errors.push(MISSING_FIELDS.to_string());
            None
        }
    };

    if let Some(n) = draft.num_passengers {
        if n < 1 {
            errors.push(INVALID_PASSENGERS.to_string());
        }
    }
    check_price(draft.price, &mut errors);
    check_description(&draft.description, &mut errors);
    check_pickup(draft.pickup_datetime, now, &mut errors);

    match required {
        Some((num_passengers, starting_point, destination, pickup_datetime))
            if errors.is_empty() =>
        {
            Ok(NewCarpoolRequest {
                requester: requester.to_string(),
                journey_id: None,
                num_passengers,
                starting_point,
                destination,
                pickup_datetime,
                price: draft.price,
                description: draft.description.clone(),
            })
        }
        _ => Err(errors),
    }
}

/// Validate a ride offer and build the row to insert.
///
/// `driver_exists` is the result of looking the driver up beforehand.
/// Estimates are left empty for the caller to fill.
pub fn validate_carpool_ride(
    driver: &str,
    driver_exists: bool,
    draft: &RideDraft,
    now: DateTime<Utc>,
) -> Result<NewCarpoolRide, Vec<String>> {
    let mut errors = Vec::new();

    let driver_given = !driver.trim().is_empty();
    let required = match (
        driver_given,
        draft.seats,
        present(&draft.starting_point),
        present(&draft.destination),
        draft.pickup_datetime,
        draft.price,
    ) {
        (true, Some(seats), Some(from), Some(to), Some(at), Some(price)) => {
            Some((seats, from, to, at, price))
        }
        _ => {
            errors.push(MISSING_FIELDS.to_string());
            None
        }
    };

    if let Some(seats) = draft.seats {
        if seats < 1 {
            errors.push(INVALID_SEATS.to_string());
        }
    }
    check_price(draft.price, &mut errors);
    check_description(&draft.description, &mut errors);
    check_pickup(draft.pickup_datetime, now, &mut errors);
    if driver_given && !driver_exists {
        errors.push(UNKNOWN_DRIVER.to_string());
    }

    match required {
        Some((seats, starting_point, destination, pickup_datetime, price)) if errors.is_empty() => {
            Ok(NewCarpoolRide {
                driver: driver.to_string(),
                seats_initial: seats,
                seats_available: seats,
                starting_point,
                destination,
                pickup_datetime,
                price,
                description: draft.description.clone(),
                distance: None,
                distance_text: None,
                estimate_duration: None,
                estimate_duration_text: None,
                estimate_co2_per_person: None,
                estimate_co2_saved: None,
            })
        }
        _ => Err(errors),
    }
}

/// Decide whether `username` may take a seat on `ride`.
///
/// A missing ride short-circuits since no other rule applies to it; the
/// remaining rules are all reported together.
pub fn validate_joining_carpool(
    ride: Option<&CarpoolRide>,
    username: &str,
) -> Result<(), Vec<String>> {
    let Some(ride) = ride else {
        return Err(vec![RIDE_NOT_FOUND.to_string()]);
    };

    let mut errors = Vec::new();
    if ride.driver == username {
        errors.push(OWN_RIDE.to_string());
    }
    if ride.is_complete {
        errors.push(RIDE_COMPLETE.to_string());
    }
    if ride.seats_available < 1 {
        errors.push(NO_SEATS.to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn request(num_passengers: i32) -> RequestDraft {
        RequestDraft {
            num_passengers: Some(num_passengers),
            starting_point: Some("University of Exeter Forum Library, Stocker Rd".into()),
            destination: Some("Exeter Quay, Exeter EX2 4BZ".into()),
            pickup_datetime: Some(now() + Duration::days(30)),
            price: None,
            description: "This is a test description.".into(),
        }
    }

    fn ride(seats: i32) -> RideDraft {
        RideDraft {
            seats: Some(seats),
            starting_point: Some("Exeter St Davids".into()),
            destination: Some("Plymouth".into()),
            pickup_datetime: Some(now() + Duration::hours(2)),
            price: Some(5),
            description: String::new(),
        }
    }

    fn existing_ride(driver: &str, seats_available: i32, is_complete: bool) -> CarpoolRide {
        CarpoolRide {
            journey_id: 1,
            driver: driver.into(),
            seats_initial: 3,
            seats_available,
            starting_point: "A".into(),
            destination: "B".into(),
            pickup_datetime: now() + Duration::hours(1),
            price: 0,
            description: String::new(),
            distance: None,
            distance_text: None,
            estimate_duration: None,
            estimate_duration_text: None,
            estimate_co2_per_person: None,
            estimate_co2_saved: None,
            is_complete,
        }
    }

    #[test]
    fn rejects_non_positive_passenger_counts() {
        for n in [-1, 0] {
            assert_eq!(
                validate_carpool_request("alice", &request(n), now()).unwrap_err(),
                vec![INVALID_PASSENGERS.to_string()]
            );
        }
    }

    #[test]
    fn accepts_valid_request() {
        let row = validate_carpool_request("alice", &request(3), now()).unwrap();
        assert_eq!(row.requester, "alice");
        assert_eq!(row.num_passengers, 3);
        assert_eq!(row.journey_id, None);
    }

    #[test]
    fn long_description_reports_its_length() {
        let mut draft = request(1);
        draft.description = "a".repeat(501);
        let errors = validate_carpool_request("alice", &draft, now()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Your description is too long - it contains 501 characters, and there is a \
                 500 character limit."
                    .to_string()
            ]
        );

        draft.description = "a".repeat(500);
        assert!(validate_carpool_request("alice", &draft, now()).is_ok());
    }

    #[test]
    fn pickup_must_be_strictly_in_the_future() {
        let mut draft = request(1);
        draft.pickup_datetime = Some(now() - Duration::days(365));
        assert_eq!(
            validate_carpool_request("alice", &draft, now()).unwrap_err(),
            vec![PICKUP_NOT_FUTURE.to_string()]
        );

        draft.pickup_datetime = Some(now());
        assert_eq!(
            validate_carpool_request("alice", &draft, now()).unwrap_err(),
            vec![PICKUP_NOT_FUTURE.to_string()]
        );

        draft.pickup_datetime = Some(now() + Duration::seconds(1));
        assert!(validate_carpool_request("alice", &draft, now()).is_ok());
    }

    #[test]
    fn missing_fields_are_distinct_from_zero() {
        let mut draft = request(1);
        draft.num_passengers = None;
        draft.destination = Some("   ".into());
        assert_eq!(
            validate_carpool_request("alice", &draft, now()).unwrap_err(),
            vec![MISSING_FIELDS.to_string()]
        );
    }

    #[test]
    fn reports_every_violation_together() {
        let draft = RequestDraft {
            num_passengers: Some(0),
            starting_point: None,
            destination: Some("Quay".into()),
            pickup_datetime: Some(now()),
            price: Some(-2),
            description: "x".repeat(600),
        };
        let errors = validate_carpool_request("alice", &draft, now()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                MISSING_FIELDS.to_string(),
                INVALID_PASSENGERS.to_string(),
                INVALID_PRICE.to_string(),
                description_too_long(600),
                PICKUP_NOT_FUTURE.to_string(),
            ]
        );
    }

    #[test]
    fn ride_starts_with_all_seats_available() {
        let row = validate_carpool_ride("bob", true, &ride(3), now()).unwrap();
        assert_eq!(row.seats_initial, 3);
        assert_eq!(row.seats_available, 3);
        assert_eq!(row.distance, None);
    }

    #[test]
    fn ride_rules() {
        assert_eq!(
            validate_carpool_ride("bob", true, &ride(0), now()).unwrap_err(),
            vec![INVALID_SEATS.to_string()]
        );

        let mut draft = ride(2);
        draft.price = Some(-1);
        assert_eq!(
            validate_carpool_ride("bob", true, &draft, now()).unwrap_err(),
            vec![INVALID_PRICE.to_string()]
        );

        draft.price = None;
        assert_eq!(
            validate_carpool_ride("bob", true, &draft, now()).unwrap_err(),
            vec![MISSING_FIELDS.to_string()]
        );
    }

    #[test]
    fn ride_for_unknown_driver_is_rejected() {
        assert_eq!(
            validate_carpool_ride("ghost", false, &ride(2), now()).unwrap_err(),
            vec![UNKNOWN_DRIVER.to_string()]
        );
    }

    #[test]
    fn cannot_join_missing_ride() {
        assert_eq!(
            validate_joining_carpool(None, "alice").unwrap_err(),
            vec![RIDE_NOT_FOUND.to_string()]
        );
    }

    #[test]
    fn cannot_join_own_ride() {
        let r = existing_ride("alice", 2, false);
        assert_eq!(
            validate_joining_carpool(Some(&r), "alice").unwrap_err(),
            vec![OWN_RIDE.to_string()]
        );
        assert!(validate_joining_carpool(Some(&r), "bob").is_ok());
    }

    #[test]
    fn join_collects_all_reasons() {
        let r = existing_ride("alice", 0, true);
        assert_eq!(
            validate_joining_carpool(Some(&r), "alice").unwrap_err(),
            vec![
                OWN_RIDE.to_string(),
                RIDE_COMPLETE.to_string(),
                NO_SEATS.to_string()
            ]
        );
    }

    #[test]
    fn ride_state_follows_seats_and_completion() {
        use crate::models::carpool_ride::RideState;
        assert_eq!(existing_ride("a", 1, false).state(), RideState::Open);
        assert_eq!(existing_ride("a", 0, false).state(), RideState::Full);
        assert_eq!(existing_ride("a", 0, true).state(), RideState::Completed);
    }
}
