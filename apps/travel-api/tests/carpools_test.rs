mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Duration, Utc};

async fn post_ride(server: &TestServer, token: &str, seats: i32) -> i64 {
    let resp = server
        .post("/api/v1/carpools")
        .add_header(AUTHORIZATION, common::bearer(token))
        .json(&serde_json::json!({
            "seats": seats,
            "starting_point": "Exeter St Davids",
            "destination": "Plymouth",
            "pickup_datetime": Utc::now() + Duration::days(2),
            "price": 5,
            "description": "Leaving after lectures",
        }))
        .await;
    resp.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = resp.json();
    body["journey_id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// POST /api/v1/carpools
// ---------------------------------------------------------------------------

#[tokio::test]
async fn post_ride_fills_estimates() {
    let (server, _state) = common::test_server();
    let token = common::register_and_login(&server, "driver").await;
    let id = post_ride(&server, &token, 3).await;

    let resp = server
        .get(&format!("/api/v1/carpools/{id}"))
        .add_header(AUTHORIZATION, common::bearer(&token))
        .await;
    resp.assert_status_ok();
    let body: serde_json::Value = resp.json();
    assert_eq!(body["seats_initial"], 3);
    assert_eq!(body["seats_available"], 3);
    assert_eq!(body["state"], "open");
    assert_eq!(body["is_complete"], false);
    assert_eq!(body["distance"], 5600.0);
    assert_eq!(body["distance_text"], "5.6 km");
    assert_eq!(body["estimate_duration_text"], "12 mins");

    // 5.6 km of petrol driving split between the driver and three seats.
    let per_person = body["estimate_co2_per_person"].as_f64().unwrap();
    let saved = body["estimate_co2_saved"].as_f64().unwrap();
    assert!((per_person - 5.6 * 0.170 / 4.0).abs() < 1e-9);
    assert!((saved - 5.6 * 0.170 * 3.0 / 4.0).abs() < 1e-9);
}

#[tokio::test]
async fn post_ride_reports_all_errors() {
    let (server, _state) = common::test_server();
    let token = common::register_and_login(&server, "driver").await;

    let resp = server
        .post("/api/v1/carpools")
        .add_header(AUTHORIZATION, common::bearer(&token))
        .json(&serde_json::json!({
            "seats": 0,
            "starting_point": "Exeter",
            "destination": "Plymouth",
            "pickup_datetime": Utc::now() - Duration::hours(1),
            "price": 5,
        }))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json();
    assert_eq!(
        common::error_messages(&body),
        vec![
            "Please enter a valid number of seats (>= 1).",
            "The pickup time must be in the future.",
        ]
    );
}

// ---------------------------------------------------------------------------
// POST /api/v1/carpools/{id}/join
// ---------------------------------------------------------------------------

#[tokio::test]
async fn three_seats_three_passengers_then_full() {
    let (server, _state) = common::test_server();
    let driver = common::register_and_login(&server, "driver").await;
    let id = post_ride(&server, &driver, 3).await;

    for name in ["anna", "ben", "cara"] {
        let token = common::register_and_login(&server, name).await;
        let resp = server
            .post(&format!("/api/v1/carpools/{id}/join"))
            .add_header(AUTHORIZATION, common::bearer(&token))
            .await;
        resp.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = resp.json();
        assert_eq!(body["journey_id"], id);
        assert_eq!(body["num_passengers"], 1);
        assert_eq!(body["requester"], name);
    }

    let late = common::register_and_login(&server, "dave").await;
    let resp = server
        .post(&format!("/api/v1/carpools/{id}/join"))
        .add_header(AUTHORIZATION, common::bearer(&late))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json();
    assert_eq!(
        common::error_messages(&body),
        vec!["There are not enough seats available."]
    );

    let detail: serde_json::Value = server
        .get(&format!("/api/v1/carpools/{id}"))
        .add_header(AUTHORIZATION, common::bearer(&driver))
        .await
        .json();
    assert_eq!(detail["seats_available"], 0);
    assert_eq!(detail["state"], "full");
    assert_eq!(
        detail["passengers"],
        serde_json::json!(["anna", "ben", "cara"])
    );
}

#[tokio::test]
async fn driver_cannot_join_own_ride() {
    let (server, _state) = common::test_server();
    let driver = common::register_and_login(&server, "driver").await;
    let id = post_ride(&server, &driver, 2).await;

    let resp = server
        .post(&format!("/api/v1/carpools/{id}/join"))
        .add_header(AUTHORIZATION, common::bearer(&driver))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json();
    assert_eq!(
        common::error_messages(&body),
        vec!["You cannot join your own carpool journey."]
    );
}

#[tokio::test]
async fn joining_missing_ride_is_a_validation_message() {
    let (server, _state) = common::test_server();
    let token = common::register_and_login(&server, "anna").await;

    let resp = server
        .post("/api/v1/carpools/404/join")
        .add_header(AUTHORIZATION, common::bearer(&token))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json();
    assert_eq!(
        common::error_messages(&body),
        vec!["This carpool journey does not exist."]
    );
}

#[tokio::test]
async fn missing_ride_detail_is_404() {
    let (server, _state) = common::test_server();
    let token = common::register_and_login(&server, "anna").await;

    server
        .get("/api/v1/carpools/404")
        .add_header(AUTHORIZATION, common::bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// GET /api/v1/carpools, /api/v1/toggle_carpool_interest/{id}
// ---------------------------------------------------------------------------

#[tokio::test]
async fn interest_toggles_and_shows_in_listing() {
    let (server, _state) = common::test_server();
    let driver = common::register_and_login(&server, "driver").await;
    let id = post_ride(&server, &driver, 2).await;
    let anna = common::register_and_login(&server, "anna").await;

    let first: serde_json::Value = server
        .get(&format!("/api/v1/toggle_carpool_interest/{id}"))
        .add_header(AUTHORIZATION, common::bearer(&anna))
        .await
        .json();
    assert_eq!(first["interested"], true);

    let listing: serde_json::Value = server
        .get("/api/v1/carpools")
        .add_header(AUTHORIZATION, common::bearer(&anna))
        .await
        .json();
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["journey_id"], id);
    assert_eq!(listing[0]["interested"], true);
    assert_eq!(listing[0]["driver_rating"]["count"], 0);

    let second: serde_json::Value = server
        .get(&format!("/api/v1/toggle_carpool_interest/{id}"))
        .add_header(AUTHORIZATION, common::bearer(&anna))
        .await
        .json();
    assert_eq!(second["interested"], false);

    let detail: serde_json::Value = server
        .get(&format!("/api/v1/carpools/{id}"))
        .add_header(AUTHORIZATION, common::bearer(&anna))
        .await
        .json();
    assert_eq!(detail["interest_count"], 0);
    assert_eq!(detail["seats_available"], 2);
}

#[tokio::test]
async fn toggle_interest_on_missing_ride_is_404() {
    let (server, _state) = common::test_server();
    let token = common::register_and_login(&server, "anna").await;

    server
        .get("/api/v1/toggle_carpool_interest/77")
        .add_header(AUTHORIZATION, common::bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// /api/v1/carpool_requests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn standalone_requests_are_listed_with_joins() {
    let (server, _state) = common::test_server();
    let driver = common::register_and_login(&server, "driver").await;
    let id = post_ride(&server, &driver, 2).await;
    let anna = common::register_and_login(&server, "anna").await;

    let resp = server
        .post("/api/v1/carpool_requests")
        .add_header(AUTHORIZATION, common::bearer(&anna))
        .json(&serde_json::json!({
            "num_passengers": 2,
            "starting_point": "University of Exeter Forum Library",
            "destination": "Exeter Quay",
            "pickup_datetime": Utc::now() + Duration::days(30),
        }))
        .await;
    resp.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = resp.json();
    assert!(body["journey_id"].is_null());
    assert!(body["price"].is_null());

    server
        .post(&format!("/api/v1/carpools/{id}/join"))
        .add_header(AUTHORIZATION, common::bearer(&anna))
        .await
        .assert_status(StatusCode::CREATED);

    let list: serde_json::Value = server
        .get("/api/v1/carpool_requests")
        .add_header(AUTHORIZATION, common::bearer(&anna))
        .await
        .json();
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    // Latest pickup first.
    assert!(list[0]["journey_id"].is_null());
    assert_eq!(list[1]["journey_id"], id);
}

#[tokio::test]
async fn request_with_long_description_is_rejected() {
    let (server, _state) = common::test_server();
    let anna = common::register_and_login(&server, "anna").await;

    let resp = server
        .post("/api/v1/carpool_requests")
        .add_header(AUTHORIZATION, common::bearer(&anna))
        .json(&serde_json::json!({
            "num_passengers": 0,
            "starting_point": "Forum",
            "destination": "Quay",
            "pickup_datetime": Utc::now() + Duration::days(1),
            "description": "x".repeat(501),
        }))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json();
    assert_eq!(
        common::error_messages(&body),
        vec![
            "Please enter a valid number of passengers (>= 1).".to_string(),
            "Your description is too long - it contains 501 characters, and there is a 500 \
             character limit."
                .to_string(),
        ]
    );
}
