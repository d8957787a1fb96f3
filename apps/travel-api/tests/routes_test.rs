mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;

// ---------------------------------------------------------------------------
// POST /api/v1/routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn route_search_returns_estimates_per_mode() {
    let (server, _state) = common::test_server();
    let token = common::register_and_login(&server, "alice").await;

    let resp = server
        .post("/api/v1/routes")
        .add_header(AUTHORIZATION, common::bearer(&token))
        .json(&serde_json::json!({
            "origin": "  Exeter St Davids ",
            "destination": "Exeter Quay",
            "mode": "bicycling",
        }))
        .await;
    resp.assert_status_ok();
    let body: serde_json::Value = resp.json();

    assert_eq!(body["origin"], "Exeter St Davids");
    assert_eq!(body["selected_mode"], "cycling");
    assert_eq!(body["distance_range"], "4.2 km - 5.6 km");
    assert_eq!(body["search_count"], 1);

    let modes = body["modes"].as_array().unwrap();
    assert_eq!(modes.len(), 4);
    let walking = &modes[0];
    assert_eq!(walking["mode"], "walking");
    assert_eq!(walking["calories"], 231.0);
    assert_eq!(walking["co2_kg"], 0.0);
    let transit = &modes[3];
    assert_eq!(transit["mode"], "transit");
    assert!(transit["estimate"].is_null());
    assert!(transit["co2_kg"].is_null());

    let driving = &body["driving"];
    assert_eq!(driving["car_make"], "Not set");
    assert_eq!(driving["fuel_type"], "petrol");
    assert_eq!(driving["fuel_price"], 1.5);
    assert!(driving["fuel_used"].as_f64().unwrap() > 0.0);
    assert!(driving["energy_used"].is_null());
}

#[tokio::test]
async fn route_search_validates_input() {
    let (server, _state) = common::test_server();
    let token = common::register_and_login(&server, "alice").await;

    let resp = server
        .post("/api/v1/routes")
        .add_header(AUTHORIZATION, common::bearer(&token))
        .json(&serde_json::json!({ "origin": "  ", "destination": "Quay", "mode": "flying" }))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json();
    assert_eq!(common::error_messages(&body).len(), 2);
}

// ---------------------------------------------------------------------------
// GET /api/v1/routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn history_starts_empty() {
    let (server, _state) = common::test_server();
    let token = common::register_and_login(&server, "alice").await;

    let body: serde_json::Value = server
        .get("/api/v1/routes")
        .add_header(AUTHORIZATION, common::bearer(&token))
        .await
        .json();
    assert_eq!(body["unique_routes"], 0);
    assert_eq!(body["total_searches"], 0);
    assert!(body["most_frequent"].is_null());
}

#[tokio::test]
async fn repeated_searches_within_window_count_once() {
    let (server, _state) = common::test_server();
    let token = common::register_and_login(&server, "alice").await;

    for _ in 0..3 {
        server
            .post("/api/v1/routes")
            .add_header(AUTHORIZATION, common::bearer(&token))
            .json(&serde_json::json!({ "origin": "X", "destination": "Y", "mode": "walking" }))
            .await
            .assert_status_ok();
    }
    server
        .post("/api/v1/routes")
        .add_header(AUTHORIZATION, common::bearer(&token))
        .json(&serde_json::json!({ "origin": "Y", "destination": "X", "mode": "driving" }))
        .await
        .assert_status_ok();

    let body: serde_json::Value = server
        .get("/api/v1/routes")
        .add_header(AUTHORIZATION, common::bearer(&token))
        .await
        .json();
    assert_eq!(body["unique_routes"], 2);
    assert_eq!(body["total_searches"], 2);
    // Both counted once; the latest search wins the tie.
    assert_eq!(body["most_frequent"]["origin"], "Y");
    assert_eq!(body["routes"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn search_history_is_per_user() {
    let (server, _state) = common::test_server();
    let alice = common::register_and_login(&server, "alice").await;
    let bob = common::register_and_login(&server, "bob").await;

    server
        .post("/api/v1/routes")
        .add_header(AUTHORIZATION, common::bearer(&alice))
        .json(&serde_json::json!({ "origin": "X", "destination": "Y", "mode": "transit" }))
        .await
        .assert_status_ok();

    let body: serde_json::Value = server
        .get("/api/v1/routes")
        .add_header(AUTHORIZATION, common::bearer(&bob))
        .await
        .json();
    assert_eq!(body["unique_routes"], 0);
}

#[tokio::test]
async fn settings_report_search_totals() {
    let (server, _state) = common::test_server();
    let token = common::register_and_login(&server, "alice").await;

    let searches = [
        ("Exeter", "Plymouth"),
        ("Exeter", "Plymouth"),
        ("Exeter", "Truro"),
    ];
    for (origin, destination) in searches {
        server
            .post("/api/v1/routes")
            .add_header(AUTHORIZATION, common::bearer(&token))
            .json(&serde_json::json!({
                "origin": origin,
                "destination": destination,
                "mode": "driving",
            }))
            .await
            .assert_status_ok();
    }

    let resp = server
        .get("/api/v1/settings")
        .add_header(AUTHORIZATION, common::bearer(&token))
        .await;
    resp.assert_status_ok();
    let body: serde_json::Value = resp.json();
    assert_eq!(body["routes_searched"], 2);
    assert_eq!(body["total_searches"], 2);
}
