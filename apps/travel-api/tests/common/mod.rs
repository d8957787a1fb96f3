#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Once};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::Router;
use axum_test::TestServer;
use diesel::pg::PgConnection;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use travel_api::config::Config;
use travel_api::estimate::{EstimateError, RouteEstimate, RouteEstimator};
use travel_api::AppState;
use travel_common::TravelMode;

pub const PASSWORD: &str = "password123";

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");
static MIGRATE: Once = Once::new();

/// Estimator with fixed per-mode figures, so responses are predictable.
pub struct FixedEstimator;

#[async_trait]
impl RouteEstimator for FixedEstimator {
    async fn estimate(
        &self,
        _origin: &str,
        _destination: &str,
        mode: TravelMode,
    ) -> Result<RouteEstimate, EstimateError> {
        let (metres, seconds) = match mode {
            TravelMode::Walking => (4_200.0, 3_000.0),
            TravelMode::Driving => (5_600.0, 720.0),
            TravelMode::Cycling => (4_500.0, 1_080.0),
            TravelMode::Transit => return Err(EstimateError::NoRoute),
        };
        Ok(RouteEstimate::new(metres, seconds))
    }
}

/// Build a test AppState over the in-memory stores.
pub fn test_state() -> AppState {
    AppState::in_memory(Config::default()).with_estimator(Arc::new(FixedEstimator))
}

/// Build a test AppState over the `_test` Postgres database, applying any
/// pending migrations first. Returns `None` when `DATABASE_URL` is unset so
/// database tests skip instead of failing.
pub async fn pg_state() -> Option<AppState> {
    let env_path = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    let _ = dotenvy::from_path(env_path);

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres test");
        return None;
    };
    let database_url = with_test_db_suffix(&database_url);

    let migrate_url = database_url.clone();
    tokio::task::spawn_blocking(move || {
        MIGRATE.call_once(|| {
            let mut conn =
                PgConnection::establish(&migrate_url).expect("failed to connect to test database");
            conn.run_pending_migrations(MIGRATIONS)
                .expect("failed to run migrations");
        });
    })
    .await
    .expect("migration task panicked");

    let db = travel_api::db::pool::connect(&database_url, 16).await;
    let config = Config {
        database_url,
        ..Config::default()
    };
    Some(AppState::postgres(db, config).with_estimator(Arc::new(FixedEstimator)))
}

fn with_test_db_suffix(database_url: &str) -> String {
    let (base, query) = match database_url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (database_url, None),
    };
    let Some((prefix, db_name)) = base.rsplit_once('/') else {
        return database_url.to_string();
    };
    if db_name.is_empty() || db_name.ends_with("_test") {
        return database_url.to_string();
    }

    let mut updated = format!("{prefix}/{db_name}_test");
    if let Some(query) = query {
        updated.push('?');
        updated.push_str(query);
    }
    updated
}

/// Username unlikely to collide with rows left by earlier runs.
pub fn unique_username(prefix: &str) -> String {
    format!("{prefix}{:08x}", rand::random::<u32>())
}

/// Build the full application router wired to a fresh in-memory state.
pub fn test_app() -> (Router, AppState) {
    let state = test_state();
    let app = travel_api::routes::router().with_state(state.clone());
    (app, state)
}

pub fn test_server() -> (TestServer, AppState) {
    let (app, state) = test_app();
    (TestServer::new(app).unwrap(), state)
}

/// Register a user with the shared test password.
pub async fn register_user(server: &TestServer, username: &str) {
    let resp = server
        .post("/api/v1/register")
        .json(&serde_json::json!({
            "username": username,
            "first_name": "Test",
            "last_name": "User",
            "password": PASSWORD,
            "password_confirm": PASSWORD,
        }))
        .await;
    resp.assert_status(StatusCode::CREATED);
}

/// Login a registered user and return their access token.
pub async fn login(server: &TestServer, username: &str) -> String {
    let resp = server
        .post("/api/v1/login")
        .json(&serde_json::json!({ "username": username, "password": PASSWORD }))
        .await;
    resp.assert_status_ok();
    let body: serde_json::Value = resp.json();
    body["access_token"].as_str().unwrap().to_string()
}

pub async fn register_and_login(server: &TestServer, username: &str) -> String {
    register_user(server, username).await;
    login(server, username).await
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Messages from a validation error body.
pub fn error_messages(body: &serde_json::Value) -> Vec<String> {
    body["error"]["details"]
        .as_array()
        .map(|details| {
            details
                .iter()
                .filter_map(|d| d["message"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
