//! Per-user route search counting.
//!
//! Repeating the same search inside [`DEBOUNCE_SECS`] of the last counted
//! one refreshes "last seen" without adding a visit.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::RouteSearchStore;
use crate::error::ApiError;
use crate::models::route::{RouteSearch, SearchedRoute};

pub const DEBOUNCE_SECS: i64 = 5 * 60;

/// What a new search does to an existing counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchUpdate {
    Create,
    Count,
    Touch,
}

pub fn classify(existing: Option<&RouteSearch>, now: DateTime<Utc>) -> SearchUpdate {
    match existing {
        None => SearchUpdate::Create,
        Some(search) if now - search.last_updated_timestamp > Duration::seconds(DEBOUNCE_SECS) => {
            SearchUpdate::Count
        }
        Some(_) => SearchUpdate::Touch,
    }
}

/// Record that `username` searched origin to destination at `now`.
pub async fn record_search(
    store: &dyn RouteSearchStore,
    username: &str,
    origin: &str,
    destination: &str,
    now: DateTime<Utc>,
) -> Result<RouteSearch, ApiError> {
    let route = store.find_or_create_route(origin, destination).await?;
    let existing = store.search(username, route.route_id).await?;

    let search = match classify(existing.as_ref(), now) {
        SearchUpdate::Create => {
            store
                .insert_search(RouteSearch {
                    username: username.to_string(),
                    route_id: route.route_id,
                    search_count: 1,
                    last_searched_timestamp: now,
                    last_updated_timestamp: now,
                })
                .await?
        }
        SearchUpdate::Count => store.count_search(username, route.route_id, now).await?,
        SearchUpdate::Touch => store.touch_search(username, route.route_id, now).await?,
    };

    tracing::info!(
        %username,
        route_id = route.route_id,
        search_count = search.search_count,
        "route search recorded"
    );
    Ok(search)
}

/// Summary of a user's searching habits.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchSummary {
    pub unique_routes: i64,
    pub total_searches: i64,
    /// Highest count; ties go to the most recently searched.
    pub most_frequent: Option<SearchedRoute>,
    pub routes: Vec<SearchedRoute>,
}

pub async fn summary(
    store: &dyn RouteSearchStore,
    username: &str,
) -> Result<SearchSummary, ApiError> {
    let routes = store.searches_for(username).await?;
    let (unique_routes, total_searches) = totals(&routes);
    Ok(SearchSummary {
        unique_routes,
        total_searches,
        most_frequent: routes.first().cloned(),
        routes,
    })
}

/// `(unique routes, total searches)` for a user; `(0, 0)` when they have
/// never searched.
pub async fn get_total_routes_searched(
    store: &dyn RouteSearchStore,
    username: &str,
) -> Result<(i64, i64), ApiError> {
    Ok(totals(&store.searches_for(username).await?))
}

fn totals(routes: &[SearchedRoute]) -> (i64, i64) {
    let total = routes.iter().map(|r| i64::from(r.search_count)).sum();
    (routes.len() as i64, total)
}
