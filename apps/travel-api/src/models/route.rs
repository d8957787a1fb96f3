use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::schema::{route, route_search};

/// Canonical (origin, destination) pair. Addresses are stored verbatim.
#[derive(Debug, Clone, Queryable, Selectable, Serialize, ToSchema)]
#[diesel(table_name = route)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Route {
    pub route_id: i32,
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = route)]
pub struct NewRoute<'a> {
    pub origin: &'a str,
    pub destination: &'a str,
}

/// Per-user search counter for one route.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, ToSchema)]
#[diesel(table_name = route_search)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RouteSearch {
    pub username: String,
    pub route_id: i32,
    pub search_count: i32,
    pub last_searched_timestamp: DateTime<Utc>,
    pub last_updated_timestamp: DateTime<Utc>,
}

/// A user's search counter joined with the route it counts.
#[derive(Debug, Clone, Queryable, Serialize, ToSchema)]
pub struct SearchedRoute {
    pub route_id: i32,
    pub origin: String,
    pub destination: String,
    pub search_count: i32,
    pub last_searched_timestamp: DateTime<Utc>,
}
