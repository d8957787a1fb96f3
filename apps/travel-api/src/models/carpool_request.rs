use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::schema::carpool_request;

/// A standalone carpool ask, or, when `journey_id` is set, the record of a
/// passenger joining an existing ride. Rows are never updated.
#[derive(Debug, Clone, Queryable, Selectable, Serialize, ToSchema)]
#[diesel(table_name = carpool_request)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CarpoolRequest {
    pub request_id: i32,
    pub requester: String,
    pub journey_id: Option<i32>,
    pub num_passengers: i32,
    pub starting_point: String,
    pub destination: String,
    pub pickup_datetime: DateTime<Utc>,
    pub price: Option<i32>,
    pub description: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = carpool_request)]
pub struct NewCarpoolRequest {
    pub requester: String,
    pub journey_id: Option<i32>,
    pub num_passengers: i32,
    pub starting_point: String,
    pub destination: String,
    pub pickup_datetime: DateTime<Utc>,
    pub price: Option<i32>,
    pub description: String,
}
