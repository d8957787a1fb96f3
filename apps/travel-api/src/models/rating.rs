use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::schema::rating;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rating)]
pub struct NewRating {
    pub rated_username: String,
    pub rating_given: i32,
}

/// Aggregate of every rating a user has received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct DriverRating {
    pub average: Option<f64>,
    pub count: i64,
}

impl DriverRating {
    pub fn from_values(values: &[i32]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let sum: i64 = values.iter().map(|&v| i64::from(v)).sum();
        let count = values.len() as i64;
        Self {
            average: Some(sum as f64 / count as f64),
            count,
        }
    }
}
