use diesel::prelude::*;
use serde::Serialize;
use travel_common::FuelType;
use utoipa::ToSchema;

use crate::db::schema::car;

pub const DEFAULT_MAKE: &str = "Not set";
pub const DEFAULT_MPG: i32 = 50;
pub const DEFAULT_ENGINE_SIZE: f64 = 1.0;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, ToSchema)]
#[diesel(table_name = car)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Car {
    pub owner: String,
    pub make: String,
    pub mpg: i32,
    pub fuel_type: String,
    pub engine_size: f64,
}

impl Car {
    /// Parsed fuel type. Rows written before validation existed fall back
    /// to petrol.
    pub fn fuel(&self) -> FuelType {
        self.fuel_type.parse().unwrap_or_default()
    }

    pub fn apply(&mut self, changes: CarChanges) {
        self.make = changes.make;
        self.mpg = changes.mpg;
        self.fuel_type = changes.fuel_type;
        self.engine_size = changes.engine_size;
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = car)]
pub struct NewCar {
    pub owner: String,
    pub make: String,
    pub mpg: i32,
    pub fuel_type: String,
    pub engine_size: f64,
}

impl NewCar {
    /// Placeholder car every account starts with.
    pub fn placeholder(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            make: DEFAULT_MAKE.to_string(),
            mpg: DEFAULT_MPG,
            fuel_type: FuelType::Petrol.as_str().to_string(),
            engine_size: DEFAULT_ENGINE_SIZE,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = car)]
pub struct CarChanges {
    pub make: String,
    pub mpg: i32,
    pub fuel_type: String,
    pub engine_size: f64,
}
