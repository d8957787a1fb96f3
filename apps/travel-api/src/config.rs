use travel_common::FuelType;

/// Travel API configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Pump price used for petrol fuel-cost estimates, per litre.
    pub petrol_price_per_litre: f64,
    /// Pump price used for diesel fuel-cost estimates, per litre.
    pub diesel_price_per_litre: f64,
    /// Electricity tariff used for electric-vehicle costs, per kWh.
    pub electricity_price_per_kwh: f64,
    /// Default monthly mileage for trend projections.
    pub monthly_miles: f64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Panics with a descriptive message if a required variable is missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_var("DATABASE_URL"),
            port: optional_var("PORT", 4100),
            petrol_price_per_litre: optional_var("PETROL_PRICE_PER_LITRE", 1.50),
            diesel_price_per_litre: optional_var("DIESEL_PRICE_PER_LITRE", 1.60),
            electricity_price_per_kwh: optional_var("ELECTRICITY_PRICE_PER_KWH", 0.34),
            monthly_miles: optional_var("MONTHLY_MILES", 1000.0),
        }
    }

    /// Price per litre for combustion fuels, per kWh for electric.
    pub fn fuel_price(&self, fuel: FuelType) -> f64 {
        match fuel {
            FuelType::Petrol => self.petrol_price_per_litre,
            FuelType::Diesel => self.diesel_price_per_litre,
            FuelType::Electric => self.electricity_price_per_kwh,
        }
    }
}

impl Default for Config {
    /// Defaults without a database, for in-memory runs and tests.
    fn default() -> Self {
        Self {
            database_url: String::new(),
            port: 4100,
            petrol_price_per_litre: 1.50,
            diesel_price_per_litre: 1.60,
            electricity_price_per_kwh: 0.34,
            monthly_miles: 1000.0,
        }
    }
}

fn required_var(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} env var is required"))
}

fn optional_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
