pub const MILES_PER_KM: f64 = 0.621371;
pub const LITRES_PER_GALLON: f64 = 4.54609;

pub fn km_to_miles(km: f64) -> f64 {
    km * MILES_PER_KM
}

pub fn miles_to_km(miles: f64) -> f64 {
    miles / MILES_PER_KM
}

/// Imperial gallons to litres.
pub fn gallons_to_litres(gallons: f64) -> f64 {
    gallons * LITRES_PER_GALLON
}

pub fn metres_to_km(metres: f64) -> f64 {
    metres / 1000.0
}

/// Round to `places` decimal places for display.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
