use crate::units::gallons_to_litres;

/// Typical electric-car consumption when nothing better is known.
pub const DEFAULT_EV_WH_PER_MILE: f64 = 300.0;

/// Litres of fuel burned covering `miles` in a car doing `mpg` (imperial).
///
/// A non-positive `mpg` has no meaningful answer and yields zero.
pub fn fuel_used_litres(miles: f64, mpg: f64) -> f64 {
    if mpg <= 0.0 {
        return 0.0;
    }
    gallons_to_litres(miles / mpg)
}

pub fn fuel_cost(litres: f64, price_per_litre: f64) -> f64 {
    litres * price_per_litre
}

pub fn watt_hours_required(wh_per_mile: f64, miles: f64) -> f64 {
    wh_per_mile * miles
}

/// Charging cost of an electric car covering `miles`.
pub fn ev_cost(wh_per_mile: f64, miles: f64, price_per_kwh: f64) -> f64 {
    watt_hours_required(wh_per_mile, miles) / 1000.0 * price_per_kwh
}
