use crate::mode::{FuelType, TravelMode};
use crate::units::metres_to_km;

/// Grid intensity used for electric vehicles, kg CO2 per kWh.
pub const GRID_KG_PER_KWH: f64 = 0.233;

const PETROL_CAR_KG_PER_KM: f64 = 0.170;
const DIESEL_CAR_KG_PER_KM: f64 = 0.168;
const ELECTRIC_CAR_KG_PER_KM: f64 = 0.047;
const TRANSIT_KG_PER_KM: f64 = 0.105;

const WALKING_KCAL_PER_KM: f64 = 55.0;
const CYCLING_KCAL_PER_KM: f64 = 28.0;

/// Emission factor per km for one traveller using `mode`.
///
/// `fuel` only matters when driving.
pub fn kg_per_km(mode: TravelMode, fuel: FuelType) -> f64 {
    match mode {
        TravelMode::Walking | TravelMode::Cycling => 0.0,
        TravelMode::Transit => TRANSIT_KG_PER_KM,
        TravelMode::Driving => match fuel {
            FuelType::Petrol => PETROL_CAR_KG_PER_KM,
            FuelType::Diesel => DIESEL_CAR_KG_PER_KM,
            FuelType::Electric => ELECTRIC_CAR_KG_PER_KM,
        },
    }
}

/// Kilograms of CO2 emitted covering `distance_m` metres.
pub fn co2_kg(distance_m: f64, mode: TravelMode, fuel: FuelType) -> f64 {
    metres_to_km(distance_m) * kg_per_km(mode, fuel)
}

/// Calories burned covering `distance_m` metres; zero for motorised modes.
pub fn calories_burned(distance_m: f64, mode: TravelMode) -> f64 {
    let per_km = match mode {
        TravelMode::Walking => WALKING_KCAL_PER_KM,
        TravelMode::Cycling => CYCLING_KCAL_PER_KM,
        TravelMode::Driving | TravelMode::Transit => 0.0,
    };
    metres_to_km(distance_m) * per_km
}

pub fn ev_co2_kg(watt_hours: f64) -> f64 {
    watt_hours / 1000.0 * GRID_KG_PER_KWH
}

/// Split a car journey's emissions between the driver and `passengers`.
///
/// Returns `(per_person, saved)` where `saved` is what the passengers
/// avoided by not driving separately.
pub fn shared_co2(total_kg: f64, passengers: u32) -> (f64, f64) {
    let people = f64::from(passengers + 1);
    let per_person = total_kg / people;
    (per_person, total_kg - per_person)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn active_modes_emit_nothing() {
        assert_eq!(co2_kg(10_000.0, TravelMode::Walking, FuelType::Petrol), 0.0);
        assert_eq!(co2_kg(10_000.0, TravelMode::Cycling, FuelType::Diesel), 0.0);
    }

    #[test]
    fn driving_depends_on_fuel() {
        assert!(close(co2_kg(10_000.0, TravelMode::Driving, FuelType::Petrol), 1.7));
        assert!(close(co2_kg(10_000.0, TravelMode::Driving, FuelType::Electric), 0.47));
        assert!(
            co2_kg(1_000.0, TravelMode::Driving, FuelType::Diesel)
                < co2_kg(1_000.0, TravelMode::Driving, FuelType::Petrol)
        );
    }

    #[test]
    fn calories_only_for_active_modes() {
        assert!(close(calories_burned(2_000.0, TravelMode::Walking), 110.0));
        assert!(close(calories_burned(2_000.0, TravelMode::Cycling), 56.0));
        assert_eq!(calories_burned(2_000.0, TravelMode::Driving), 0.0);
    }

    #[test]
    fn sharing_splits_emissions() {
        let (per_person, saved) = shared_co2(4.0, 3);
        assert!(close(per_person, 1.0));
        assert!(close(saved, 3.0));

        let (alone, none_saved) = shared_co2(4.0, 0);
        assert!(close(alone, 4.0));
        assert_eq!(none_saved, 0.0);
    }

    #[test]
    fn ev_emissions_use_grid_intensity() {
        assert!(close(ev_co2_kg(1000.0), GRID_KG_PER_KWH));
    }
}
