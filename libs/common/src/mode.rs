use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A way of travelling between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Walking,
    Driving,
    #[serde(alias = "bicycling")]
    Cycling,
    Transit,
}

impl TravelMode {
    pub const ALL: [TravelMode; 4] = [
        TravelMode::Walking,
        TravelMode::Driving,
        TravelMode::Cycling,
        TravelMode::Transit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Driving => "driving",
            TravelMode::Cycling => "cycling",
            TravelMode::Transit => "transit",
        }
    }

    /// Human-powered modes burn calories instead of fuel.
    pub fn is_active(self) -> bool {
        matches!(self, TravelMode::Walking | TravelMode::Cycling)
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walking" => Ok(TravelMode::Walking),
            "driving" => Ok(TravelMode::Driving),
            "cycling" | "bicycling" => Ok(TravelMode::Cycling),
            "transit" => Ok(TravelMode::Transit),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// Fuel a car runs on. Petrol unless told otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    #[default]
    Petrol,
    Diesel,
    Electric,
}

impl FuelType {
    pub fn as_str(self) -> &'static str {
        match self {
            FuelType::Petrol => "petrol",
            FuelType::Diesel => "diesel",
            FuelType::Electric => "electric",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuelType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "petrol" => Ok(FuelType::Petrol),
            "diesel" => Ok(FuelType::Diesel),
            "electric" => Ok(FuelType::Electric),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// Returned when a string names no known mode or fuel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bicycling_is_an_alias_for_cycling() {
        assert_eq!("bicycling".parse::<TravelMode>(), Ok(TravelMode::Cycling));
        let mode: TravelMode = serde_json::from_str("\"bicycling\"").unwrap();
        assert_eq!(mode, TravelMode::Cycling);
        assert_eq!(serde_json::to_string(&mode).unwrap(), "\"cycling\"");
    }

    #[test]
    fn fuel_type_parsing_is_case_insensitive() {
        assert_eq!(" Diesel ".parse::<FuelType>(), Ok(FuelType::Diesel));
        assert!("lpg".parse::<FuelType>().is_err());
    }
}
