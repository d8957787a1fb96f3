//! Shared travel arithmetic: unit conversions, fuel use, emissions and
//! long-term projections.

pub mod emissions;
pub mod fuel;
pub mod mode;
pub mod projection;
pub mod units;

pub use mode::{FuelType, TravelMode};
