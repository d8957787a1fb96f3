use serde::Serialize;

/// Horizons, in months, used for long-term projections.
pub const HORIZONS_MONTHS: [u32; 6] = [1, 3, 6, 12, 60, 120];

/// A monthly figure scaled to one horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projected {
    pub months: u32,
    pub value: f64,
}

/// Scale `monthly` to every horizon in [`HORIZONS_MONTHS`].
pub fn project(monthly: f64) -> Vec<Projected> {
    HORIZONS_MONTHS
        .iter()
        .map(|&months| Projected {
            months,
            value: monthly * f64::from(months),
        })
        .collect()
}
