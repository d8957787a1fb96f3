//! Distance and duration estimates for a trip, and their display text.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use travel_common::TravelMode;
use utoipa::ToSchema;

/// Driving/walking/cycling/transit estimate for one origin-destination pair.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RouteEstimate {
    pub distance_m: f64,
    pub distance_text: String,
    pub duration_s: f64,
    pub duration_text: String,
}

impl RouteEstimate {
    /// Build an estimate with the text forms derived from the numbers.
    pub fn new(distance_m: f64, duration_s: f64) -> Self {
        Self {
            distance_m,
            distance_text: format_distance(distance_m),
            duration_s,
            duration_text: format_duration(duration_s),
        }
    }
}

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("route estimates unavailable: {0}")]
    Unavailable(String),
    #[error("no route between the given places")]
    NoRoute,
}

#[async_trait]
pub trait RouteEstimator: Send + Sync {
    async fn estimate(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
    ) -> Result<RouteEstimate, EstimateError>;
}

/// Estimator used when no routing provider is configured. Every lookup
/// fails, so dependent fields come back empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredEstimator;

#[async_trait]
impl RouteEstimator for UnconfiguredEstimator {
    async fn estimate(
        &self,
        _origin: &str,
        _destination: &str,
        _mode: TravelMode,
    ) -> Result<RouteEstimate, EstimateError> {
        Err(EstimateError::Unavailable(
            "no routing provider configured".to_string(),
        ))
    }
}

/// Ask for an estimate, logging and discarding a failure.
pub async fn try_estimate(
    estimator: &dyn RouteEstimator,
    origin: &str,
    destination: &str,
    mode: TravelMode,
) -> Option<RouteEstimate> {
    match estimator.estimate(origin, destination, mode).await {
        Ok(estimate) => Some(estimate),
        Err(err) => {
            tracing::warn!(%err, %mode, "route estimate failed");
            None
        }
    }
}

/// `"850 m"` under a kilometre, otherwise kilometres to one decimal place.
pub fn format_distance(metres: f64) -> String {
    if metres < 1000.0 {
        format!("{} m", metres.round() as i64)
    } else {
        format!("{:.1} km", metres / 1000.0)
    }
}

/// Whole minutes, with hours and days split out: `"1 hour 5 mins"`.
pub fn format_duration(seconds: f64) -> String {
    let total_mins = (seconds / 60.0).round().max(0.0) as i64;
    let days = total_mins / (24 * 60);
    let hours = (total_mins % (24 * 60)) / 60;
    let mins = total_mins % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(plural(days, "day"));
    }
    if hours > 0 {
        parts.push(plural(hours, "hour"));
    }
    if mins > 0 || parts.is_empty() {
        parts.push(plural(mins, "min"));
    }
    parts.join(" ")
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}
