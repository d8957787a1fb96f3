pub mod accounts;
pub mod carpools;
pub mod health;
pub mod profiles;
pub mod route_search;
pub mod trends;

use axum::Router;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().merge(health::router()).nest(
        "/api/v1",
        accounts::router()
            .merge(profiles::router())
            .merge(carpools::router())
            .merge(route_search::router())
            .merge(trends::router()),
    )
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health,
        // Accounts
        accounts::register,
        accounts::login,
        accounts::logout,
        // Profiles
        profiles::get_profile,
        profiles::rate_user,
        // Settings
        profiles::get_settings,
        profiles::update_profile,
        profiles::update_car,
        // Carpools
        carpools::list_carpools,
        carpools::create_carpool,
        carpools::get_carpool,
        carpools::join_carpool,
        carpools::toggle_carpool_interest,
        carpools::create_carpool_request,
        carpools::list_carpool_requests,
        // Routes
        route_search::search_route,
        route_search::route_history,
        // Trends
        trends::get_trends,
    ),
    components(
        schemas(
            // Error types
            crate::error::ApiErrorBody,
            crate::error::ApiErrorDetail,
            crate::error::FieldError,
            // Models
            crate::models::profile::Profile,
            crate::models::car::Car,
            crate::models::carpool_ride::CarpoolRide,
            crate::models::carpool_ride::RideState,
            crate::models::carpool_ride::RideListing,
            crate::models::carpool_request::CarpoolRequest,
            crate::models::rating::DriverRating,
            crate::models::route::SearchedRoute,
            crate::estimate::RouteEstimate,
            crate::search_stats::SearchSummary,
            // Route request/response types
            health::HealthResponse,
            accounts::RegisterRequest,
            accounts::RegisterResponse,
            accounts::LoginRequest,
            accounts::LoginResponse,
            profiles::PublicProfile,
            profiles::RateRequest,
            profiles::SettingsResponse,
            profiles::UpdateProfileRequest,
            profiles::UpdateCarRequest,
            carpools::RideListItem,
            carpools::CreateCarpoolRequest,
            carpools::CarpoolDetail,
            carpools::InterestResponse,
            carpools::CreateCarpoolRequestBody,
            route_search::RouteSearchRequest,
            route_search::RouteSearchResponse,
            route_search::ModeEstimate,
            route_search::DrivingCost,
            trends::TrendsResponse,
            trends::VehicleTrend,
            trends::Projection,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check"),
        (name = "Accounts", description = "Registration and sessions"),
        (name = "Profiles", description = "Public profiles and ratings"),
        (name = "Settings", description = "Own profile and car"),
        (name = "Carpools", description = "Rides, joins, interest and requests"),
        (name = "Routes", description = "Route estimates and search history"),
        (name = "Trends", description = "Long-term cost and emission projections"),
    )
)]
pub struct ApiDoc;
