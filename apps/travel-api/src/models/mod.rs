pub mod account;
pub mod car;
pub mod carpool_request;
pub mod carpool_ride;
pub mod profile;
pub mod rating;
pub mod route;
