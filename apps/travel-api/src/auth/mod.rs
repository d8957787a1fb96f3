pub mod middleware;
pub mod password;
pub mod registration;
pub mod tokens;
