//! The HTTP surface of the service.
pub mod auth;
pub mod controllers;
pub mod error;
pub mod jwt;

pub use auth::AuthUser;
pub use error::Error;
pub use jwt::Jwt;
