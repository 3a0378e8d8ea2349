//! Operations behind the routes. Each request type validates its
//! input and talks to the store through [`App`](crate::App).
pub mod profile;
pub mod users;
