//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod bearer;
pub mod categories;
pub mod envelope;
pub mod error;
pub mod health;
pub mod products;
pub mod schemas;
pub mod state;
pub mod suppliers;
pub mod users;
pub mod validation;

pub use error::ApiResult;
