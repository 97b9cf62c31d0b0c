//! Translation of pool and Diesel failures into repository port errors.
//!
//! Conflict and reference messages produced here are shown to API callers,
//! so they never echo database text. Everything else is logged at debug
//! level and collapsed into a generic message.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::ResourcePersistenceError;

use super::pool::PoolError;

/// Map pool failures to connection errors.
pub(crate) fn map_pool_error(error: PoolError) -> ResourcePersistenceError {
    match error {
        PoolError::Unavailable { message } | PoolError::Startup { message } => {
            ResourcePersistenceError::connection(message)
        }
    }
}

fn conflict_message(resource: &str, constraint: Option<&str>) -> String {
    match constraint {
        Some(name) if name.contains("email") => "email already registered".to_owned(),
        Some(name) if name.contains("username") => "username already taken".to_owned(),
        _ => format!("{resource} already exists"),
    }
}

/// Map a Diesel error raised while operating on `resource`.
pub(crate) fn map_diesel_error(error: DieselError, resource: &str) -> ResourcePersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => debug!(
            resource,
            ?kind,
            message = info.message(),
            constraint = info.constraint_name(),
            "diesel operation failed"
        ),
        other => debug!(resource, error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            ResourcePersistenceError::conflict(conflict_message(resource, info.constraint_name()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            ResourcePersistenceError::invalid_reference(
                "referenced category or supplier does not exist",
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ResourcePersistenceError::connection("database connection error")
        }
        DieselError::NotFound => ResourcePersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => ResourcePersistenceError::query("database query error"),
        _ => ResourcePersistenceError::query("database error"),
    }
}
