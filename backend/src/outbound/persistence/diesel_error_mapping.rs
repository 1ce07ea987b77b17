//! Shared Diesel error mapping for the repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

fn log_failure(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }
}

/// Map Diesel errors into query/connection constructors.
pub(crate) fn map_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    log_failure(&error);
    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Like [`map_diesel_error`], routing unique violations to `conflict` with
/// the violated constraint name.
pub(crate) fn map_diesel_error_with_conflict<E, Q, C, U>(
    error: DieselError,
    query: Q,
    connection: C,
    conflict: U,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
    U: FnOnce(String) -> E,
{
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        let constraint = info.constraint_name().unwrap_or("unique constraint");
        debug!(constraint, "unique constraint violated");
        return conflict(constraint.to_owned());
    }
    map_diesel_error(error, query, connection)
}

/// Serialise a value stored in a JSONB column.
pub(crate) fn to_json<T, E, Q>(value: &T, what: &str, query: Q) -> Result<serde_json::Value, E>
where
    T: serde::Serialize + ?Sized,
    Q: FnOnce(String) -> E,
{
    serde_json::to_value(value).map_err(|err| query(format!("serialise {what}: {err}")))
}

/// Decode a JSONB column into a domain value.
pub(crate) fn from_json<T, E, Q>(value: serde_json::Value, what: &str, query: Q) -> Result<T, E>
where
    T: serde::de::DeserializeOwned,
    Q: FnOnce(String) -> E,
{
    serde_json::from_value(value).map_err(|err| query(format!("decode {what}: {err}")))
}
