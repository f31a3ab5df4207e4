//! Shared error mapping for the Diesel adapters.
//!
//! Every driven port exposes `Connection` and `Query` variants, so pool and
//! Diesel failures are mapped through the port's own constructors rather
//! than one function per error type.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure into the port's connection variant.
pub fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map a Diesel failure into the port's query or connection variant.
///
/// Database error details are logged at `debug` and never surfaced.
pub fn map_diesel_error<E>(
    error: diesel::result::Error,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("foreign key violation")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            query("unique constraint violation")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// Implement `From<PoolError>` and `From<diesel::result::Error>` for a port
/// error with `connection` and `query` constructors, so adapters can use `?`.
macro_rules! impl_persistence_error_conversions {
    ($error:ty) => {
        impl From<$crate::outbound::persistence::PoolError> for $error {
            fn from(error: $crate::outbound::persistence::PoolError) -> Self {
                $crate::outbound::persistence::diesel_helpers::map_pool_error(
                    error,
                    <$error>::connection,
                )
            }
        }

        impl From<diesel::result::Error> for $error {
            fn from(error: diesel::result::Error) -> Self {
                $crate::outbound::persistence::diesel_helpers::map_diesel_error(
                    error,
                    <$error>::query,
                    <$error>::connection,
                )
            }
        }
    };
}

pub(crate) use impl_persistence_error_conversions;
