//! Conversions from external infrastructure errors into domain errors.

use rusqlite::Error as SqlError;
use slotline_domain::SlotlineError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SlotlineError);

impl From<InfraError> for SlotlineError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SlotlineError> for InfraError {
    fn from(value: SlotlineError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoSlotlineError {
    fn into_slotline(self) -> SlotlineError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → SlotlineError */
/* -------------------------------------------------------------------------- */

impl IntoSlotlineError for SqlError {
    fn into_slotline(self) -> SlotlineError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        SlotlineError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        SlotlineError::Database("database is locked".into())
                    }
                    // SQLITE_CONSTRAINT_UNIQUE / _PRIMARYKEY: two writers
                    // collided on the same key.
                    (ErrorCode::ConstraintViolation, 2067 | 1555) => {
                        SlotlineError::Conflict("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        SlotlineError::Database("foreign key constraint violation".into())
                    }
                    _ => SlotlineError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => SlotlineError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                SlotlineError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                SlotlineError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                SlotlineError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidParameterName(parameter_name) => {
                SlotlineError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => SlotlineError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => SlotlineError::Database("invalid SQL query".into()),
            other => SlotlineError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_slotline())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → SlotlineError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(SlotlineError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Shared mapping helpers for the repositories */
/* -------------------------------------------------------------------------- */

pub(crate) fn map_sqlite_error(err: SqlError) -> SlotlineError {
    SlotlineError::from(InfraError::from(err))
}

pub(crate) fn map_pool_error(err: r2d2::Error) -> SlotlineError {
    SlotlineError::from(InfraError::from(err))
}

pub(crate) fn map_join_error(err: JoinError) -> SlotlineError {
    SlotlineError::Internal(format!("task join error: {err}"))
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
