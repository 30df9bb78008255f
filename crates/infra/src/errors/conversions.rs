//! Conversions from external infrastructure errors into domain errors.

use calbridge_domain::CalBridgeError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CalBridgeError);

impl From<InfraError> for CalBridgeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CalBridgeError> for InfraError {
    fn from(value: CalBridgeError) -> Self {
        InfraError(value)
    }
}

trait IntoCalBridgeError {
    fn into_calbridge(self) -> CalBridgeError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → CalBridgeError */
/* -------------------------------------------------------------------------- */

impl IntoCalBridgeError for SqlError {
    fn into_calbridge(self) -> CalBridgeError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => CalBridgeError::Store("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        CalBridgeError::Store("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        CalBridgeError::Store(format!("unique constraint violation: {message}"))
                    }
                    (ErrorCode::ReadOnly, _) => {
                        CalBridgeError::Store("database is read-only".into())
                    }
                    _ => CalBridgeError::Store(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                CalBridgeError::Store(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                CalBridgeError::Store(format!("invalid column type for {name}: {ty}"))
            }
            RE::InvalidPath(path) => CalBridgeError::Store(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => CalBridgeError::Store(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_calbridge())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → CalBridgeError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(CalBridgeError::Store(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CalBridgeError */
/* -------------------------------------------------------------------------- */

impl IntoCalBridgeError for HttpError {
    fn into_calbridge(self) -> CalBridgeError {
        if self.is_timeout() {
            return CalBridgeError::RemoteService("HTTP request timed out".into());
        }

        if self.is_connect() {
            return CalBridgeError::RemoteService("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return CalBridgeError::RemoteService(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            ));
        }

        if self.is_decode() {
            return CalBridgeError::RemoteService(format!("failed to decode response: {self}"));
        }

        CalBridgeError::RemoteService(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_calbridge())
    }
}

/// Map a `spawn_blocking` join failure.
pub(crate) fn map_join_error(err: tokio::task::JoinError) -> CalBridgeError {
    CalBridgeError::Internal(format!("blocking task failed: {err}"))
}
