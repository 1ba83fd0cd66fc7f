//! Conversions from external infrastructure errors into domain errors.

use esignbridge_domain::EsignBridgeError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub EsignBridgeError);

impl From<InfraError> for EsignBridgeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<EsignBridgeError> for InfraError {
    fn from(value: EsignBridgeError) -> Self {
        InfraError(value)
    }
}

trait IntoEsignBridgeError {
    fn into_domain(self) -> EsignBridgeError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → EsignBridgeError */
/* -------------------------------------------------------------------------- */

impl IntoEsignBridgeError for SqlError {
    fn into_domain(self) -> EsignBridgeError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        EsignBridgeError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        EsignBridgeError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        EsignBridgeError::Database("unique constraint violation".into())
                    }
                    _ => EsignBridgeError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => {
                EsignBridgeError::NotFound("no rows returned by query".into())
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                EsignBridgeError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                EsignBridgeError::Database(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => EsignBridgeError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => EsignBridgeError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_domain())
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(EsignBridgeError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → EsignBridgeError */
/* -------------------------------------------------------------------------- */

impl IntoEsignBridgeError for HttpError {
    fn into_domain(self) -> EsignBridgeError {
        if self.is_timeout() {
            return EsignBridgeError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return EsignBridgeError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            return match code {
                401 | 403 => EsignBridgeError::Auth(format!(
                    "HTTP {} {}",
                    code,
                    status.canonical_reason().unwrap_or("unknown status")
                )),
                _ => EsignBridgeError::upstream(code, self.to_string()),
            };
        }

        if self.is_decode() {
            return EsignBridgeError::Internal(format!("failed to decode response: {self}"));
        }

        EsignBridgeError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_domain())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → EsignBridgeError */
/* -------------------------------------------------------------------------- */

impl IntoEsignBridgeError for std::io::Error {
    fn into_domain(self) -> EsignBridgeError {
        match self.kind() {
            std::io::ErrorKind::NotFound => EsignBridgeError::NotFound(self.to_string()),
            _ => EsignBridgeError::Io(self.to_string()),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_domain())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → EsignBridgeError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(EsignBridgeError::Internal(format!("JSON error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
