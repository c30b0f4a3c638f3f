//! Conversions from external infrastructure errors into domain errors.

use plandesk_domain::PlanDeskError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PlanDeskError);

impl From<InfraError> for PlanDeskError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PlanDeskError> for InfraError {
    fn from(value: PlanDeskError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoPlanDeskError {
    fn into_plandesk(self) -> PlanDeskError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → PlanDeskError */
/* -------------------------------------------------------------------------- */

impl IntoPlanDeskError for SqlError {
    fn into_plandesk(self) -> PlanDeskError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        PlanDeskError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        PlanDeskError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        PlanDeskError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 1555) => {
                        PlanDeskError::Database("primary key constraint violation".into())
                    }
                    _ => PlanDeskError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => PlanDeskError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                PlanDeskError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                PlanDeskError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                PlanDeskError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidPath(path) => PlanDeskError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => PlanDeskError::Database("invalid SQL query".into()),
            other => PlanDeskError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_plandesk())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → PlanDeskError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(PlanDeskError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → PlanDeskError */
/* -------------------------------------------------------------------------- */

impl IntoPlanDeskError for HttpError {
    fn into_plandesk(self) -> PlanDeskError {
        if self.is_timeout() {
            return PlanDeskError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return PlanDeskError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => PlanDeskError::Auth(message),
                404 => PlanDeskError::NotFound(message),
                400..=499 => PlanDeskError::InvalidInput(message),
                _ => PlanDeskError::Network(message),
            };
        }

        PlanDeskError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_plandesk())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use rusqlite::ffi::{Error as FfiError, ErrorCode};
    use rusqlite::Error as SqlError;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn sqlite_busy_maps_to_database_error() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::DatabaseBusy, extended_code: 5 },
            Some("database is locked".into()),
        );

        let mapped: PlanDeskError = InfraError::from(err).into();
        match mapped {
            PlanDeskError::Database(msg) => {
                assert!(msg.contains("busy") || msg.contains("locked"));
            }
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[test]
    fn unique_violation_maps_to_database_error() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::ConstraintViolation, extended_code: 2067 },
            Some("UNIQUE constraint failed".into()),
        );

        let mapped: PlanDeskError = InfraError::from(err).into();
        match mapped {
            PlanDeskError::Database(msg) => assert!(msg.contains("unique")),
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error =
            client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: PlanDeskError = InfraError::from(error).into();
        match mapped {
            PlanDeskError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {:?}", other),
        }
    }
}
