use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::{DbErr, SqlErr};
use serde_json::json;

/// Error taxonomy for all service operations.
///
/// Every multi-step operation runs inside a single transaction; any of
/// these raised mid-transaction aborts the whole operation with no partial
/// state persisted.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Uniqueness constraint conflict, naming the offending field(s).
    #[error("The following fields must be unique: {}", fields.join(", "))]
    UniqueViolation { fields: Vec<String> },

    /// An item is not in the source state the transition requires
    /// (e.g. selling a non-IN_STOCK item, deleting a SOLD item).
    #[error("{0}")]
    State(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("This account has been disabled")]
    AccountDisabled,

    #[error("Authentication required: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl ServiceError {
    /// Reclassifies a database error raised by an insert/update against a
    /// table with uniqueness constraints. The store only reports that *a*
    /// unique index was violated, so callers pass the unique fields of the
    /// statement to name the offenders; everything else stays a database
    /// error.
    pub fn classify_unique(err: DbErr, fields: &[&str]) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::UniqueViolation {
                fields: fields.iter().map(|f| f.to_string()).collect(),
            },
            _ => ServiceError::Database(err),
        }
    }

    /// Single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::UniqueViolation { .. }
            | Self::State(_)
            | Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AccountDisabled | Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message suitable for HTTP responses. Infrastructure failures return
    /// a generic message to avoid leaking implementation details; the full
    /// error is logged server-side.
    pub fn response_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.response_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_names_fields() {
        let err = ServiceError::UniqueViolation {
            fields: vec!["serial_number".into(), "mac_address".into()],
        };
        assert_eq!(
            err.to_string(),
            "The following fields must be unique: serial_number, mac_address"
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = ServiceError::Internal("pool exhausted at 10.0.0.3".into());
        assert_eq!(err.response_message(), "Internal server error");
    }

    #[test]
    fn state_errors_are_bad_requests() {
        let err = ServiceError::State("Item 4 is SOLD and cannot be deleted".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.response_message(), "Item 4 is SOLD and cannot be deleted");
    }
}
