use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use hortitech_core::{DomainError, ErrorKind};

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Business refusal with a stable machine-readable code.
    #[error("Refused ({code}): {message}")]
    Refused { code: &'static str, message: String },

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::NotFound => ApiError::NotFound(message),
            ErrorKind::LimitExceeded => ApiError::Refused { code: "LIMIT_EXCEEDED", message },
            ErrorKind::InvalidState => ApiError::Refused { code: "INVALID_STATE", message },
            ErrorKind::ActiveZonesPresent => ApiError::Refused { code: "ACTIVE_ZONES_PRESENT", message },
            ErrorKind::Validation => ApiError::Refused { code: "VALIDATION_ERROR", message },
            ErrorKind::Internal => ApiError::InternalError(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            },
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            },
            ApiError::Refused { code, message } => {
                tracing::warn!("Refused ({}): {}", code, message);
                (StatusCode::BAD_REQUEST, code, message)
            },
            ApiError::InternalError(msg) => {
                // Storage details stay in the logs
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal server error".to_string())
            },
        };

        (status, Json(ApiResponse::<()>::error(code, &message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hortitech_core::GreenhouseStatus;

    fn status_of(err: DomainError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        assert_eq!(status_of(DomainError::GreenhouseNotFound(999)), StatusCode::NOT_FOUND);
        assert_eq!(status_of(DomainError::ZoneNotFound(3)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(DomainError::GreenhouseLimitExceeded { limit: 10 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::GreenhouseNotInactive(GreenhouseStatus::Active)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(DomainError::HasDependents(7)), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(DomainError::DatabaseError("relation missing".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_refusal_codes() {
        let err = ApiError::from(DomainError::ActiveZonesPresent { greenhouse_id: 5, count: 2 });
        assert!(matches!(err, ApiError::Refused { code: "ACTIVE_ZONES_PRESENT", .. }));
    }
}
