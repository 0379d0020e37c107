//! Domain errors

use thiserror::Error;

use crate::domain::{GreenhouseId, GreenhouseStatus, OperatorId, ZoneId};

/// Coarse classification callers map to transport status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LimitExceeded,
    InvalidState,
    ActiveZonesPresent,
    NotFound,
    Validation,
    Internal,
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Greenhouse limit reached: no more than {limit} greenhouses can exist")]
    GreenhouseLimitExceeded { limit: i64 },

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Only an inactive greenhouse can be deleted (current status: {0})")]
    GreenhouseNotInactive(GreenhouseStatus),

    #[error("Greenhouse {greenhouse_id} has {count} active zone(s)")]
    ActiveZonesPresent { greenhouse_id: GreenhouseId, count: i64 },

    #[error("Greenhouse {0} still has related records")]
    HasDependents(GreenhouseId),

    #[error("Greenhouse not found: {0}")]
    GreenhouseNotFound(GreenhouseId),

    #[error("Zone not found: {0}")]
    ZoneNotFound(ZoneId),

    #[error("Operator not found: {0}")]
    OperatorNotFound(OperatorId),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::GreenhouseLimitExceeded { .. } => ErrorKind::LimitExceeded,
            DomainError::InvalidStatus(_) | DomainError::GreenhouseNotInactive(_) => {
                ErrorKind::InvalidState
            }
            DomainError::ActiveZonesPresent { .. } | DomainError::HasDependents(_) => {
                ErrorKind::ActiveZonesPresent
            }
            DomainError::GreenhouseNotFound(_) | DomainError::ZoneNotFound(_) => ErrorKind::NotFound,
            // The operator is a body field, so an unknown one is a bad request
            DomainError::OperatorNotFound(_) | DomainError::ValidationError(_) => {
                ErrorKind::Validation
            }
            DomainError::DatabaseError(_) | DomainError::InternalError(_) => ErrorKind::Internal,
        }
    }

    /// Expected, user-facing rejection as opposed to a failure.
    pub fn is_refusal(&self) -> bool {
        self.kind() != ErrorKind::Internal
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}
