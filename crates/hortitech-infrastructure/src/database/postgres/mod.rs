//! PostgreSQL repository implementations

pub mod greenhouse_repo_impl;
pub mod zone_repo_impl;

pub use greenhouse_repo_impl::PgGreenhouseRepository;
pub use zone_repo_impl::PgZoneRepository;

use hortitech_core::error::DomainError;
use tracing::error;

pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

pub(crate) fn database_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

/// Status columns are CHECK-constrained, so anything else is corrupt data.
pub(crate) fn unknown_status(table: &str, id: i32, raw: &str) -> DomainError {
    error!("{} {} has unknown stored status: {}", table, id, raw);
    DomainError::InternalError(format!("unknown stored status: {raw}"))
}
