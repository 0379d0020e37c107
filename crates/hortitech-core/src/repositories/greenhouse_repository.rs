//! Greenhouse repository trait (port)

use async_trait::async_trait;

use crate::domain::{
    Greenhouse, GreenhouseChanges, GreenhouseFilter, GreenhouseId, GreenhouseStatus,
    GreenhouseSummary, NewGreenhouse,
};
use crate::error::DomainError;

/// Reads the lifecycle guard needs, evaluated inside an open unit of work.
#[async_trait]
pub trait LifecycleView: Send {
    /// Total number of greenhouse records. Serialises concurrent creators.
    async fn count_greenhouses(&mut self) -> Result<i64, DomainError>;

    /// Current status, locking the row until the unit of work ends.
    async fn lock_status(&mut self, id: GreenhouseId) -> Result<Option<GreenhouseStatus>, DomainError>;

    async fn count_active_zones(&mut self, id: GreenhouseId) -> Result<i64, DomainError>;
}

/// Transactional writes. Dropping without `commit` rolls back.
#[async_trait]
pub trait GreenhouseUnitOfWork: LifecycleView {
    async fn insert(&mut self, greenhouse: &NewGreenhouse) -> Result<GreenhouseId, DomainError>;

    /// Writes the status column only.
    async fn set_status(&mut self, id: GreenhouseId, status: GreenhouseStatus) -> Result<(), DomainError>;

    async fn delete(&mut self, id: GreenhouseId) -> Result<(), DomainError>;

    async fn commit(&mut self) -> Result<(), DomainError>;
}

#[async_trait]
pub trait GreenhouseRepository: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn GreenhouseUnitOfWork>, DomainError>;
    async fn find_by_id(&self, id: GreenhouseId) -> Result<Option<Greenhouse>, DomainError>;
    async fn list(&self, filter: GreenhouseFilter) -> Result<Vec<Greenhouse>, DomainError>;
    async fn list_active_summaries(&self) -> Result<Vec<GreenhouseSummary>, DomainError>;

    /// Returns `false` when no greenhouse has this id.
    async fn update_details(&self, id: GreenhouseId, changes: &GreenhouseChanges) -> Result<bool, DomainError>;
}
