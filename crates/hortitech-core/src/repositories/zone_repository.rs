//! Zone repository trait (port)

use async_trait::async_trait;

use crate::domain::{GreenhouseId, NewZone, Zone, ZoneId, ZoneStatus};
use crate::error::DomainError;

/// Writes lock the parent greenhouse row so they serialise with greenhouse
/// status transitions and deletion.
#[async_trait]
pub trait ZoneRepository: Send + Sync {
    async fn find_by_id(&self, id: ZoneId) -> Result<Option<Zone>, DomainError>;
    async fn list_by_greenhouse(&self, greenhouse_id: GreenhouseId) -> Result<Vec<Zone>, DomainError>;

    /// Fails with `GreenhouseNotFound` when the parent does not exist.
    async fn create(&self, greenhouse_id: GreenhouseId, zone: &NewZone) -> Result<Zone, DomainError>;

    /// Returns `None` when no zone has this id.
    async fn update_status(&self, id: ZoneId, status: ZoneStatus) -> Result<Option<Zone>, DomainError>;

    /// Returns the removed zone, or `None` when no zone has this id.
    async fn delete(&self, id: ZoneId) -> Result<Option<Zone>, DomainError>;
}
