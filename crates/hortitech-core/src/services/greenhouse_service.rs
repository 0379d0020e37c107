// ============================================================================
// HortiTech Core - Greenhouse Service
// File: crates/hortitech-core/src/services/greenhouse_service.rs
// ============================================================================
//! Greenhouse reads and guarded mutations

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    DomainEvent, Greenhouse, GreenhouseChanges, GreenhouseFilter, GreenhouseId, GreenhouseStatus,
    GreenhouseSummary, NewGreenhouse, OperatorId,
};
use crate::error::DomainError;
use crate::notifier::Notifier;
use crate::repositories::GreenhouseRepository;
use crate::services::LifecycleGuard;

pub struct GreenhouseService {
    repo: Arc<dyn GreenhouseRepository>,
    notifier: Arc<dyn Notifier>,
    guard: LifecycleGuard,
}

impl GreenhouseService {
    pub fn new(repo: Arc<dyn GreenhouseRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_guard(repo, notifier, LifecycleGuard::default())
    }

    pub fn with_guard(
        repo: Arc<dyn GreenhouseRepository>,
        notifier: Arc<dyn Notifier>,
        guard: LifecycleGuard,
    ) -> Self {
        Self { repo, notifier, guard }
    }

    pub async fn list_all(&self) -> Result<Vec<Greenhouse>, DomainError> {
        self.repo.list(GreenhouseFilter::All).await
    }

    pub async fn list_active(&self) -> Result<Vec<Greenhouse>, DomainError> {
        self.repo.list(GreenhouseFilter::Active).await
    }

    pub async fn list_active_summaries(&self) -> Result<Vec<GreenhouseSummary>, DomainError> {
        self.repo.list_active_summaries().await
    }

    pub async fn list_by_operator(&self, operator_id: OperatorId) -> Result<Vec<Greenhouse>, DomainError> {
        self.repo.list(GreenhouseFilter::ByOperator(operator_id)).await
    }

    pub async fn get(&self, id: GreenhouseId) -> Result<Greenhouse, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::GreenhouseNotFound(id))
    }

    pub async fn create(&self, greenhouse: NewGreenhouse) -> Result<Greenhouse, DomainError> {
        info!("Creating greenhouse: {}", greenhouse.name);

        // The unit of work must be gone before reading back through the repository
        let id = {
            let mut uow = self.repo.begin().await?;
            self.guard.can_create(&mut *uow).await?;
            let id = uow.insert(&greenhouse).await?;
            uow.commit().await?;
            id
        };

        let created = self.reload(id).await?;
        info!("Greenhouse created successfully: {}", id);

        self.publish(DomainEvent::GreenhouseCreated {
            greenhouse_id: id,
            name: created.name.clone(),
        });
        Ok(created)
    }

    pub async fn update(&self, id: GreenhouseId, changes: GreenhouseChanges) -> Result<Greenhouse, DomainError> {
        if changes.is_empty() {
            return Err(DomainError::ValidationError("No fields to update".to_string()));
        }

        if !self.repo.update_details(id, &changes).await? {
            warn!("Update failed: greenhouse {} not found", id);
            return Err(DomainError::GreenhouseNotFound(id));
        }

        let updated = self.reload(id).await?;
        info!("Greenhouse {} updated", id);

        self.publish(DomainEvent::GreenhouseUpdated { greenhouse_id: id });
        Ok(updated)
    }

    /// Guarded transition to any status, given as text from the caller.
    pub async fn change_status(&self, id: GreenhouseId, target: &str) -> Result<Greenhouse, DomainError> {
        let status = {
            let mut uow = self.repo.begin().await?;
            let status = self.guard.can_transition(&mut *uow, id, target).await?;
            uow.set_status(id, status).await?;
            uow.commit().await?;
            status
        };

        info!("Greenhouse {} is now {}", id, status);
        self.publish(DomainEvent::GreenhouseStatusChanged { greenhouse_id: id, status });

        self.reload(id).await
    }

    pub async fn activate(&self, id: GreenhouseId) -> Result<Greenhouse, DomainError> {
        self.change_status(id, GreenhouseStatus::Active.as_str()).await
    }

    pub async fn deactivate(&self, id: GreenhouseId) -> Result<Greenhouse, DomainError> {
        self.change_status(id, GreenhouseStatus::Inactive.as_str()).await
    }

    pub async fn start_maintenance(&self, id: GreenhouseId) -> Result<Greenhouse, DomainError> {
        self.change_status(id, GreenhouseStatus::Maintenance.as_str()).await
    }

    pub async fn delete(&self, id: GreenhouseId) -> Result<(), DomainError> {
        {
            let mut uow = self.repo.begin().await?;
            self.guard.can_delete(&mut *uow, id).await?;
            uow.delete(id).await?;
            uow.commit().await?;
        }

        info!("Greenhouse {} deleted", id);
        self.publish(DomainEvent::GreenhouseDeleted { greenhouse_id: id });
        Ok(())
    }

    async fn reload(&self, id: GreenhouseId) -> Result<Greenhouse, DomainError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| {
            DomainError::InternalError(format!("greenhouse {id} vanished after write"))
        })
    }

    fn publish(&self, event: DomainEvent) {
        self.notifier.broadcast(event.audience(), event);
    }
}
