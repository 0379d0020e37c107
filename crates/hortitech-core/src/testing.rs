//! In-memory implementation of the repository ports.
//!
//! Mirrors the relational behaviour the services rely on: units of work are
//! serialised by one lock and staged on a copy, so dropping without commit
//! rolls back; foreign keys are enforced the way the PostgreSQL schema does.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    Greenhouse, GreenhouseChanges, GreenhouseFilter, GreenhouseId, GreenhouseStatus,
    GreenhouseSummary, NewGreenhouse, NewZone, OperatorId, OperatorSummary, Zone, ZoneId,
    ZoneStatus,
};
use crate::error::DomainError;
use crate::repositories::{GreenhouseRepository, GreenhouseUnitOfWork, LifecycleView, ZoneRepository};

#[derive(Debug, Clone)]
struct GreenhouseRecord {
    id: GreenhouseId,
    name: String,
    description: Option<String>,
    status: GreenhouseStatus,
    operator_id: OperatorId,
    created_at: chrono::DateTime<Utc>,
    modified_at: Option<chrono::DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    operators: BTreeMap<OperatorId, OperatorSummary>,
    greenhouses: BTreeMap<GreenhouseId, GreenhouseRecord>,
    zones: BTreeMap<ZoneId, Zone>,
    next_greenhouse_id: GreenhouseId,
    next_zone_id: ZoneId,
}

impl MemoryState {
    fn active_zone_count(&self, greenhouse_id: GreenhouseId) -> i64 {
        self.zones
            .values()
            .filter(|z| z.greenhouse_id == greenhouse_id && z.status == ZoneStatus::Active)
            .count() as i64
    }

    fn materialize(&self, record: &GreenhouseRecord) -> Greenhouse {
        let total_zones = self
            .zones
            .values()
            .filter(|z| z.greenhouse_id == record.id)
            .count() as i64;

        Greenhouse {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            status: record.status,
            operator_id: record.operator_id,
            total_zones,
            active_zones: self.active_zone_count(record.id),
            operator: self.operators.get(&record.operator_id).cloned(),
            created_at: record.created_at,
            modified_at: record.modified_at,
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_operator(&self, id: OperatorId, username: &str, role: &str) {
        let mut state = self.state.lock().await;
        state.operators.insert(
            id,
            OperatorSummary {
                id,
                username: username.to_string(),
                role: role.to_string(),
                status: "active".to_string(),
            },
        );
    }

    /// Inserts a greenhouse bypassing the lifecycle guard.
    pub async fn add_greenhouse(&self, name: &str, status: GreenhouseStatus, operator_id: OperatorId) -> GreenhouseId {
        let mut state = self.state.lock().await;
        state.next_greenhouse_id += 1;
        let id = state.next_greenhouse_id;
        state.greenhouses.insert(
            id,
            GreenhouseRecord {
                id,
                name: name.to_string(),
                description: None,
                status,
                operator_id,
                created_at: Utc::now(),
                modified_at: None,
            },
        );
        id
    }

    pub async fn add_zone(&self, greenhouse_id: GreenhouseId, status: ZoneStatus) -> ZoneId {
        let mut state = self.state.lock().await;
        state.next_zone_id += 1;
        let id = state.next_zone_id;
        state.zones.insert(
            id,
            Zone {
                id,
                greenhouse_id,
                name: format!("Zone {id}"),
                description: None,
                status,
                created_at: Utc::now(),
                modified_at: None,
            },
        );
        id
    }

    pub async fn greenhouse_count(&self) -> usize {
        self.state.lock().await.greenhouses.len()
    }

    pub async fn status_of(&self, id: GreenhouseId) -> Option<GreenhouseStatus> {
        self.state.lock().await.greenhouses.get(&id).map(|g| g.status)
    }
}

/// Holds the store lock for its whole lifetime and stages writes on a copy.
pub struct InMemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
    committed: bool,
}

#[async_trait]
impl LifecycleView for InMemoryUnitOfWork {
    async fn count_greenhouses(&mut self) -> Result<i64, DomainError> {
        Ok(self.staged.greenhouses.len() as i64)
    }

    async fn lock_status(&mut self, id: GreenhouseId) -> Result<Option<GreenhouseStatus>, DomainError> {
        Ok(self.staged.greenhouses.get(&id).map(|g| g.status))
    }

    async fn count_active_zones(&mut self, id: GreenhouseId) -> Result<i64, DomainError> {
        Ok(self.staged.active_zone_count(id))
    }
}

#[async_trait]
impl GreenhouseUnitOfWork for InMemoryUnitOfWork {
    async fn insert(&mut self, greenhouse: &NewGreenhouse) -> Result<GreenhouseId, DomainError> {
        if !self.staged.operators.contains_key(&greenhouse.operator_id) {
            return Err(DomainError::OperatorNotFound(greenhouse.operator_id));
        }
        self.staged.next_greenhouse_id += 1;
        let id = self.staged.next_greenhouse_id;
        self.staged.greenhouses.insert(
            id,
            GreenhouseRecord {
                id,
                name: greenhouse.name.clone(),
                description: greenhouse.description.clone(),
                status: GreenhouseStatus::Active,
                operator_id: greenhouse.operator_id,
                created_at: Utc::now(),
                modified_at: None,
            },
        );
        Ok(id)
    }

    async fn set_status(&mut self, id: GreenhouseId, status: GreenhouseStatus) -> Result<(), DomainError> {
        let record = self
            .staged
            .greenhouses
            .get_mut(&id)
            .ok_or(DomainError::GreenhouseNotFound(id))?;
        record.status = status;
        record.modified_at = Some(Utc::now());
        Ok(())
    }

    async fn delete(&mut self, id: GreenhouseId) -> Result<(), DomainError> {
        if self.staged.zones.values().any(|z| z.greenhouse_id == id) {
            return Err(DomainError::HasDependents(id));
        }
        self.staged
            .greenhouses
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::GreenhouseNotFound(id))
    }

    async fn commit(&mut self) -> Result<(), DomainError> {
        if self.committed {
            return Err(DomainError::InternalError("unit of work already committed".into()));
        }
        *self.guard = self.staged.clone();
        self.committed = true;
        Ok(())
    }
}

#[async_trait]
impl GreenhouseRepository for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn GreenhouseUnitOfWork>, DomainError> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryUnitOfWork { guard, staged, committed: false }))
    }

    async fn find_by_id(&self, id: GreenhouseId) -> Result<Option<Greenhouse>, DomainError> {
        let state = self.state.lock().await;
        Ok(state.greenhouses.get(&id).map(|record| state.materialize(record)))
    }

    async fn list(&self, filter: GreenhouseFilter) -> Result<Vec<Greenhouse>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .greenhouses
            .values()
            .filter(|record| match filter {
                GreenhouseFilter::All => true,
                GreenhouseFilter::Active => record.status == GreenhouseStatus::Active,
                GreenhouseFilter::ByOperator(operator_id) => record.operator_id == operator_id,
            })
            .map(|record| state.materialize(record))
            .collect())
    }

    async fn list_active_summaries(&self) -> Result<Vec<GreenhouseSummary>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .greenhouses
            .values()
            .filter(|record| record.status == GreenhouseStatus::Active)
            .map(|record| GreenhouseSummary { id: record.id, name: record.name.clone() })
            .collect())
    }

    async fn update_details(&self, id: GreenhouseId, changes: &GreenhouseChanges) -> Result<bool, DomainError> {
        let mut state = self.state.lock().await;
        if !state.greenhouses.contains_key(&id) {
            return Ok(false);
        }
        if let Some(operator_id) = changes.operator_id {
            if !state.operators.contains_key(&operator_id) {
                return Err(DomainError::OperatorNotFound(operator_id));
            }
        }
        let Some(record) = state.greenhouses.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(name) = &changes.name {
            record.name = name.clone();
        }
        if let Some(description) = &changes.description {
            record.description = Some(description.clone());
        }
        if let Some(operator_id) = changes.operator_id {
            record.operator_id = operator_id;
        }
        record.modified_at = Some(Utc::now());
        Ok(true)
    }
}

#[async_trait]
impl ZoneRepository for InMemoryStore {
    async fn find_by_id(&self, id: ZoneId) -> Result<Option<Zone>, DomainError> {
        Ok(self.state.lock().await.zones.get(&id).cloned())
    }

    async fn list_by_greenhouse(&self, greenhouse_id: GreenhouseId) -> Result<Vec<Zone>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .zones
            .values()
            .filter(|z| z.greenhouse_id == greenhouse_id)
            .cloned()
            .collect())
    }

    async fn create(&self, greenhouse_id: GreenhouseId, zone: &NewZone) -> Result<Zone, DomainError> {
        let mut state = self.state.lock().await;
        if !state.greenhouses.contains_key(&greenhouse_id) {
            return Err(DomainError::GreenhouseNotFound(greenhouse_id));
        }
        state.next_zone_id += 1;
        let created = Zone {
            id: state.next_zone_id,
            greenhouse_id,
            name: zone.name.clone(),
            description: zone.description.clone(),
            status: zone.status,
            created_at: Utc::now(),
            modified_at: None,
        };
        state.zones.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_status(&self, id: ZoneId, status: ZoneStatus) -> Result<Option<Zone>, DomainError> {
        let mut state = self.state.lock().await;
        Ok(state.zones.get_mut(&id).map(|zone| {
            zone.status = status;
            zone.modified_at = Some(Utc::now());
            zone.clone()
        }))
    }

    async fn delete(&self, id: ZoneId) -> Result<Option<Zone>, DomainError> {
        Ok(self.state.lock().await.zones.remove(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dropped_unit_of_work_rolls_back() {
        let store = InMemoryStore::new();
        let id = store.add_greenhouse("North", GreenhouseStatus::Active, 1).await;

        {
            let mut uow = GreenhouseRepository::begin(&store).await.unwrap();
            uow.set_status(id, GreenhouseStatus::Inactive).await.unwrap();
        }

        assert_eq!(store.status_of(id).await, Some(GreenhouseStatus::Active));
    }

    #[tokio::test]
    async fn test_committed_unit_of_work_is_visible() {
        let store = InMemoryStore::new();
        let id = store.add_greenhouse("North", GreenhouseStatus::Active, 1).await;

        let mut uow = GreenhouseRepository::begin(&store).await.unwrap();
        uow.set_status(id, GreenhouseStatus::Maintenance).await.unwrap();
        uow.commit().await.unwrap();
        drop(uow);

        assert_eq!(store.status_of(id).await, Some(GreenhouseStatus::Maintenance));
    }

    #[tokio::test]
    async fn test_counts_are_aggregated_on_read() {
        let store = InMemoryStore::new();
        store.add_operator(1, "ana", "operario").await;
        let id = store.add_greenhouse("North", GreenhouseStatus::Active, 1).await;
        store.add_zone(id, ZoneStatus::Active).await;
        store.add_zone(id, ZoneStatus::Inactive).await;

        let greenhouse = GreenhouseRepository::find_by_id(&store, id).await.unwrap().unwrap();
        assert_eq!(greenhouse.total_zones, 2);
        assert_eq!(greenhouse.active_zones, 1);
        assert_eq!(greenhouse.operator.unwrap().username, "ana");
    }
}
