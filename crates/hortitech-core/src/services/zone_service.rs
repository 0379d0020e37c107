//! Zone management. Zones have no lifecycle rules of their own; the repository
//! serialises their writes with the parent greenhouse.

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainEvent, GreenhouseId, NewZone, Zone, ZoneId, ZoneStatus};
use crate::error::DomainError;
use crate::notifier::Notifier;
use crate::repositories::{GreenhouseRepository, ZoneRepository};

pub struct ZoneService {
    zones: Arc<dyn ZoneRepository>,
    greenhouses: Arc<dyn GreenhouseRepository>,
    notifier: Arc<dyn Notifier>,
}

impl ZoneService {
    pub fn new(
        zones: Arc<dyn ZoneRepository>,
        greenhouses: Arc<dyn GreenhouseRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { zones, greenhouses, notifier }
    }

    pub async fn list_by_greenhouse(&self, greenhouse_id: GreenhouseId) -> Result<Vec<Zone>, DomainError> {
        if self.greenhouses.find_by_id(greenhouse_id).await?.is_none() {
            return Err(DomainError::GreenhouseNotFound(greenhouse_id));
        }
        self.zones.list_by_greenhouse(greenhouse_id).await
    }

    pub async fn get(&self, id: ZoneId) -> Result<Zone, DomainError> {
        self.zones.find_by_id(id).await?.ok_or(DomainError::ZoneNotFound(id))
    }

    pub async fn create(&self, greenhouse_id: GreenhouseId, zone: NewZone) -> Result<Zone, DomainError> {
        let created = self.zones.create(greenhouse_id, &zone).await?;
        info!("Zone {} created in greenhouse {}", created.id, greenhouse_id);

        self.publish(DomainEvent::ZoneCreated {
            zone_id: created.id,
            greenhouse_id,
        });
        Ok(created)
    }

    pub async fn change_status(&self, id: ZoneId, target: &str) -> Result<Zone, DomainError> {
        let status = ZoneStatus::from_str(target)
            .ok_or_else(|| DomainError::InvalidStatus(target.to_string()))?;

        let zone = self
            .zones
            .update_status(id, status)
            .await?
            .ok_or(DomainError::ZoneNotFound(id))?;
        info!("Zone {} is now {}", id, status);

        self.publish(DomainEvent::ZoneStatusChanged {
            zone_id: id,
            greenhouse_id: zone.greenhouse_id,
            status,
        });
        Ok(zone)
    }

    pub async fn delete(&self, id: ZoneId) -> Result<(), DomainError> {
        let removed = self.zones.delete(id).await?.ok_or(DomainError::ZoneNotFound(id))?;
        info!("Zone {} deleted from greenhouse {}", id, removed.greenhouse_id);

        self.publish(DomainEvent::ZoneDeleted {
            zone_id: id,
            greenhouse_id: removed.greenhouse_id,
        });
        Ok(())
    }

    fn publish(&self, event: DomainEvent) {
        self.notifier.broadcast(event.audience(), event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Audience, GreenhouseStatus};
    use crate::error::ErrorKind;
    use crate::notifier::{MockNotifier, NoopNotifier};
    use crate::services::GreenhouseService;
    use crate::testing::InMemoryStore;

    fn service(store: &InMemoryStore) -> ZoneService {
        ZoneService::new(Arc::new(store.clone()), Arc::new(store.clone()), Arc::new(NoopNotifier))
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let store = InMemoryStore::new();
        let id = store.add_greenhouse("North", GreenhouseStatus::Active, 1).await;
        let service = service(&store);

        let zone = service
            .create(id, NewZone::new("Bed A".to_string(), None, None).unwrap())
            .await
            .unwrap();
        assert_eq!(zone.greenhouse_id, id);

        let zones = service.list_by_greenhouse(id).await.unwrap();
        assert_eq!(zones, vec![zone]);
    }

    #[tokio::test]
    async fn test_missing_greenhouse_is_not_found() {
        let store = InMemoryStore::new();
        let service = service(&store);

        assert_eq!(service.list_by_greenhouse(999).await.unwrap_err().kind(), ErrorKind::NotFound);
        let zone = NewZone::new("Bed A".to_string(), None, None).unwrap();
        assert_eq!(service.create(999, zone).await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_change_status_and_unknown_zone() {
        let store = InMemoryStore::new();
        let greenhouse_id = store.add_greenhouse("North", GreenhouseStatus::Active, 1).await;
        let zone_id = store.add_zone(greenhouse_id, ZoneStatus::Active).await;
        let service = service(&store);

        let zone = service.change_status(zone_id, "inactive").await.unwrap();
        assert_eq!(zone.status, ZoneStatus::Inactive);

        assert_eq!(service.change_status(zone_id, "nope").await.unwrap_err().kind(), ErrorKind::InvalidState);
        assert_eq!(service.change_status(404, "active").await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(service.get(404).await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_deactivating_zones_unblocks_greenhouse() {
        let store = InMemoryStore::new();
        let greenhouse_id = store.add_greenhouse("North", GreenhouseStatus::Active, 1).await;
        let zone_id = store.add_zone(greenhouse_id, ZoneStatus::Active).await;
        let zones = service(&store);
        let greenhouses = GreenhouseService::new(Arc::new(store.clone()), Arc::new(NoopNotifier));

        assert!(greenhouses.deactivate(greenhouse_id).await.is_err());
        zones.change_status(zone_id, "inactive").await.unwrap();
        greenhouses.deactivate(greenhouse_id).await.unwrap();

        zones.delete(zone_id).await.unwrap();
        greenhouses.delete(greenhouse_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_publishes_with_parent() {
        let store = InMemoryStore::new();
        let greenhouse_id = store.add_greenhouse("North", GreenhouseStatus::Active, 1).await;
        let zone_id = store.add_zone(greenhouse_id, ZoneStatus::Inactive).await;

        let mut notifier = MockNotifier::new();
        notifier
            .expect_broadcast()
            .withf(move |audience, event| {
                *audience == Audience::All
                    && *event == DomainEvent::ZoneDeleted { zone_id, greenhouse_id }
            })
            .times(1)
            .return_const(());
        let service = ZoneService::new(Arc::new(store.clone()), Arc::new(store.clone()), Arc::new(notifier));

        service.delete(zone_id).await.unwrap();
        assert_eq!(service.delete(zone_id).await.unwrap_err().kind(), ErrorKind::NotFound);
    }
}
