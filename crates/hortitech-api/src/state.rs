use std::sync::Arc;

use axum::extract::FromRef;

use hortitech_core::repositories::{GreenhouseRepository, ZoneRepository};
use hortitech_core::services::{GreenhouseService, ZoneService};
use hortitech_core::Notifier;

use crate::events::EventBus;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub greenhouses: Arc<GreenhouseService>,
    pub zones: Arc<ZoneService>,
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    pub fn new(
        greenhouse_repo: Arc<dyn GreenhouseRepository>,
        zone_repo: Arc<dyn ZoneRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let notifier: Arc<dyn Notifier> = event_bus.clone();

        Self {
            greenhouses: Arc::new(GreenhouseService::new(greenhouse_repo.clone(), notifier.clone())),
            zones: Arc::new(ZoneService::new(zone_repo, greenhouse_repo, notifier)),
            event_bus,
        }
    }
}

impl FromRef<AppState> for Arc<EventBus> {
    fn from_ref(state: &AppState) -> Self {
        state.event_bus.clone()
    }
}
