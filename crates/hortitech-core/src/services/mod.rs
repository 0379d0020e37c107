//! Domain services (business logic)

pub mod lifecycle_guard;
pub mod greenhouse_service;
pub mod zone_service;

pub use lifecycle_guard::LifecycleGuard;
pub use greenhouse_service::GreenhouseService;
pub use zone_service::ZoneService;
