//! Repository traits (ports)

pub mod greenhouse_repository;
pub mod zone_repository;

pub use greenhouse_repository::{GreenhouseRepository, GreenhouseUnitOfWork, LifecycleView};
pub use zone_repository::ZoneRepository;
