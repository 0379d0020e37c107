//! # HortiTech Core - Domain Module
//! 
//! Domain entities for greenhouse management.

pub mod greenhouse;
pub mod zone;
pub mod operator;
pub mod events;

pub type GreenhouseId = i32;
pub type ZoneId = i32;
pub type OperatorId = i32;

// Re-export all entities and enums
pub use greenhouse::{Greenhouse, GreenhouseChanges, GreenhouseFilter, GreenhouseStatus, GreenhouseSummary, NewGreenhouse};
pub use zone::{NewZone, Zone, ZoneStatus};
pub use operator::OperatorSummary;
pub use events::{Audience, DomainEvent, Room};
