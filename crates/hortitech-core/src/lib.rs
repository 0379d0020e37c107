//! # HortiTech Core
//! 
//! Domain entities, the greenhouse lifecycle guard, services, and repository traits.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod notifier;
pub mod error;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export domain entities
pub use domain::*;
pub use error::{DomainError, ErrorKind};
pub use notifier::Notifier;
