//! # HortiTech API
//! 
//! HTTP handlers, DTOs, error mapping, and the real-time event channel.

pub mod handlers;
pub mod dto;
pub mod error;
pub mod events;
pub mod response;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use events::EventBus;
pub use router::{build_router, cors_layer};
pub use state::AppState;
