//! Parley - The call and notification core of a messaging client
//!
//! Two managers own all the state: the `CallSessionManager` holds the
//! single active call and its state machine, the
//! `NotificationDeliveryPipeline` holds the deduplicated notification
//! queue. Everything else is bridges at the boundary and a pure
//! projection deciding which surface the shell shows.

pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use domain::shared::error::DomainError;
pub use domain::shared::result::Result;
