//! Domain layer - Core call and notification logic
//!
//! This layer contains:
//! - Aggregates: the call session and the notification queue
//! - Value Objects: identities, states, transition rules
//! - Managers: the only writers of their aggregate's state
//! - Ports: the outbound bridge trait the managers send through

pub mod bridge;
pub mod call;
pub mod notification;
pub mod presentation;
pub mod shared;

// Re-export commonly used types
pub use shared::{DomainError, Result};
