//! Notification bounded context

pub mod event;
pub mod pipeline;

pub use event::{DedupKey, MessageArrival, NotificationEvent, VisibilityState};
pub use pipeline::NotificationDeliveryPipeline;
