//! Bridge adapters at the system boundary

pub mod memory;
pub mod service_worker;
pub mod ws;

pub use memory::{ChannelSocketBridge, OutboundRecord};
pub use service_worker::{RelayedIntent, ServiceWorkerBridge, ServiceWorkerHandle};
pub use ws::WsSocketBridge;
