//! Outbound port toward the socket transport
//!
//! The managers only ever talk to the backend through this trait; the
//! concrete transport (WebSocket, in-process channel) lives in the
//! infrastructure layer.

use crate::domain::call::signal::OutboundSignal;
use crate::domain::notification::event::MessageArrival;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::RoomId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outbound side of the socket transport
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocketBridge: Send + Sync {
    /// Emit a call signaling event to the remote party
    async fn send_signal(&self, signal: OutboundSignal) -> Result<()>;

    /// Send a chat message into a room
    async fn send_message(&self, room_id: &RoomId, body: &str) -> Result<()>;
}

/// Event delivered by the socket transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "event", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Call signaling addressed to the session manager
    CallSignal(crate::domain::call::signal::InboundSignal),
    /// Message arrival addressed to the notification pipeline
    MessageArrival(MessageArrival),
}
