//! In-process channel bridge
//!
//! Carries the same event types as the WebSocket bridge over tokio
//! channels. Used by the demo runtime and integration tests, where the
//! receiving ends stand in for the backend.

use crate::domain::bridge::SocketBridge;
use crate::domain::call::signal::OutboundSignal;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::RoomId;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Outbound traffic observed by the fake backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundRecord {
    Signal(OutboundSignal),
    Message { room_id: RoomId, body: String },
}

/// Channel-backed [`SocketBridge`]
pub struct ChannelSocketBridge {
    outbound_tx: mpsc::UnboundedSender<OutboundRecord>,
}

impl ChannelSocketBridge {
    /// Create the bridge plus the receiving end of its outbound traffic
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundRecord>) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        (Self { outbound_tx }, outbound_rx)
    }
}

#[async_trait]
impl SocketBridge for ChannelSocketBridge {
    async fn send_signal(&self, signal: OutboundSignal) -> Result<()> {
        self.outbound_tx
            .send(OutboundRecord::Signal(signal))
            .map_err(|e| crate::domain::DomainError::Transport(e.to_string()))
    }

    async fn send_message(&self, room_id: &RoomId, body: &str) -> Result<()> {
        self.outbound_tx
            .send(OutboundRecord::Message {
                room_id: room_id.clone(),
                body: body.to_string(),
            })
            .map_err(|e| crate::domain::DomainError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::value_objects::SessionRef;

    #[tokio::test]
    async fn test_outbound_traffic_is_observable() {
        let (bridge, mut outbound_rx) = ChannelSocketBridge::new();

        let session_ref = SessionRef::new();
        bridge
            .send_signal(OutboundSignal::Hangup { session_ref })
            .await
            .unwrap();
        bridge
            .send_message(&RoomId::new("room-1"), "hello")
            .await
            .unwrap();

        assert_eq!(
            outbound_rx.recv().await.unwrap(),
            OutboundRecord::Signal(OutboundSignal::Hangup { session_ref })
        );
        assert_eq!(
            outbound_rx.recv().await.unwrap(),
            OutboundRecord::Message {
                room_id: RoomId::new("room-1"),
                body: "hello".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped_is_transport_error() {
        let (bridge, outbound_rx) = ChannelSocketBridge::new();
        drop(outbound_rx);

        let result = bridge.send_message(&RoomId::new("room-1"), "hello").await;
        assert!(result.is_err());
    }
}
