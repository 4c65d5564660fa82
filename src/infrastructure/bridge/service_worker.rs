//! Service-worker relay channel
//!
//! When the page is backgrounded, reply intents composed in the push
//! notification UI are relayed here instead of the in-app reply box. The
//! runtime drains them into the same `send_reply` entry point the in-app
//! path uses; the pipeline never learns which origin a reply came from.

use crate::domain::shared::value_objects::RoomId;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Intent relayed from the backgrounded-page channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelayedIntent {
    #[serde(rename_all = "camelCase")]
    SendReply { room_id: RoomId, message: String },
}

/// Handle the relay pushes intents through
#[derive(Clone)]
pub struct ServiceWorkerHandle {
    tx: mpsc::UnboundedSender<RelayedIntent>,
}

impl ServiceWorkerHandle {
    /// Relay an intent; dropped silently once the runtime is gone
    pub fn relay(&self, intent: RelayedIntent) {
        let _ = self.tx.send(intent);
    }
}

/// In-page end of the service-worker channel
pub struct ServiceWorkerBridge {
    rx: mpsc::UnboundedReceiver<RelayedIntent>,
}

impl ServiceWorkerBridge {
    pub fn new() -> (ServiceWorkerHandle, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ServiceWorkerHandle { tx }, Self { rx })
    }

    /// Next relayed intent; `None` once all handles are dropped
    pub async fn recv(&mut self) -> Option<RelayedIntent> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_relay_round_trip() {
        let (handle, mut bridge) = ServiceWorkerBridge::new();

        handle.relay(RelayedIntent::SendReply {
            room_id: RoomId::new("room-1"),
            message: "on my way".to_string(),
        });

        let intent = bridge.recv().await.unwrap();
        assert_eq!(
            intent,
            RelayedIntent::SendReply {
                room_id: RoomId::new("room-1"),
                message: "on my way".to_string(),
            }
        );
    }

    #[test]
    fn test_wire_format_matches_relay_contract() {
        let intent = RelayedIntent::SendReply {
            room_id: RoomId::new("room-1"),
            message: "hi".to_string(),
        };

        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["type"], "SEND_REPLY");
        assert_eq!(json["roomId"], "room-1");
        assert_eq!(json["message"], "hi");

        let back: RelayedIntent = serde_json::from_value(json).unwrap();
        assert_eq!(back, intent);
    }
}
