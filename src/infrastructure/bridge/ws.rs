//! WebSocket socket bridge
//!
//! JSON frames both directions: inbound frames deserialize into
//! [`InboundEvent`] and are forwarded to the runtime over a channel,
//! outbound sends serialize an [`OutboundFrame`]. Transport reliability is
//! the backend's concern; this adapter only carries events.

use crate::domain::bridge::{InboundEvent, SocketBridge};
use crate::domain::call::signal::OutboundSignal;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::RoomId;
use async_trait::async_trait;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Outbound wire frame
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "event", rename_all = "snake_case")]
pub enum OutboundFrame {
    CallSignal(OutboundSignal),
    Message { room_id: RoomId, body: String },
}

/// WebSocket-backed [`SocketBridge`]
pub struct WsSocketBridge {
    sink: Mutex<WsSink>,
}

impl WsSocketBridge {
    /// Connect and start the read task
    ///
    /// Returns the bridge plus the channel inbound events arrive on. The
    /// read task ends when the socket closes; the receiver then yields
    /// `None` and the runtime decides what to do about it.
    pub async fn connect(
        url: &str,
    ) -> anyhow::Result<(Arc<Self>, mpsc::UnboundedReceiver<InboundEvent>)> {
        let (stream, _) = connect_async(url).await?;
        info!(url, "socket connected");

        let (sink, mut read) = stream.split();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(Ok(msg)) = read.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<InboundEvent>(&text) {
                        Ok(event) => {
                            if inbound_tx.send(event).is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!(error = %e, "ignoring malformed inbound frame"),
                    },
                    Message::Close(_) => {
                        debug!("socket closed by backend");
                        break;
                    }
                    _ => {}
                }
            }
            debug!("socket read task finished");
        });

        Ok((Arc::new(Self { sink: Mutex::new(sink) }), inbound_rx))
    }

    async fn send_frame(&self, frame: &OutboundFrame) -> Result<()> {
        let text = serde_json::to_string(frame)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let mut sink = self.sink.lock().await;
        sink.send(Message::Text(text))
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))
    }
}

#[async_trait]
impl SocketBridge for WsSocketBridge {
    async fn send_signal(&self, signal: OutboundSignal) -> Result<()> {
        self.send_frame(&OutboundFrame::CallSignal(signal)).await
    }

    async fn send_message(&self, room_id: &RoomId, body: &str) -> Result<()> {
        self.send_frame(&OutboundFrame::Message {
            room_id: room_id.clone(),
            body: body.to_string(),
        })
        .await
    }
}
