//! Push-notification delivery pipeline
//!
//! Admits message-arrival events exactly once per logical event within the
//! dedup window, runs each visible item's independent auto-close countdown,
//! and funnels both reply origins (in-app box and service-worker relay)
//! into one outbound send.

use crate::config::NotificationConfig;
use crate::domain::bridge::SocketBridge;
use crate::domain::notification::event::{DedupKey, MessageArrival, NotificationEvent};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{DisplayId, RoomId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, warn};

/// Queue and dedup set, owned by the pipeline instance
///
/// The dedup set is an instance field with a bounded lifetime per key,
/// never process-wide state.
struct PipelineState {
    /// Dedup key -> instant its entry stops blocking re-admission
    dedup: HashMap<DedupKey, Instant>,
    /// Live items in arrival order
    queue: Vec<NotificationEvent>,
}

/// Owns the notification queue and its admission/expiry rules
pub struct NotificationDeliveryPipeline {
    state: Mutex<PipelineState>,
    bridge: Arc<dyn SocketBridge>,
    config: NotificationConfig,
}

impl NotificationDeliveryPipeline {
    pub fn new(bridge: Arc<dyn SocketBridge>, config: NotificationConfig) -> Self {
        Self {
            state: Mutex::new(PipelineState {
                dedup: HashMap::new(),
                queue: Vec::new(),
            }),
            bridge,
            config,
        }
    }

    /// Admit an inbound message arrival
    ///
    /// Returns the new item's display id, or `None` when the arrival is a
    /// duplicate inside the dedup window (discarded, no UI side effect).
    pub fn admit(&self, arrival: MessageArrival, now: Instant) -> Option<DisplayId> {
        let key = arrival.dedup_key();
        let mut state = self.state.lock().unwrap();

        state.dedup.retain(|_, expires_at| *expires_at > now);
        if state.dedup.contains_key(&key) {
            debug!(%key, "duplicate arrival inside dedup window, discarding");
            return None;
        }

        state.dedup.insert(key, now + self.config.dedup_window());
        let event = NotificationEvent::new(arrival, now + self.config.display_timeout());
        let display_id = event.display_id();
        state.queue.push(event);
        Some(display_id)
    }

    /// Sweep due deadlines: expired dedup entries and auto-close countdowns
    pub fn handle_timeouts(&self, now: Instant) {
        let mut state = self.state.lock().unwrap();
        state.dedup.retain(|_, expires_at| *expires_at > now);

        for event in state.queue.iter_mut() {
            if event.is_expired(now) {
                debug!(display_id = %event.display_id(), "auto-closing notification");
                event.close();
            }
        }
        state.queue.retain(|e| !e.is_closed());
    }

    /// Open the reply box on an item; suspends its auto-close countdown
    pub fn begin_reply(&self, display_id: DisplayId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let event = state
            .queue
            .iter_mut()
            .find(|e| e.display_id() == display_id)
            .ok_or_else(|| DomainError::NotFound(format!("notification {}", display_id)))?;
        event.enter_replying();
        Ok(())
    }

    /// Leave the reply box without sending; restarts the full countdown
    pub fn cancel_reply(&self, display_id: DisplayId, now: Instant) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let event = state
            .queue
            .iter_mut()
            .find(|e| e.display_id() == display_id)
            .ok_or_else(|| DomainError::NotFound(format!("notification {}", display_id)))?;
        event.exit_replying(now + self.config.display_timeout());
        Ok(())
    }

    /// The single outbound-send entry point for both reply origins
    ///
    /// Closing is keyed by room, not display id: a relayed reply may arrive
    /// with no live UI item, and the send still happens.
    pub async fn send_reply(&self, room_id: &RoomId, body: &str) -> Result<()> {
        if let Err(e) = self.bridge.send_message(room_id, body).await {
            warn!(%room_id, error = %e, "reply send failed");
            return Err(e);
        }

        let mut state = self.state.lock().unwrap();
        for event in state.queue.iter_mut() {
            if event.room_id() == room_id {
                event.close();
            }
        }
        state.queue.retain(|e| !e.is_closed());
        Ok(())
    }

    /// Close the item and hand back its room for navigation
    pub fn open_in_context(&self, display_id: DisplayId) -> Result<RoomId> {
        let mut state = self.state.lock().unwrap();
        let event = state
            .queue
            .iter_mut()
            .find(|e| e.display_id() == display_id)
            .ok_or_else(|| DomainError::NotFound(format!("notification {}", display_id)))?;
        let room_id = event.room_id().clone();
        event.close();
        state.queue.retain(|e| !e.is_closed());
        Ok(room_id)
    }

    /// Explicitly dismiss an item
    pub fn close(&self, display_id: DisplayId) {
        let mut state = self.state.lock().unwrap();
        state.queue.retain(|e| e.display_id() != display_id);
    }

    /// Ordered snapshot of live items for the presentation layer
    pub fn visible(&self) -> Vec<NotificationEvent> {
        self.state.lock().unwrap().queue.clone()
    }
}
