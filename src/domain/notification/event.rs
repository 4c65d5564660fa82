//! Notification items and their identity

use crate::domain::shared::value_objects::{DisplayId, RoomId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Idempotency key for one logical message event
///
/// Stable across delivery channels: the socket push and a service-worker
/// relay of the same message compute the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DedupKey {
    sender_id: UserId,
    message_id: String,
}

impl DedupKey {
    pub fn new(sender_id: UserId, message_id: impl Into<String>) -> Self {
        Self {
            sender_id,
            message_id: message_id.into(),
        }
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.sender_id, self.message_id)
    }
}

/// Message-arrival event as delivered by a bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageArrival {
    pub sender_id: UserId,
    pub message_id: String,
    pub room_id: RoomId,
    pub sender_name: String,
    pub avatar_ref: Option<String>,
    pub body: String,
}

impl MessageArrival {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(self.sender_id.clone(), self.message_id.clone())
    }
}

/// Visibility of one notification item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityState {
    /// On screen, auto-close countdown armed
    Visible,
    /// Reply box open; the countdown is suspended
    Replying,
    /// Removed from the stack
    Closed,
}

/// One pending/visible push item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    display_id: DisplayId,
    dedup_key: DedupKey,
    room_id: RoomId,
    sender_name: String,
    avatar_ref: Option<String>,
    body: String,
    received_at: DateTime<Utc>,
    visibility: VisibilityState,
    /// Auto-close deadline; armed only while `Visible`
    #[serde(skip)]
    close_at: Option<Instant>,
}

impl NotificationEvent {
    /// Create a fresh item for a first-seen arrival
    pub fn new(arrival: MessageArrival, close_at: Instant) -> Self {
        Self {
            display_id: DisplayId::new(),
            dedup_key: arrival.dedup_key(),
            room_id: arrival.room_id,
            sender_name: arrival.sender_name,
            avatar_ref: arrival.avatar_ref,
            body: arrival.body,
            received_at: Utc::now(),
            visibility: VisibilityState::Visible,
            close_at: Some(close_at),
        }
    }

    /// Open the reply box; suspends the auto-close countdown
    pub fn enter_replying(&mut self) {
        if self.visibility == VisibilityState::Visible {
            self.visibility = VisibilityState::Replying;
            self.close_at = None;
        }
    }

    /// Leave the reply box without sending; restarts the full countdown
    pub fn exit_replying(&mut self, close_at: Instant) {
        if self.visibility == VisibilityState::Replying {
            self.visibility = VisibilityState::Visible;
            self.close_at = Some(close_at);
        }
    }

    pub fn close(&mut self) {
        self.visibility = VisibilityState::Closed;
        self.close_at = None;
    }

    /// Whether the auto-close deadline has passed
    pub fn is_expired(&self, now: Instant) -> bool {
        self.visibility == VisibilityState::Visible
            && self.close_at.map_or(false, |at| at <= now)
    }

    // Getters
    pub fn display_id(&self) -> DisplayId {
        self.display_id
    }

    pub fn dedup_key(&self) -> &DedupKey {
        &self.dedup_key
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn sender_name(&self) -> &str {
        &self.sender_name
    }

    pub fn avatar_ref(&self) -> Option<&str> {
        self.avatar_ref.as_deref()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn visibility(&self) -> VisibilityState {
        self.visibility
    }

    pub fn is_closed(&self) -> bool {
        self.visibility == VisibilityState::Closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn arrival() -> MessageArrival {
        MessageArrival {
            sender_id: UserId::new("u-s1"),
            message_id: "m-1".to_string(),
            room_id: RoomId::new("room-1"),
            sender_name: "S1".to_string(),
            avatar_ref: None,
            body: "hello".to_string(),
        }
    }

    #[test]
    fn test_dedup_key_is_channel_independent() {
        let a = arrival();
        let b = arrival();
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_replying_suspends_expiry() {
        let now = Instant::now();
        let mut event = NotificationEvent::new(arrival(), now + Duration::from_secs(30));

        event.enter_replying();
        assert_eq!(event.visibility(), VisibilityState::Replying);
        assert!(!event.is_expired(now + Duration::from_secs(40)));

        event.exit_replying(now + Duration::from_secs(70));
        assert_eq!(event.visibility(), VisibilityState::Visible);
        assert!(!event.is_expired(now + Duration::from_secs(40)));
        assert!(event.is_expired(now + Duration::from_secs(70)));
    }

    #[test]
    fn test_closed_never_expires() {
        let now = Instant::now();
        let mut event = NotificationEvent::new(arrival(), now + Duration::from_secs(30));
        event.close();
        assert!(!event.is_expired(now + Duration::from_secs(60)));
        assert!(event.is_closed());
    }
}
